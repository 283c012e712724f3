// topo2d: planar topology graph and distance engine
// License: MIT
//
// The two-segment line intersector. Given segments P and Q it reports 0, 1
// or 2 intersection points, whether the intersection is proper (interior to
// both segments), and for each point a distance along either input segment.
// The noding pass consumes these reports through `Edge::add_intersections`.

use crate::error::{Error, Result};
use crate::geom::{orientation_index, point_along_segment, BoundingBox, Coord, Real};

/// Outcome of intersecting two segments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum IntersectionKind {
    /// The segments do not intersect.
    None,
    /// The segments intersect in a single point.
    Point,
    /// The segments are collinear and overlap in a (possibly degenerate)
    /// sub-segment, reported as its two endpoints.
    Collinear,
}

/// Reusable two-segment intersector. Call `compute_intersection` and then
/// query the result; the input segments are retained so that edge distances
/// can be computed for either of them.
pub struct LineIntersector {
    input: [[Coord; 2]; 2],
    int_pts: [Coord; 2],
    kind: IntersectionKind,
    proper: bool,
}

impl LineIntersector {
    pub fn new() -> Self {
        let origin = Coord::new(0.0, 0.0);
        LineIntersector {
            input: [[origin; 2]; 2],
            int_pts: [origin; 2],
            kind: IntersectionKind::None,
            proper: false,
        }
    }

    #[inline]
    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    pub fn intersection_count(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    #[inline]
    pub fn intersection(&self, i: usize) -> &Coord {
        &self.int_pts[i]
    }

    /// A proper intersection lies strictly in the interior of both segments.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.proper
    }

    /// True if the intersection point `i` is not an endpoint of input
    /// segment `geom_index`.
    pub fn is_interior_intersection(&self, geom_index: usize, i: usize) -> bool {
        let pt = &self.int_pts[i];
        !pt.equals_2d(&self.input[geom_index][0]) && !pt.equals_2d(&self.input[geom_index][1])
    }

    /// Distance of intersection point `int_index` along input segment
    /// `geom_index`, measured on the dominant axis. The value is only used
    /// for ordering intersections along an edge, never as a metric length.
    pub fn edge_distance(&self, geom_index: usize, int_index: usize) -> Result<Real> {
        let [p0, p1] = &self.input[geom_index];
        compute_edge_distance(&self.int_pts[int_index], p0, p1)
    }

    pub fn compute_intersection(&mut self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) {
        self.input = [[*p1, *p2], [*q1, *q2]];
        self.proper = false;

        let env_p = BoundingBox::from_segment(p1, p2);
        let env_q = BoundingBox::from_segment(q1, q2);
        if !env_p.intersects(&env_q) {
            self.kind = IntersectionKind::None;
            return;
        }

        let pq1 = orientation_index(p1, p2, q1);
        let pq2 = orientation_index(p1, p2, q2);
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            self.kind = IntersectionKind::None;
            return;
        }
        let qp1 = orientation_index(q1, q2, p1);
        let qp2 = orientation_index(q1, q2, p2);
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            self.kind = IntersectionKind::None;
            return;
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            self.kind = self.collinear_intersection(p1, p2, q1, q2, &env_p, &env_q);
            return;
        }

        // At least one orientation is zero: an endpoint of one segment lies
        // on the other. Prefer exact endpoint coordinates over computed ones
        // so vertex-coincident hits snap deterministically.
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            self.int_pts[0] = if p1.equals_2d(q1) || p1.equals_2d(q2) {
                *p1
            } else if p2.equals_2d(q1) || p2.equals_2d(q2) {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
        } else {
            self.proper = true;
            self.int_pts[0] = proper_intersection_point(p1, p2, q1, q2);
        }
        self.kind = IntersectionKind::Point;
    }

    fn collinear_intersection(
        &mut self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
        env_p: &BoundingBox,
        env_q: &BoundingBox,
    ) -> IntersectionKind {
        let q1_in = contains_point(env_p, q1);
        let q2_in = contains_point(env_p, q2);
        let p1_in = contains_point(env_q, p1);
        let p2_in = contains_point(env_q, p2);

        if q1_in && q2_in {
            self.int_pts = [*q1, *q2];
            return IntersectionKind::Collinear;
        }
        if p1_in && p2_in {
            self.int_pts = [*p1, *p2];
            return IntersectionKind::Collinear;
        }
        if q1_in && p1_in {
            self.int_pts = [*q1, *p1];
            return single_or_pair(q1, p1, q2_in, p2_in);
        }
        if q1_in && p2_in {
            self.int_pts = [*q1, *p2];
            return single_or_pair(q1, p2, q2_in, p1_in);
        }
        if q2_in && p1_in {
            self.int_pts = [*q2, *p1];
            return single_or_pair(q2, p1, q1_in, p2_in);
        }
        if q2_in && p2_in {
            self.int_pts = [*q2, *p2];
            return single_or_pair(q2, p2, q1_in, p1_in);
        }
        IntersectionKind::None
    }
}

impl Default for LineIntersector {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn contains_point(env: &BoundingBox, p: &Coord) -> bool {
    env.min_x <= p.x && p.x <= env.max_x && env.min_y <= p.y && p.y <= env.max_y
}

fn single_or_pair(a: &Coord, b: &Coord, other1_in: bool, other2_in: bool) -> IntersectionKind {
    // Touching at a single shared point unless a further endpoint extends
    // the overlap.
    if a.equals_2d(b) && !other1_in && !other2_in {
        IntersectionKind::Point
    } else {
        IntersectionKind::Collinear
    }
}

/// Intersection point of two properly crossing segments. Inputs are
/// translated towards the origin before the parametric solve to limit
/// cancellation on large coordinates, then translated back.
fn proper_intersection_point(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let mid_x = (p1.x.min(p2.x).max(q1.x.min(q2.x)) + p1.x.max(p2.x).min(q1.x.max(q2.x))) / 2.0;
    let mid_y = (p1.y.min(p2.y).max(q1.y.min(q2.y)) + p1.y.max(p2.y).min(q1.y.max(q2.y))) / 2.0;

    let shift = |c: &Coord| Coord::new(c.x - mid_x, c.y - mid_y);
    let (a, b, c, d) = (shift(p1), shift(p2), shift(q1), shift(q2));

    let denom = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    let r = if denom != 0.0 {
        (((a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y)) / denom).clamp(0.0, 1.0)
    } else {
        // Orientation tests said the segments cross; fall back to the
        // midpoint of the shorter segment's projection.
        0.5
    };
    let pt = point_along_segment(&a, &b, r);
    Coord::new(pt.x + mid_x, pt.y + mid_y)
}

/// Distance of `p` along segment `(p0, p1)` measured on the dominant axis.
/// Used purely to order intersections along an edge: endpoints map to 0 and
/// the full axis extent, interior points to strictly positive values.
pub fn compute_edge_distance(p: &Coord, p0: &Coord, p1: &Coord) -> Result<Real> {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    let mut dist;
    if p.equals_2d(p0) {
        dist = 0.0;
    } else if p.equals_2d(p1) {
        dist = if dx > dy { dx } else { dy };
    } else {
        let pdx = (p.x - p0.x).abs();
        let pdy = (p.y - p0.y).abs();
        dist = if dx > dy { pdx } else { pdy };
        // an interior point must order strictly after the segment start
        if dist == 0.0 {
            dist = pdx.max(pdy);
        }
        if dist == 0.0 {
            return Err(Error::InternalInvariant(
                "computed zero edge distance for a non-endpoint intersection".to_string(),
            ));
        }
    }
    Ok(dist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn proper_crossing() {
        let mut li = LineIntersector::new();
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(10.0, 0.0),
            &Coord::new(5.0, -5.0),
            &Coord::new(5.0, 5.0),
        );
        assert_eq!(li.intersection_count(), 1);
        assert!(li.is_proper());
        assert_relative_eq!(li.intersection(0).x, 5.0);
        assert_relative_eq!(li.intersection(0).y, 0.0);
    }

    #[test]
    fn disjoint_segments() {
        let mut li = LineIntersector::new();
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(1.0, 0.0),
            &Coord::new(0.0, 2.0),
            &Coord::new(1.0, 2.0),
        );
        assert!(!li.has_intersection());
    }

    #[test]
    fn endpoint_touch_is_improper() {
        let mut li = LineIntersector::new();
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(5.0, 0.0),
            &Coord::new(5.0, 0.0),
            &Coord::new(5.0, 5.0),
        );
        assert_eq!(li.intersection_count(), 1);
        assert!(!li.is_proper());
        assert!(li.intersection(0).equals_2d(&Coord::new(5.0, 0.0)));
    }

    #[test]
    fn collinear_overlap_yields_two_points() {
        let mut li = LineIntersector::new();
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(10.0, 0.0),
            &Coord::new(5.0, 0.0),
            &Coord::new(15.0, 0.0),
        );
        assert_eq!(li.intersection_count(), 2);
        assert!(!li.is_proper());
    }

    #[test]
    fn collinear_endpoint_touch_is_single_point() {
        let mut li = LineIntersector::new();
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(5.0, 0.0),
            &Coord::new(5.0, 0.0),
            &Coord::new(10.0, 0.0),
        );
        assert_eq!(li.intersection_count(), 1);
    }

    #[test]
    fn edge_distance_orders_along_segment() {
        let p0 = Coord::new(0.0, 0.0);
        let p1 = Coord::new(10.0, 0.0);
        assert_eq!(compute_edge_distance(&p0, &p0, &p1).unwrap(), 0.0);
        assert_eq!(compute_edge_distance(&p1, &p0, &p1).unwrap(), 10.0);
        let mid = compute_edge_distance(&Coord::new(4.0, 0.0), &p0, &p1).unwrap();
        assert_relative_eq!(mid, 4.0);
    }

    #[test]
    fn interior_intersection_detection() {
        let mut li = LineIntersector::new();
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(10.0, 0.0),
            &Coord::new(5.0, -5.0),
            &Coord::new(5.0, 5.0),
        );
        assert!(li.is_interior_intersection(0, 0));
        assert!(li.is_interior_intersection(1, 0));
    }
}
