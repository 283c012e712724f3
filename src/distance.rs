// topo2d: planar topology graph and distance engine
// License: MIT
//
// Nearest-point and minimum-distance computation between two geometries.
// The algorithm is the straightforward O(n·m) facet comparison, fronted by
// an areal containment shortcut and pruned by bounding-box distance; an
// optional terminate distance aborts the scan as soon as the running
// minimum drops to or below it.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::geom::{
    closest_point_on_segment, closest_points_between_segments, distance_point_segment,
    distance_segment_segment, Coord, Real,
};
use crate::geometry::Geometry;
use crate::label::Location;
use crate::locate::locate_point_in_polygon;

/// Sentinel segment index marking a point in the interior of an areal
/// geometry rather than on a boundary segment.
pub const INSIDE_AREA: usize = usize::MAX;

/// A located point: which component of a geometry it came from, which
/// segment of that component (or `INSIDE_AREA`), and the point itself.
///
/// For line facets `component` indexes the geometry's `lines()`
/// decomposition; for point facets its `points()`; for inside-area
/// witnesses its `polygons()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeometryLocation {
    pub component: usize,
    pub segment_index: usize,
    pub coord: Coord,
}

impl GeometryLocation {
    pub fn new(component: usize, segment_index: usize, coord: Coord) -> Self {
        GeometryLocation {
            component,
            segment_index,
            coord,
        }
    }

    /// A location in the interior of an areal component.
    pub fn inside_area(component: usize, coord: Coord) -> Self {
        GeometryLocation {
            component,
            segment_index: INSIDE_AREA,
            coord,
        }
    }

    pub fn is_inside_area(&self) -> bool {
        self.segment_index == INSIDE_AREA
    }
}

/// One location per vertex of every facet of the geometry; the candidate
/// points for the containment shortcut.
fn vertex_locations(geometry: &Geometry) -> Vec<GeometryLocation> {
    let mut out = Vec::new();
    for (ci, line) in geometry.lines().iter().enumerate() {
        for (vi, coord) in line.coords.iter().enumerate() {
            out.push(GeometryLocation::new(
                ci,
                vi.min(line.segment_count().saturating_sub(1)),
                *coord,
            ));
        }
    }
    for (pi, coord) in geometry.points().iter().enumerate() {
        out.push(GeometryLocation::new(pi, 0, *coord));
    }
    out
}

/// Computes the minimum distance between two geometries and one witness
/// point pair. State is computed once and memoized; `distance`,
/// `nearest_points` and `nearest_locations` all force the same computation.
pub struct DistanceOp<'g> {
    geom: [&'g Geometry; 2],
    terminate_distance: Real,
    min_distance: Real,
    min_location: Option<[GeometryLocation; 2]>,
    computed: bool,
}

impl<'g> DistanceOp<'g> {
    pub fn new(g0: &'g Geometry, g1: &'g Geometry) -> Self {
        Self::with_terminate_distance(g0, g1, 0.0)
    }

    /// `terminate_distance` is the distance at which the search may stop
    /// early: once the running minimum is at or below it, the reported
    /// distance is final enough for threshold queries.
    pub fn with_terminate_distance(g0: &'g Geometry, g1: &'g Geometry, terminate_distance: Real) -> Self {
        DistanceOp {
            geom: [g0, g1],
            terminate_distance,
            min_distance: Real::MAX,
            min_location: None,
            computed: false,
        }
    }

    /// Minimum distance between two geometries.
    pub fn distance_between(g0: &Geometry, g1: &Geometry) -> Real {
        DistanceOp::new(g0, g1).distance()
    }

    /// Nearest witness points, in input order.
    pub fn nearest_points_between(g0: &Geometry, g1: &Geometry) -> Result<[Coord; 2]> {
        DistanceOp::new(g0, g1).nearest_points()
    }

    /// True iff the geometries lie within `distance` of each other. Early
    /// termination makes this cheap: the scan stops at the first pair found
    /// at or under the threshold, without resolving the true minimum.
    pub fn is_within_distance(g0: &Geometry, g1: &Geometry, distance: Real) -> bool {
        let mut op = DistanceOp::with_terminate_distance(g0, g1, distance);
        op.distance() <= distance
    }

    /// The distance between the nearest points of the two geometries, or 0
    /// if either is empty.
    pub fn distance(&mut self) -> Real {
        self.compute_min_distance();
        if self.geom[0].is_empty() || self.geom[1].is_empty() {
            return 0.0;
        }
        self.min_distance
    }

    /// The nearest points, in input order. Empty inputs leave no witness.
    pub fn nearest_points(&mut self) -> Result<[Coord; 2]> {
        let locations = self.nearest_locations()?;
        Ok([locations[0].coord, locations[1].coord])
    }

    /// The nearest locations, in input order.
    pub fn nearest_locations(&mut self) -> Result<[GeometryLocation; 2]> {
        self.compute_min_distance();
        self.min_location.ok_or_else(|| {
            Error::InvalidArgument("no nearest points exist for an empty geometry".to_string())
        })
    }

    fn compute_min_distance(&mut self) {
        if self.computed {
            return;
        }
        self.computed = true;
        if self.geom[0].is_empty() || self.geom[1].is_empty() {
            return;
        }
        self.compute_containment_distance();
        if self.min_distance <= self.terminate_distance {
            debug!("distance scan ended in containment shortcut");
            return;
        }
        self.compute_facet_distance();
    }

    /// Containment shortcut: a vertex of one geometry inside an areal
    /// component of the other means distance 0 without any facet scan.
    fn compute_containment_distance(&mut self) {
        for poly_index in 0..2 {
            if self.min_distance <= self.terminate_distance {
                return;
            }
            let loc_index = 1 - poly_index;
            let polys = self.geom[poly_index].polygons();
            if polys.is_empty() {
                continue;
            }
            let candidates = vertex_locations(self.geom[loc_index]);
            for loc in &candidates {
                for (pi, poly) in polys.iter().enumerate() {
                    if locate_point_in_polygon(&loc.coord, poly) != Location::Exterior {
                        self.min_distance = 0.0;
                        let mut pair = [*loc; 2];
                        pair[poly_index] = GeometryLocation::inside_area(pi, loc.coord);
                        pair[loc_index] = *loc;
                        self.min_location = Some(pair);
                        return;
                    }
                }
            }
        }
    }

    /// Brute-force facet comparison: line×line, then line×point both ways,
    /// then point×point, each pruned by bounding-box distance against the
    /// running minimum and aborted at the terminate distance.
    fn compute_facet_distance(&mut self) {
        let lines0 = self.geom[0].lines();
        let lines1 = self.geom[1].lines();
        let pts0 = self.geom[0].points();
        let pts1 = self.geom[1].points();

        self.scan_lines_lines(&lines0, &lines1);
        if self.min_distance <= self.terminate_distance {
            return;
        }
        self.scan_lines_points(&lines0, &pts1, false);
        if self.min_distance <= self.terminate_distance {
            return;
        }
        self.scan_lines_points(&lines1, &pts0, true);
        if self.min_distance <= self.terminate_distance {
            return;
        }
        self.scan_points_points(&pts0, &pts1);
    }

    fn scan_lines_lines(
        &mut self,
        lines0: &[&crate::geometry::LineString],
        lines1: &[&crate::geometry::LineString],
    ) {
        for (ci, line0) in lines0.iter().enumerate() {
            let bb0 = line0.bounding_box();
            for (cj, line1) in lines1.iter().enumerate() {
                if bb0.distance(&line1.bounding_box()) > self.min_distance {
                    continue;
                }
                for si in 0..line0.segment_count() {
                    let (a, b) = (line0.coord(si), line0.coord(si + 1));
                    for sj in 0..line1.segment_count() {
                        let (c, d) = (line1.coord(sj), line1.coord(sj + 1));
                        let dist = distance_segment_segment(a, b, c, d);
                        if dist < self.min_distance {
                            self.min_distance = dist;
                            let pair = closest_points_between_segments(a, b, c, d);
                            self.min_location = Some([
                                GeometryLocation::new(ci, si, pair[0]),
                                GeometryLocation::new(cj, sj, pair[1]),
                            ]);
                        }
                        if self.min_distance <= self.terminate_distance {
                            trace!("facet scan terminated early at {}", self.min_distance);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn scan_lines_points(
        &mut self,
        lines: &[&crate::geometry::LineString],
        points: &[Coord],
        flip: bool,
    ) {
        for (ci, line) in lines.iter().enumerate() {
            let bb = line.bounding_box();
            for (pi, pt) in points.iter().enumerate() {
                if bb.distance(&crate::geom::BoundingBox::from_segment(pt, pt)) > self.min_distance
                {
                    continue;
                }
                for si in 0..line.segment_count() {
                    let (a, b) = (line.coord(si), line.coord(si + 1));
                    let dist = distance_point_segment(pt, a, b);
                    if dist < self.min_distance {
                        self.min_distance = dist;
                        let on_line = GeometryLocation::new(ci, si, closest_point_on_segment(pt, a, b));
                        let on_point = GeometryLocation::new(pi, 0, *pt);
                        self.min_location = Some(if flip {
                            [on_point, on_line]
                        } else {
                            [on_line, on_point]
                        });
                    }
                    if self.min_distance <= self.terminate_distance {
                        trace!("facet scan terminated early at {}", self.min_distance);
                        return;
                    }
                }
            }
        }
    }

    fn scan_points_points(&mut self, pts0: &[Coord], pts1: &[Coord]) {
        for (pi, p0) in pts0.iter().enumerate() {
            for (pj, p1) in pts1.iter().enumerate() {
                let dist = p0.distance(p1);
                if dist < self.min_distance {
                    self.min_distance = dist;
                    self.min_location = Some([
                        GeometryLocation::new(pi, 0, *p0),
                        GeometryLocation::new(pj, 0, *p1),
                    ]);
                }
                if self.min_distance <= self.terminate_distance {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Polygon};
    use approx::assert_relative_eq;

    fn line(pts: Vec<Coord>) -> Geometry {
        Geometry::LineString(LineString::new(pts))
    }

    #[test]
    fn point_to_point_distance() {
        let a = Geometry::Point(Coord::new(0.0, 0.0));
        let b = Geometry::Point(Coord::new(3.0, 4.0));
        assert_relative_eq!(DistanceOp::distance_between(&a, &b), 5.0);
    }

    #[test]
    fn empty_geometry_distance_is_zero_without_witness() {
        let a = Geometry::MultiPoint(vec![]);
        let b = Geometry::Point(Coord::new(1.0, 1.0));
        let mut op = DistanceOp::new(&a, &b);
        assert_eq!(op.distance(), 0.0);
        assert!(matches!(
            op.nearest_locations(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn inside_area_location_is_flagged() {
        let poly = Geometry::Polygon(Polygon::new(
            LineString::new(vec![
                Coord::new(0.0, 0.0),
                Coord::new(10.0, 0.0),
                Coord::new(10.0, 10.0),
                Coord::new(0.0, 10.0),
                Coord::new(0.0, 0.0),
            ]),
            vec![],
        ));
        let pt = Geometry::Point(Coord::new(5.0, 5.0));
        let mut op = DistanceOp::new(&poly, &pt);
        assert_eq!(op.distance(), 0.0);
        let locations = op.nearest_locations().unwrap();
        assert!(locations[0].is_inside_area());
        assert!(!locations[1].is_inside_area());
    }

    #[test]
    fn witness_order_follows_inputs() {
        let a = line(vec![Coord::new(0.0, 0.0), Coord::new(10.0, 0.0)]);
        let b = Geometry::Point(Coord::new(5.0, 3.0));
        let mut op_ab = DistanceOp::new(&a, &b);
        let pts = op_ab.nearest_points().unwrap();
        assert!(pts[0].equals_2d(&Coord::new(5.0, 0.0)));
        assert!(pts[1].equals_2d(&Coord::new(5.0, 3.0)));

        // flipped inputs flip the witness order
        let mut op_ba = DistanceOp::new(&b, &a);
        let pts = op_ba.nearest_points().unwrap();
        assert!(pts[0].equals_2d(&Coord::new(5.0, 3.0)));
        assert!(pts[1].equals_2d(&Coord::new(5.0, 0.0)));
    }
}
