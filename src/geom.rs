// topo2d: planar topology graph and distance engine
// License: MIT
//
// Pure coordinate math: the scalar type, coordinates, bounding boxes and the
// point/segment distance kernels everything else is built on. No topology
// state lives here.

/// Coordinate scalar. The engine works in double precision throughout.
pub type Real = f64;

/// A position in the plane, with an optional elevation carried along.
///
/// All topology decisions (equality, ordering, intersection) are strictly
/// 2D; `z` is interpolated where derived points are constructed but never
/// compared.
#[derive(Copy, Clone, Debug)]
pub struct Coord {
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl Coord {
    #[inline]
    pub fn new(x: Real, y: Real) -> Self {
        Coord { x, y, z: Real::NAN }
    }

    #[inline]
    pub fn new_3d(x: Real, y: Real, z: Real) -> Self {
        Coord { x, y, z }
    }

    /// 2D equality; `z` is ignored.
    #[inline]
    pub fn equals_2d(&self, other: &Coord) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// 2D Euclidean distance.
    #[inline]
    pub fn distance(&self, other: &Coord) -> Real {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Lexicographic (x, then y) comparison, the sweep/ordering convention.
    #[inline]
    pub fn compare_2d(&self, other: &Coord) -> std::cmp::Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.equals_2d(other)
    }
}

/// Returns the orientation of point `q` relative to the directed line
/// `p1 -> p2`: 1 if counter-clockwise (left), -1 if clockwise (right),
/// 0 if collinear.
#[inline]
pub fn orientation_index(p1: &Coord, p2: &Coord, q: &Coord) -> i32 {
    let det = (p2.x - p1.x) * (q.y - p1.y) - (p2.y - p1.y) * (q.x - p1.x);
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

/// The point a given fraction along segment `(p0, p1)`.
/// Fractions outside [0,1] clamp to the endpoints. `z` is interpolated;
/// if either input `z` is NaN the result `z` is NaN.
pub fn point_along_segment(p0: &Coord, p1: &Coord, frac: Real) -> Coord {
    if frac <= 0.0 {
        return *p0;
    }
    if frac >= 1.0 {
        return *p1;
    }
    Coord {
        x: (p1.x - p0.x) * frac + p0.x,
        y: (p1.y - p0.y) * frac + p0.y,
        z: (p1.z - p0.z) * frac + p0.z,
    }
}

/// The projection factor of `p` onto the (infinite) line through `a` and
/// `b`: 0 at `a`, 1 at `b`, outside [0,1] beyond the endpoints.
pub fn projection_factor(p: &Coord, a: &Coord, b: &Coord) -> Real {
    if p.equals_2d(a) {
        return 0.0;
    }
    if p.equals_2d(b) {
        return 1.0;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    if len2 <= 0.0 {
        return Real::NAN;
    }
    ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2
}

/// Distance from `p` to the segment `(a, b)`.
pub fn distance_point_segment(p: &Coord, a: &Coord, b: &Coord) -> Real {
    // zero-length segment
    if a.equals_2d(b) {
        return p.distance(a);
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len2 = dx * dx + dy * dy;
    let r = ((p.x - a.x) * dx + (p.y - a.y) * dy) / len2;
    if r <= 0.0 {
        return p.distance(a);
    }
    if r >= 1.0 {
        return p.distance(b);
    }
    let s = ((a.y - p.y) * dx - (a.x - p.x) * dy) / len2;
    s.abs() * len2.sqrt()
}

/// The point on segment `(a, b)` closest to `p`.
pub fn closest_point_on_segment(p: &Coord, a: &Coord, b: &Coord) -> Coord {
    let factor = projection_factor(p, a, b);
    if factor.is_nan() || factor <= 0.0 {
        return *a;
    }
    if factor >= 1.0 {
        return *b;
    }
    point_along_segment(a, b, factor)
}

/// Minimum distance between segments `(a, b)` and `(c, d)`.
pub fn distance_segment_segment(a: &Coord, b: &Coord, c: &Coord, d: &Coord) -> Real {
    if a.equals_2d(b) {
        return distance_point_segment(a, c, d);
    }
    if c.equals_2d(d) {
        return distance_point_segment(c, a, b);
    }
    if segment_intersection(a, b, c, d).is_some() {
        return 0.0;
    }
    let d1 = distance_point_segment(c, a, b);
    let d2 = distance_point_segment(d, a, b);
    let d3 = distance_point_segment(a, c, d);
    let d4 = distance_point_segment(b, c, d);
    d1.min(d2).min(d3).min(d4)
}

/// Parametric intersection of segments `(a, b)` and `(c, d)`.
/// Returns `None` when the segments do not cross or are parallel; collinear
/// overlap also returns `None` (callers that need full collinear handling
/// use the topology-grade intersector instead).
pub fn segment_intersection(a: &Coord, b: &Coord, c: &Coord, d: &Coord) -> Option<Coord> {
    let denom = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if denom == 0.0 {
        return None;
    }
    let r = ((a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y)) / denom;
    let s = ((a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y)) / denom;
    if !(0.0..=1.0).contains(&r) || !(0.0..=1.0).contains(&s) {
        return None;
    }
    Some(point_along_segment(a, b, r))
}

/// The pair of closest points between segments `(a, b)` and `(c, d)`,
/// first point on the first segment.
pub fn closest_points_between_segments(
    a: &Coord,
    b: &Coord,
    c: &Coord,
    d: &Coord,
) -> [Coord; 2] {
    if let Some(p) = segment_intersection(a, b, c, d) {
        return [p, p];
    }
    let mut min_dist;
    let close00 = closest_point_on_segment(c, a, b);
    min_dist = close00.distance(c);
    let mut pair = [close00, *c];

    let close01 = closest_point_on_segment(d, a, b);
    let dist = close01.distance(d);
    if dist < min_dist {
        min_dist = dist;
        pair = [close01, *d];
    }
    let close10 = closest_point_on_segment(a, c, d);
    let dist = close10.distance(a);
    if dist < min_dist {
        min_dist = dist;
        pair = [*a, close10];
    }
    let close11 = closest_point_on_segment(b, c, d);
    let dist = close11.distance(b);
    if dist < min_dist {
        pair = [*b, close11];
    }
    pair
}

// ─────────────────────────────── Bounding box ─────────────────────────────

/// Axis-aligned bounding rectangle. An empty box has `min > max`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: Real,
    pub min_y: Real,
    pub max_x: Real,
    pub max_y: Real,
}

impl BoundingBox {
    pub fn empty() -> Self {
        BoundingBox {
            min_x: Real::INFINITY,
            min_y: Real::INFINITY,
            max_x: Real::NEG_INFINITY,
            max_y: Real::NEG_INFINITY,
        }
    }

    pub fn from_coords(pts: &[Coord]) -> Self {
        let mut bb = BoundingBox::empty();
        for p in pts {
            bb.expand_to_include(p);
        }
        bb
    }

    pub fn from_segment(p0: &Coord, p1: &Coord) -> Self {
        BoundingBox {
            min_x: p0.x.min(p1.x),
            min_y: p0.y.min(p1.y),
            max_x: p0.x.max(p1.x),
            max_y: p0.y.max(p1.y),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    pub fn expand_to_include(&mut self, p: &Coord) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn expand_to_include_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    /// Distance between two boxes; 0 if they intersect or either is empty.
    pub fn distance(&self, other: &BoundingBox) -> Real {
        if self.is_empty() || other.is_empty() || self.intersects(other) {
            return 0.0;
        }
        let dx = if self.max_x < other.min_x {
            other.min_x - self.max_x
        } else if self.min_x > other.max_x {
            self.min_x - other.max_x
        } else {
            0.0
        };
        let dy = if self.max_y < other.min_y {
            other.min_y - self.max_y
        } else if self.min_y > other.max_y {
            self.min_y - other.max_y
        } else {
            0.0
        };
        if dx == 0.0 {
            return dy;
        }
        if dy == 0.0 {
            return dx;
        }
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orientation_basic() {
        let p1 = Coord::new(0.0, 0.0);
        let p2 = Coord::new(10.0, 0.0);
        assert_eq!(orientation_index(&p1, &p2, &Coord::new(5.0, 5.0)), 1);
        assert_eq!(orientation_index(&p1, &p2, &Coord::new(5.0, -5.0)), -1);
        assert_eq!(orientation_index(&p1, &p2, &Coord::new(20.0, 0.0)), 0);
    }

    #[test]
    fn point_segment_distance_perpendicular() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(10.0, 0.0);
        assert_relative_eq!(distance_point_segment(&Coord::new(5.0, 3.0), &a, &b), 3.0);
        // beyond the end: distance to endpoint
        assert_relative_eq!(
            distance_point_segment(&Coord::new(13.0, 4.0), &a, &b),
            5.0
        );
    }

    #[test]
    fn zero_length_segment_degenerates_to_point() {
        let a = Coord::new(2.0, 2.0);
        assert_relative_eq!(
            distance_point_segment(&Coord::new(2.0, 5.0), &a, &a),
            3.0
        );
    }

    #[test]
    fn segment_segment_crossing_is_zero() {
        let d = distance_segment_segment(
            &Coord::new(0.0, 0.0),
            &Coord::new(10.0, 0.0),
            &Coord::new(5.0, -5.0),
            &Coord::new(5.0, 5.0),
        );
        assert_eq!(d, 0.0);
    }

    #[test]
    fn segment_segment_parallel() {
        let d = distance_segment_segment(
            &Coord::new(0.0, 0.0),
            &Coord::new(10.0, 0.0),
            &Coord::new(0.0, 4.0),
            &Coord::new(10.0, 4.0),
        );
        assert_relative_eq!(d, 4.0);
    }

    #[test]
    fn closest_points_on_crossing_segments_coincide() {
        let [p, q] = closest_points_between_segments(
            &Coord::new(0.0, 0.0),
            &Coord::new(10.0, 0.0),
            &Coord::new(5.0, -5.0),
            &Coord::new(5.0, 5.0),
        );
        assert!(p.equals_2d(&q));
        assert_relative_eq!(p.x, 5.0);
        assert_relative_eq!(p.y, 0.0);
    }

    #[test]
    fn along_segment_interpolates_z() {
        let p0 = Coord::new_3d(0.0, 0.0, 0.0);
        let p1 = Coord::new_3d(10.0, 0.0, 100.0);
        let mid = point_along_segment(&p0, &p1, 0.5);
        assert_relative_eq!(mid.x, 5.0);
        assert_relative_eq!(mid.z, 50.0);
    }

    #[test]
    fn bbox_distance() {
        let a = BoundingBox::from_segment(&Coord::new(0.0, 0.0), &Coord::new(1.0, 1.0));
        let b = BoundingBox::from_segment(&Coord::new(4.0, 5.0), &Coord::new(6.0, 7.0));
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }
}
