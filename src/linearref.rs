// topo2d: planar topology graph and distance engine
// License: MIT
//
// Linear referencing: positions along a lineal geometry expressed as
// (component index, segment index, fraction), the nearest-position locator
// with its start-biased tie-break, and the maximal-nearest-subline trim
// heuristic built on top of it.

use crate::error::{Error, Result};
use crate::geom::{
    distance_point_segment, point_along_segment, projection_factor, Coord, Real,
};
use crate::geometry::LineString;

/// A position along a lineal geometry. Fractions are kept in [0, 1]; a
/// position at a shared vertex is representable both as `(i, 1.0)` and
/// `(i + 1, 0.0)` and the locator always produces the lower form.
#[derive(Copy, Clone, Debug)]
pub struct LineStringLocation {
    pub component_index: usize,
    pub segment_index: usize,
    pub fraction: Real,
}

impl LineStringLocation {
    /// Fractions outside [0, 1] (or NaN) are clamped.
    pub fn new(component_index: usize, segment_index: usize, fraction: Real) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        LineStringLocation {
            component_index,
            segment_index,
            fraction,
        }
    }

    /// A location on a single-component line.
    pub fn from_segment(segment_index: usize, fraction: Real) -> Self {
        Self::new(0, segment_index, fraction)
    }

    pub fn start() -> Self {
        Self::from_segment(0, 0.0)
    }

    pub fn end_of(line: &LineString) -> Self {
        Self::from_segment(line.segment_count().saturating_sub(1), 1.0)
    }

    /// Ensure the indexes are valid for the given line.
    pub fn clamp(&mut self, line: &LineString) {
        let max_seg = line.segment_count().saturating_sub(1);
        if self.segment_index > max_seg {
            self.segment_index = max_seg;
            self.fraction = 1.0;
        }
    }

    pub fn is_vertex(&self) -> bool {
        self.fraction <= 0.0 || self.fraction >= 1.0
    }

    /// The coordinate this location refers to on the given line.
    pub fn coordinate(&self, line: &LineString) -> Coord {
        let p0 = line.coord(self.segment_index);
        if self.segment_index >= line.num_points() - 1 {
            return *p0;
        }
        let p1 = line.coord(self.segment_index + 1);
        point_along_segment(p0, p1, self.fraction)
    }

    /// Length of the segment containing this location.
    pub fn segment_length(&self, line: &LineString) -> Real {
        let mut seg = self.segment_index;
        if seg >= line.segment_count() {
            seg = line.segment_count().saturating_sub(1);
        }
        line.coord(seg).distance(line.coord(seg + 1))
    }

    /// Snap to the nearest segment vertex if it is closer than
    /// `min_distance`.
    pub fn snap_to_vertex(&mut self, line: &LineString, min_distance: Real) {
        if self.is_vertex() {
            return;
        }
        let seg_len = self.segment_length(line);
        let to_start = self.fraction * seg_len;
        let to_end = seg_len - to_start;
        if to_start <= to_end && to_start < min_distance {
            self.fraction = 0.0;
        } else if to_end <= to_start && to_end < min_distance {
            self.fraction = 1.0;
        }
    }
}

impl PartialEq for LineStringLocation {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}
impl Eq for LineStringLocation {}
impl PartialOrd for LineStringLocation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for LineStringLocation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.component_index
            .cmp(&other.component_index)
            .then_with(|| self.segment_index.cmp(&other.segment_index))
            .then_with(|| self.fraction.total_cmp(&other.fraction))
    }
}

/// Locates the position on a line nearest a query point.
pub struct LocationOfPoint<'a> {
    line: &'a LineString,
}

impl<'a> LocationOfPoint<'a> {
    pub fn new(line: &'a LineString) -> Self {
        LocationOfPoint { line }
    }

    /// One-shot convenience.
    pub fn locate_point(line: &LineString, pt: &Coord) -> LineStringLocation {
        LocationOfPoint::new(line).locate(pt)
    }

    /// Nearest location on the line to `pt`. The minimum is updated only on
    /// strict improvement, so of several equidistant segments the first
    /// (lowest index) wins: ties resolve towards the start of the line.
    pub fn locate(&self, pt: &Coord) -> LineStringLocation {
        let mut min_distance = Real::MAX;
        let mut min_location = LineStringLocation::start();
        for i in 0..self.line.segment_count() {
            let a = self.line.coord(i);
            let b = self.line.coord(i + 1);
            let dist = distance_point_segment(pt, a, b);
            if dist < min_distance {
                min_distance = dist;
                min_location = LineStringLocation::from_segment(i, segment_fraction(pt, a, b));
            }
        }
        min_location
    }

    /// Nearest location strictly after `min_location`. Candidates at or
    /// before the minimum are rejected during the scan, which keeps
    /// repeated forward projections monotonic; a result that would still
    /// precede the minimum is an engine bug, reported as an internal
    /// invariant violation.
    pub fn locate_after(
        &self,
        pt: &Coord,
        min_location: &LineStringLocation,
    ) -> Result<LineStringLocation> {
        let mut best: Option<(Real, LineStringLocation)> = None;
        for i in min_location.segment_index..self.line.segment_count() {
            let a = self.line.coord(i);
            let b = self.line.coord(i + 1);
            let dist = distance_point_segment(pt, a, b);
            let candidate = LineStringLocation::from_segment(i, segment_fraction(pt, a, b));
            if candidate <= *min_location {
                continue;
            }
            if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                best = Some((dist, candidate));
            }
        }
        let (_, location) = best.ok_or_else(|| {
            Error::InternalInvariant(
                "no location strictly after the specified minimum location".to_string(),
            )
        })?;
        if location <= *min_location {
            return Err(Error::InternalInvariant(
                "computed location is before the specified minimum location".to_string(),
            ));
        }
        Ok(location)
    }
}

/// Fraction of `pt`'s projection along segment `(a, b)`, clamped to [0, 1].
fn segment_fraction(pt: &Coord, a: &Coord, b: &Coord) -> Real {
    let frac = projection_factor(pt, a, b);
    if frac.is_nan() {
        0.0
    } else {
        frac.clamp(0.0, 1.0)
    }
}

// ──────────────────────── Maximal nearest subline ─────────────────────────

/// Trims line A to the shortest contiguous span containing the nearest
/// points on A to all of B.
///
/// This is a probing heuristic, not a Voronoi-exact computation: it
/// projects every vertex of B onto A, then for vertices of A outside the
/// interval found so far projects them onto B and probes those B points
/// back against A, and takes the union interval of all probe results. It
/// may under-trim (keep more of A than strictly necessary) on adversarial
/// inputs; it never over-trims.
pub struct MaximalNearestSubline;

impl MaximalNearestSubline {
    /// The interval of A nearest to B, as a (start, end) location pair.
    pub fn interval(a: &LineString, b: &LineString) -> [LineStringLocation; 2] {
        let a_locator = LocationOfPoint::new(a);
        let mut interval: Option<[LineStringLocation; 2]> = None;

        let expand = |loc: LineStringLocation, interval: &mut Option<[LineStringLocation; 2]>| {
            match interval {
                None => *interval = Some([loc, loc]),
                Some([start, end]) => {
                    if loc < *start {
                        *start = loc;
                    }
                    if loc > *end {
                        *end = loc;
                    }
                }
            }
        };

        // probe every vertex of B against A
        for pt in &b.coords {
            expand(a_locator.locate(pt), &mut interval);
        }

        // probe the B points nearest to A's vertices, for vertices of A
        // outside the interval found so far
        let b_locator = LocationOfPoint::new(b);
        for (ia, pt) in a.coords.iter().enumerate() {
            if Self::is_outside_interval(ia, &interval) {
                let b_loc = b_locator.locate(pt);
                let b_pt = b_loc.coordinate(b);
                expand(a_locator.locate(&b_pt), &mut interval);
            }
        }

        interval.unwrap_or([LineStringLocation::start(), LineStringLocation::start()])
    }

    fn is_outside_interval(ia: usize, interval: &Option<[LineStringLocation; 2]>) -> bool {
        match interval {
            None => true,
            Some([start, end]) => ia <= start.segment_index || ia > end.segment_index,
        }
    }

    /// The trimmed line itself.
    pub fn compute(a: &LineString, b: &LineString) -> LineString {
        let [start, end] = Self::interval(a, b);
        subline(&start, &end, a)
    }
}

/// Materialize the span of `line` between two locations as a new line.
/// A degenerate span yields a two-point zero-length line.
pub fn subline(start: &LineStringLocation, end: &LineStringLocation, line: &LineString) -> LineString {
    let mut coords: Vec<Coord> = Vec::new();
    let push = |c: Coord, coords: &mut Vec<Coord>| {
        if coords.last().map_or(true, |last| !last.equals_2d(&c)) {
            coords.push(c);
        }
    };

    let mut start_index = start.segment_index;
    if start.fraction > 0.0 {
        start_index += 1;
    }
    let mut end_index = end.segment_index;
    if end.fraction >= 1.0 {
        end_index += 1;
    }
    end_index = end_index.min(line.num_points() - 1);

    if !start.is_vertex() {
        push(start.coordinate(line), &mut coords);
    }
    for i in start_index..=end_index {
        push(*line.coord(i), &mut coords);
    }
    if !end.is_vertex() {
        push(end.coordinate(line), &mut coords);
    }

    if coords.len() == 1 {
        let only = coords[0];
        coords.push(only);
    }
    LineString::new(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bent_line() -> LineString {
        LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
        ])
    }

    #[test]
    fn locate_midpoint() {
        let line = bent_line();
        let loc = LocationOfPoint::locate_point(&line, &Coord::new(5.0, 3.0));
        assert_eq!(loc.segment_index, 0);
        assert_relative_eq!(loc.fraction, 0.5);
    }

    #[test]
    fn tie_at_shared_vertex_favours_earlier_segment() {
        // query equidistant from segment 0's end and segment 1's start:
        // the earlier segment wins, as (0, 1.0), never (1, 0.0)
        let line = bent_line();
        let loc = LocationOfPoint::locate_point(&line, &Coord::new(10.0, -1.0));
        assert_eq!(loc.segment_index, 0);
        assert_relative_eq!(loc.fraction, 1.0);
    }

    #[test]
    fn locate_after_advances_monotonically() {
        let line = bent_line();
        let locator = LocationOfPoint::new(&line);
        let first = locator.locate(&Coord::new(3.0, 1.0));
        assert_eq!(first.segment_index, 0);
        // the same query point again, constrained after the first hit,
        // must land strictly later
        let second = locator.locate_after(&Coord::new(10.0, 4.0), &first).unwrap();
        assert!(second > first);
        assert_eq!(second.segment_index, 1);
    }

    #[test]
    fn locate_after_rejects_backward_results() {
        let line = bent_line();
        let locator = LocationOfPoint::new(&line);
        let end = LineStringLocation::end_of(&line);
        let result = locator.locate_after(&Coord::new(0.0, 1.0), &end);
        assert!(matches!(result, Err(Error::InternalInvariant(_))));
    }

    #[test]
    fn location_ordering() {
        let a = LineStringLocation::from_segment(0, 0.5);
        let b = LineStringLocation::from_segment(0, 0.9);
        let c = LineStringLocation::from_segment(1, 0.0);
        assert!(a < b && b < c);
        let other_component = LineStringLocation::new(1, 0, 0.0);
        assert!(c < other_component);
    }

    #[test]
    fn coordinate_interpolates() {
        let line = bent_line();
        let loc = LineStringLocation::from_segment(1, 0.5);
        let pt = loc.coordinate(&line);
        assert_relative_eq!(pt.x, 10.0);
        assert_relative_eq!(pt.y, 5.0);
    }

    #[test]
    fn subline_between_fractions() {
        let line = bent_line();
        let start = LineStringLocation::from_segment(0, 0.5);
        let end = LineStringLocation::from_segment(1, 0.5);
        let sub = subline(&start, &end, &line);
        assert_eq!(sub.num_points(), 3);
        assert!(sub.coord(0).equals_2d(&Coord::new(5.0, 0.0)));
        assert!(sub.coord(1).equals_2d(&Coord::new(10.0, 0.0)));
        assert!(sub.coord(2).equals_2d(&Coord::new(10.0, 5.0)));
    }

    #[test]
    fn maximal_nearest_subline_trims_far_span() {
        // B runs alongside only the first segment of A
        let a = LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(20.0, 0.0),
        ]);
        let b = LineString::new(vec![Coord::new(0.0, 1.0), Coord::new(10.0, 1.0)]);
        let sub = MaximalNearestSubline::compute(&a, &b);
        assert!(sub.coord(0).equals_2d(&Coord::new(0.0, 0.0)));
        let last = sub.coord(sub.num_points() - 1);
        assert!(last.equals_2d(&Coord::new(10.0, 0.0)));
    }
}
