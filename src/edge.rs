// topo2d: planar topology graph and distance engine
// License: MIT
//
// The topology-graph edge: one ring or line of an input geometry, the sorted
// set of intersection points discovered against all other edges, and the
// machinery to split the edge into simple sub-edges at those points.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use log::trace;

use crate::chain::MonotoneChainEdge;
use crate::depth::Depth;
use crate::error::Result;
use crate::geom::{BoundingBox, Coord, Real};
use crate::intersector::LineIntersector;
use crate::label::Label;

// ────────────────────────────── EdgeIntersection ──────────────────────────

/// A location along an edge: the intersection point, the index of the
/// segment it lies on, and its distance along that segment.
///
/// Ordering and equality are by `(segment_index, dist)` only; the coordinate
/// is derived data. Intersections landing exactly on a vertex are normalized
/// (before construction) to the later segment with distance 0, which keeps
/// this ordering deterministic regardless of which adjacent segment reported
/// the hit.
#[derive(Copy, Clone, Debug)]
pub struct EdgeIntersection {
    pub coord: Coord,
    pub segment_index: usize,
    pub dist: Real,
}

impl EdgeIntersection {
    pub fn new(coord: Coord, segment_index: usize, dist: Real) -> Self {
        EdgeIntersection {
            coord,
            segment_index,
            dist,
        }
    }

    pub fn is_end_point(&self, max_segment_index: usize) -> bool {
        (self.segment_index == 0 && self.dist == 0.0) || self.segment_index == max_segment_index
    }
}

impl PartialEq for EdgeIntersection {
    fn eq(&self, other: &Self) -> bool {
        self.segment_index == other.segment_index && self.dist.total_cmp(&other.dist).is_eq()
    }
}

impl Eq for EdgeIntersection {}

impl PartialOrd for EdgeIntersection {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeIntersection {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| self.dist.total_cmp(&other.dist))
    }
}

// ──────────────────────────── EdgeIntersectionList ────────────────────────

/// The sorted, deduplicated set of locations where an edge is crossed.
/// Owned by exactly one edge; iteration always yields intersections in
/// order along the edge, start to end.
#[derive(Clone, Debug, Default)]
pub struct EdgeIntersectionList {
    set: BTreeSet<EdgeIntersection>,
}

impl EdgeIntersectionList {
    pub fn new() -> Self {
        EdgeIntersectionList {
            set: BTreeSet::new(),
        }
    }

    /// Insert a location; repeated reports of the same normalized location
    /// are idempotent.
    pub fn add(&mut self, coord: Coord, segment_index: usize, dist: Real) {
        self.set
            .insert(EdgeIntersection::new(coord, segment_index, dist));
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeIntersection> {
        self.set.iter()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// True if the given coordinate is one of the recorded intersections.
    pub fn is_intersection(&self, pt: &Coord) -> bool {
        self.set.iter().any(|ei| ei.coord.equals_2d(pt))
    }
}

// ──────────────────────────────────── Edge ────────────────────────────────

/// One ring or line of an input geometry, as a graph edge. Created once per
/// boundary/line; absorbs intersection points found against other edges;
/// replaced by its split sub-edges during graph construction and never
/// mutated afterwards.
#[derive(Debug)]
pub struct Edge {
    pts: Vec<Coord>,
    pub label: Option<Label>,
    pub intersections: EdgeIntersectionList,
    pub depth: Depth,
    /// Net interior-depth change crossing this edge right to left.
    pub depth_delta: i32,
    /// True until the edge is found to border another geometry.
    pub is_isolated: bool,
    bbox: OnceCell<BoundingBox>,
    chain: OnceCell<MonotoneChainEdge>,
}

impl Edge {
    /// `pts` must hold at least two vertices.
    pub fn new(pts: Vec<Coord>, label: Option<Label>) -> Self {
        debug_assert!(pts.len() >= 2, "edge needs at least 2 points");
        Edge {
            pts,
            label,
            intersections: EdgeIntersectionList::new(),
            depth: Depth::new(),
            depth_delta: 0,
            is_isolated: true,
            bbox: OnceCell::new(),
            chain: OnceCell::new(),
        }
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn coord(&self, i: usize) -> &Coord {
        &self.pts[i]
    }

    #[inline]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    pub fn max_segment_index(&self) -> usize {
        self.pts.len() - 1
    }

    pub fn is_closed(&self) -> bool {
        self.pts[0].equals_2d(&self.pts[self.pts.len() - 1])
    }

    /// A collapsed edge is a zero-width spike produced by an area ring:
    /// exactly three vertices with the first equal to the third. Discarded
    /// before relate computation.
    pub fn is_collapsed(&self) -> bool {
        match &self.label {
            Some(label) if label.is_area() => {
                self.pts.len() == 3 && self.pts[0].equals_2d(&self.pts[2])
            }
            _ => false,
        }
    }

    /// Computed once on first access; the vertex sequence is immutable.
    pub fn bounding_box(&self) -> &BoundingBox {
        self.bbox.get_or_init(|| BoundingBox::from_coords(&self.pts))
    }

    /// Computed once on first access.
    pub fn monotone_chain(&self) -> &MonotoneChainEdge {
        self.chain.get_or_init(|| MonotoneChainEdge::new(&self.pts))
    }

    /// Record every intersection point the intersector reported for the
    /// given segment of this edge. `geom_index` selects which of the
    /// intersector's two input segments belongs to this edge.
    pub fn add_intersections(
        &mut self,
        li: &LineIntersector,
        segment_index: usize,
        geom_index: usize,
    ) -> Result<()> {
        for i in 0..li.intersection_count() {
            self.add_intersection(li, segment_index, geom_index, i)?;
        }
        Ok(())
    }

    /// Record one intersection point, normalizing an exactly-on-vertex hit
    /// to the next segment index with distance 0 so the intersection
    /// ordering is independent of which adjacent segment reported it.
    pub fn add_intersection(
        &mut self,
        li: &LineIntersector,
        segment_index: usize,
        geom_index: usize,
        int_index: usize,
    ) -> Result<()> {
        let int_pt = *li.intersection(int_index);
        let mut normalized_segment = segment_index;
        let mut dist = li.edge_distance(geom_index, int_index)?;
        let next_segment = normalized_segment + 1;
        if next_segment < self.pts.len() && int_pt.equals_2d(&self.pts[next_segment]) {
            normalized_segment = next_segment;
            dist = 0.0;
        }
        self.intersections.add(int_pt, normalized_segment, dist);
        Ok(())
    }

    /// Ensure the edge's own endpoints are present in the intersection
    /// list, so iteration yields a complete partition of the edge.
    /// Idempotent.
    pub fn add_intersection_endpoints(&mut self) {
        let max_seg = self.max_segment_index();
        let first = self.pts[0];
        let last = self.pts[max_seg];
        self.intersections.add(first, 0, 0.0);
        self.intersections.add(last, max_seg, 0.0);
    }

    /// Split this edge at its recorded intersections, appending one new
    /// edge per consecutive intersection pair. Degenerate zero-length
    /// sub-edges are not filtered here.
    pub fn add_split_edges(&mut self, out: &mut Vec<Edge>) {
        self.add_intersection_endpoints();
        let eis: Vec<EdgeIntersection> = self.intersections.iter().copied().collect();
        trace!(
            "splitting edge of {} points at {} locations",
            self.pts.len(),
            eis.len()
        );
        for pair in eis.windows(2) {
            out.push(self.new_split_edge(&pair[0], &pair[1]));
        }
    }

    fn new_split_edge(&self, ei0: &EdgeIntersection, ei1: &EdgeIntersection) -> Edge {
        let mut npts = ei1.segment_index - ei0.segment_index + 2;

        // The last intersection point is normally distinct from its
        // segment's start vertex; if a floating-point dist ended up nonzero
        // while the point coincides with the vertex, keep the vertex only.
        // The check is 2D to tolerate elevation noise.
        let last_seg_start = &self.pts[ei1.segment_index];
        let use_int_pt1 = ei1.dist > 0.0 || !ei1.coord.equals_2d(last_seg_start);
        if !use_int_pt1 {
            npts -= 1;
        }

        let mut pts = Vec::with_capacity(npts);
        pts.push(ei0.coord);
        pts.extend_from_slice(&self.pts[ei0.segment_index + 1..=ei1.segment_index]);
        if use_int_pt1 {
            pts.push(ei1.coord);
        }
        Edge::new(pts, self.label)
    }

    /// Strict forward coordinate match (direction-preserving identity, used
    /// by split-edge construction).
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.pts.len() == other.pts.len()
            && self
                .pts
                .iter()
                .zip(other.pts.iter())
                .all(|(a, b)| a.equals_2d(b))
    }
}

/// Undirected identity: same coordinates forward or exactly reversed.
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        if self.pts.len() != other.pts.len() {
            return false;
        }
        let n = self.pts.len();
        let mut forward = true;
        let mut reverse = true;
        for i in 0..n {
            if !self.pts[i].equals_2d(&other.pts[i]) {
                forward = false;
            }
            if !self.pts[i].equals_2d(&other.pts[n - 1 - i]) {
                reverse = false;
            }
            if !forward && !reverse {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Location;

    fn line_edge(pts: Vec<Coord>) -> Edge {
        Edge::new(pts, Some(Label::new_on(0, Location::Interior)))
    }

    #[test]
    fn intersection_list_orders_by_segment_then_dist() {
        let mut list = EdgeIntersectionList::new();
        list.add(Coord::new(5.0, 0.0), 1, 2.5);
        list.add(Coord::new(1.0, 0.0), 0, 1.0);
        list.add(Coord::new(3.0, 0.0), 1, 0.0);
        let keys: Vec<(usize, Real)> = list.iter().map(|ei| (ei.segment_index, ei.dist)).collect();
        assert_eq!(keys, vec![(0, 1.0), (1, 0.0), (1, 2.5)]);
    }

    #[test]
    fn duplicate_locations_collapse() {
        let mut list = EdgeIntersectionList::new();
        list.add(Coord::new(5.0, 0.0), 1, 0.0);
        list.add(Coord::new(5.0, 0.0), 1, 0.0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn endpoints_are_idempotent_and_bound_the_list() {
        let mut edge = line_edge(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
        ]);
        edge.intersections.add(Coord::new(5.0, 0.0), 0, 5.0);
        edge.add_intersection_endpoints();
        edge.add_intersection_endpoints();
        assert_eq!(edge.intersections.len(), 3);
        let first = edge.intersections.iter().next().unwrap();
        let last = edge.intersections.iter().last().unwrap();
        assert!(first.coord.equals_2d(&Coord::new(0.0, 0.0)));
        assert!(last.coord.equals_2d(&Coord::new(10.0, 10.0)));
    }

    #[test]
    fn vertex_hit_normalizes_to_later_segment() {
        let mut edge = line_edge(vec![
            Coord::new(0.0, 0.0),
            Coord::new(5.0, 0.0),
            Coord::new(10.0, 0.0),
        ]);
        let mut li = LineIntersector::new();
        // crossing segment passes exactly through the shared vertex (5,0)
        li.compute_intersection(
            &Coord::new(0.0, 0.0),
            &Coord::new(5.0, 0.0),
            &Coord::new(5.0, -5.0),
            &Coord::new(5.0, 5.0),
        );
        edge.add_intersections(&li, 0, 0).unwrap();
        let ei = edge.intersections.iter().next().unwrap();
        assert_eq!(ei.segment_index, 1);
        assert_eq!(ei.dist, 0.0);
    }

    #[test]
    fn split_at_crossing_yields_two_sub_edges() {
        // (0,0)-(10,0) crossed at its midpoint
        let mut edge = line_edge(vec![Coord::new(0.0, 0.0), Coord::new(10.0, 0.0)]);
        edge.intersections.add(Coord::new(5.0, 0.0), 0, 5.0);
        let mut out = Vec::new();
        edge.add_split_edges(&mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0].coords(),
            &[Coord::new(0.0, 0.0), Coord::new(5.0, 0.0)][..]
        );
        assert_eq!(
            out[1].coords(),
            &[Coord::new(5.0, 0.0), Coord::new(10.0, 0.0)][..]
        );
    }

    #[test]
    fn split_edges_cover_original_span() {
        let mut edge = line_edge(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
        ]);
        edge.intersections.add(Coord::new(4.0, 0.0), 0, 4.0);
        edge.intersections.add(Coord::new(10.0, 7.0), 1, 7.0);
        let mut out = Vec::new();
        edge.add_split_edges(&mut out);
        assert_eq!(out.len(), 3);
        // consecutive sub-edges share endpoints; span start/end preserved
        for pair in out.windows(2) {
            let prev_last = pair[0].coord(pair[0].num_points() - 1);
            assert!(prev_last.equals_2d(pair[1].coord(0)));
        }
        assert!(out[0].coord(0).equals_2d(&Coord::new(0.0, 0.0)));
        let last = &out[out.len() - 1];
        assert!(last.coord(last.num_points() - 1).equals_2d(&Coord::new(10.0, 10.0)));
    }

    #[test]
    fn collapsed_spike_detection() {
        let spike = Edge::new(
            vec![
                Coord::new(0.0, 0.0),
                Coord::new(5.0, 5.0),
                Coord::new(0.0, 0.0),
            ],
            Some(Label::new_area(
                0,
                Location::Boundary,
                Location::Exterior,
                Location::Interior,
            )),
        );
        assert!(spike.is_collapsed());

        // a line label never collapses
        let line = line_edge(vec![
            Coord::new(0.0, 0.0),
            Coord::new(5.0, 5.0),
            Coord::new(0.0, 0.0),
        ]);
        assert!(!line.is_collapsed());
    }

    #[test]
    fn undirected_vs_pointwise_equality() {
        let forward = line_edge(vec![Coord::new(0.0, 0.0), Coord::new(10.0, 0.0)]);
        let reversed = line_edge(vec![Coord::new(10.0, 0.0), Coord::new(0.0, 0.0)]);
        assert_eq!(forward, reversed);
        assert!(!forward.is_pointwise_equal(&reversed));
        assert!(forward.is_pointwise_equal(&forward));
    }
}
