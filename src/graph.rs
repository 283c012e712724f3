// topo2d: planar topology graph and distance engine
// License: MIT
//
// The geometry graph: decomposes one input geometry into labelled edges and
// nodes, runs the pairwise intersection pass against another graph (or
// itself), and materializes split edges. Two graphs (argument indices 0 and
// 1) together describe one topology query.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::edge::Edge;
use crate::error::Result;
use crate::geom::Coord;
use crate::geometry::{remove_repeated_points, Geometry, LineString, Polygon};
use crate::intersector::LineIntersector;
use crate::label::{Label, Location};
use crate::locate::PointLocator;

/// Ordered 2D key for node dedup.
#[derive(Copy, Clone, Debug)]
struct CoordKey(Coord);

impl PartialEq for CoordKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.compare_2d(&other.0).is_eq()
    }
}
impl Eq for CoordKey {}
impl PartialOrd for CoordKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for CoordKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.compare_2d(&other.0)
    }
}

/// A point where edges meet or cross, with its accumulated label.
#[derive(Clone, Debug)]
pub struct Node {
    pub coord: Coord,
    pub label: Label,
}

// ─────────────────────────── SegmentIntersector ───────────────────────────

/// Drives the external line intersector over candidate segment pairs and
/// records the discovered intersections into both edges' intersection
/// lists. Tracks summary flags the relate/intersects predicates consume.
pub struct SegmentIntersector {
    li: LineIntersector,
    include_proper: bool,
    record_isolated: bool,
    has_intersection: bool,
    has_proper: bool,
    has_proper_interior: bool,
    proper_intersection_point: Option<Coord>,
    boundary_nodes: Option<[Vec<Coord>; 2]>,
    num_tests: usize,
}

impl SegmentIntersector {
    pub fn new(include_proper: bool, record_isolated: bool) -> Self {
        SegmentIntersector {
            li: LineIntersector::new(),
            include_proper,
            record_isolated,
            has_intersection: false,
            has_proper: false,
            has_proper_interior: false,
            proper_intersection_point: None,
            boundary_nodes: None,
            num_tests: 0,
        }
    }

    pub fn set_boundary_nodes(&mut self, nodes0: Vec<Coord>, nodes1: Vec<Coord>) {
        self.boundary_nodes = Some([nodes0, nodes1]);
    }

    pub fn has_intersection(&self) -> bool {
        self.has_intersection
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    /// A proper intersection not lying on a boundary node of either input.
    pub fn has_proper_interior_intersection(&self) -> bool {
        self.has_proper_interior
    }

    pub fn proper_intersection_point(&self) -> Option<&Coord> {
        self.proper_intersection_point.as_ref()
    }

    pub fn num_tests(&self) -> usize {
        self.num_tests
    }

    /// Intersect segment `s0` of `e0` against segment `s1` of `e1`
    /// (edges from different graphs or different edges of one graph).
    fn add_intersections(
        &mut self,
        e0: &mut Edge,
        s0: usize,
        e1: &mut Edge,
        s1: usize,
    ) -> Result<()> {
        self.num_tests += 1;
        self.li.compute_intersection(
            e0.coord(s0),
            e0.coord(s0 + 1),
            e1.coord(s1),
            e1.coord(s1 + 1),
        );
        if !self.li.has_intersection() {
            return Ok(());
        }
        if self.record_isolated {
            e0.is_isolated = false;
            e1.is_isolated = false;
        }
        self.has_intersection = true;
        if self.include_proper || !self.li.is_proper() {
            e0.add_intersections(&self.li, s0, 0)?;
            e1.add_intersections(&self.li, s1, 1)?;
        }
        self.note_proper();
        Ok(())
    }

    /// Intersect two segments of the same edge, skipping trivial
    /// self-touches (adjacent segments, and the closing vertex of a ring).
    fn add_self_intersections(&mut self, e: &mut Edge, s0: usize, s1: usize) -> Result<()> {
        if s0 == s1 {
            return Ok(());
        }
        self.num_tests += 1;
        let (p00, p01) = (*e.coord(s0), *e.coord(s0 + 1));
        let (p10, p11) = (*e.coord(s1), *e.coord(s1 + 1));
        self.li.compute_intersection(&p00, &p01, &p10, &p11);
        if !self.li.has_intersection() {
            return Ok(());
        }
        if self.is_trivial_self_intersection(e, s0, s1) {
            return Ok(());
        }
        self.has_intersection = true;
        if self.include_proper || !self.li.is_proper() {
            e.add_intersections(&self.li, s0, 0)?;
            e.add_intersections(&self.li, s1, 1)?;
        }
        self.note_proper();
        Ok(())
    }

    /// A single-point intersection between adjacent segments of one edge,
    /// or between the first and last segments of a closed edge, carries no
    /// topological information.
    fn is_trivial_self_intersection(&self, e: &Edge, s0: usize, s1: usize) -> bool {
        if self.li.intersection_count() != 1 {
            return false;
        }
        let adjacent = s0.abs_diff(s1) == 1;
        if adjacent {
            return true;
        }
        if e.is_closed() {
            let max = e.max_segment_index();
            let wraps = (s0 == 0 && s1 == max - 1) || (s1 == 0 && s0 == max - 1);
            if wraps {
                return true;
            }
        }
        false
    }

    fn note_proper(&mut self) {
        if self.li.is_proper() {
            self.proper_intersection_point = Some(*self.li.intersection(0));
            self.has_proper = true;
            if !self.is_boundary_point() {
                self.has_proper_interior = true;
            }
        }
    }

    fn is_boundary_point(&self) -> bool {
        let Some(bdy) = &self.boundary_nodes else {
            return false;
        };
        let pt = self.li.intersection(0);
        bdy.iter()
            .flatten()
            .any(|node| node.equals_2d(pt))
    }
}

// ───────────────────────────── GeometryGraph ──────────────────────────────

/// A graph modelling one input geometry of a topology query.
pub struct GeometryGraph<'g> {
    arg_index: usize,
    geometry: &'g Geometry,
    pub edges: Vec<Edge>,
    nodes: BTreeMap<CoordKey, Node>,
    /// All collections except MultiPolygons obey the mod-2 boundary rule.
    use_boundary_determination_rule: bool,
    has_too_few_points: bool,
    invalid_point: Option<Coord>,
}

impl<'g> GeometryGraph<'g> {
    pub fn new(arg_index: usize, geometry: &'g Geometry) -> Self {
        let mut graph = GeometryGraph {
            arg_index,
            geometry,
            edges: Vec::new(),
            nodes: BTreeMap::new(),
            use_boundary_determination_rule: true,
            has_too_few_points: false,
            invalid_point: None,
        };
        if !geometry.is_empty() {
            graph.add(geometry);
        }
        debug!(
            "geometry graph {} built: {} edges, {} nodes",
            arg_index,
            graph.edges.len(),
            graph.nodes.len()
        );
        graph
    }

    pub fn geometry(&self) -> &Geometry {
        self.geometry
    }

    pub fn has_too_few_points(&self) -> bool {
        self.has_too_few_points
    }

    pub fn invalid_point(&self) -> Option<&Coord> {
        self.invalid_point.as_ref()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Coordinates of the nodes on this geometry's boundary.
    pub fn boundary_nodes(&self) -> Vec<Coord> {
        self.nodes
            .values()
            .filter(|n| n.label.location_on(self.arg_index) == Location::Boundary)
            .map(|n| n.coord)
            .collect()
    }

    fn add(&mut self, geometry: &Geometry) {
        match geometry {
            Geometry::Point(p) => self.insert_point(*p, Location::Interior),
            Geometry::MultiPoint(pts) => {
                for p in pts {
                    self.insert_point(*p, Location::Interior);
                }
            }
            Geometry::LineString(line) => self.add_line_string(line),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.add_line_string(line);
                }
            }
            Geometry::Polygon(poly) => self.add_polygon(poly),
            Geometry::MultiPolygon(polys) => {
                self.use_boundary_determination_rule = false;
                for poly in polys {
                    self.add_polygon(poly);
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    if !g.is_empty() {
                        self.add(g);
                    }
                }
            }
        }
    }

    fn add_line_string(&mut self, line: &LineString) {
        let coords = remove_repeated_points(&line.coords);
        if coords.len() < 2 {
            self.has_too_few_points = true;
            self.invalid_point = coords.first().copied();
            return;
        }
        let first = coords[0];
        let last = coords[coords.len() - 1];
        // line edges carry no side locations
        self.edges.push(Edge::new(
            coords,
            Some(Label::new_on(self.arg_index, Location::Interior)),
        ));
        // endpoints are candidate boundary points even on a closed line
        self.insert_boundary_point(first);
        self.insert_boundary_point(last);
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        self.add_polygon_ring(&polygon.shell, Location::Exterior, Location::Interior);
        for hole in &polygon.holes {
            // the polygon interior lies on the opposite side of a hole ring
            self.add_polygon_ring(hole, Location::Interior, Location::Exterior);
        }
    }

    /// The left/right arguments assume a clockwise ring; a counter-clockwise
    /// ring swaps them.
    fn add_polygon_ring(&mut self, ring: &LineString, cw_left: Location, cw_right: Location) {
        if ring.is_empty() {
            return;
        }
        let coords = remove_repeated_points(&ring.coords);
        if coords.len() < 4 {
            self.has_too_few_points = true;
            self.invalid_point = coords.first().copied();
            return;
        }
        let (left, right) = if LineString::new(coords.clone()).is_ccw() {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let first = coords[0];
        self.edges.push(Edge::new(
            coords,
            Some(Label::new_area(
                self.arg_index,
                Location::Boundary,
                left,
                right,
            )),
        ));
        self.insert_point(first, Location::Boundary);
    }

    fn insert_point(&mut self, coord: Coord, on_location: Location) {
        let arg = self.arg_index;
        self.nodes
            .entry(CoordKey(coord))
            .and_modify(|n| n.label.set_location_on(arg, on_location))
            .or_insert_with(|| Node {
                coord,
                label: Label::new_on(arg, on_location),
            });
    }

    /// Mod-2 boundary determination: a point occurring on an odd number of
    /// component boundaries is a boundary point, an even number interior.
    fn insert_boundary_point(&mut self, coord: Coord) {
        let arg = self.arg_index;
        let node = self
            .nodes
            .entry(CoordKey(coord))
            .or_insert_with(|| Node {
                coord,
                label: Label::new_on(arg, Location::None),
            });
        let mut boundary_count = 1;
        if node.label.location_on(arg) == Location::Boundary {
            boundary_count += 1;
        }
        let new_loc = if boundary_count % 2 == 1 {
            Location::Boundary
        } else {
            Location::Interior
        };
        node.label.set_location_on(arg, new_loc);
    }

    fn is_boundary_node(&self, coord: &Coord) -> bool {
        self.nodes
            .get(&CoordKey(*coord))
            .map(|n| n.label.location_on(self.arg_index) == Location::Boundary)
            .unwrap_or(false)
    }

    /// Compute self-intersection nodes for this geometry's own edges.
    pub fn compute_self_nodes(&mut self, compute_ring_self_nodes: bool) -> Result<SegmentIntersector> {
        let mut si = SegmentIntersector::new(true, false);
        let skip_rings = !compute_ring_self_nodes && self.geometry.has_area()
            && self.geometry.lines().iter().all(|l| l.is_closed());

        let n = self.edges.len();
        for i in 0..n {
            // self-crossings within one edge (rings assumed valid if so requested)
            if !skip_rings {
                let segs = self.edges[i].max_segment_index();
                for s0 in 0..segs {
                    for s1 in s0 + 1..segs {
                        si.add_self_intersections(&mut self.edges[i], s0, s1)?;
                    }
                }
            }
            // crossings between distinct edges of this geometry
            for j in i + 1..n {
                let pairs = self.overlap_pairs(i, &self.edges[j]);
                let (head, tail) = self.edges.split_at_mut(j);
                let e0 = &mut head[i];
                let e1 = &mut tail[0];
                for (s0, s1) in pairs {
                    si.add_intersections(e0, s0, e1, s1)?;
                }
            }
        }
        self.add_self_intersection_nodes();
        Ok(si)
    }

    /// Compute intersections between this graph's edges and another
    /// graph's, recording them into both edge sets.
    pub fn compute_edge_intersections(
        &mut self,
        other: &mut GeometryGraph<'_>,
        include_proper: bool,
    ) -> Result<SegmentIntersector> {
        let mut si = SegmentIntersector::new(include_proper, true);
        si.set_boundary_nodes(self.boundary_nodes(), other.boundary_nodes());

        for i in 0..self.edges.len() {
            for j in 0..other.edges.len() {
                if !self.edges[i]
                    .bounding_box()
                    .intersects(other.edges[j].bounding_box())
                {
                    continue;
                }
                let pairs = self.overlap_pairs(i, &other.edges[j]);
                for (s0, s1) in pairs {
                    si.add_intersections(&mut self.edges[i], s0, &mut other.edges[j], s1)?;
                }
            }
        }
        trace!(
            "edge intersection pass: {} segment tests, intersection={}",
            si.num_tests(),
            si.has_intersection()
        );
        Ok(si)
    }

    /// Candidate segment pairs between edge `i` of this graph and `other`,
    /// pruned through both edges' monotone-chain indexes.
    fn overlap_pairs(&self, i: usize, other: &Edge) -> Vec<(usize, usize)> {
        let e0 = &self.edges[i];
        let mut pairs = Vec::new();
        e0.monotone_chain().compute_overlaps(
            e0.coords(),
            other.monotone_chain(),
            other.coords(),
            &mut |a, b| pairs.push((a, b)),
        );
        pairs
    }

    /// Promote recorded self-intersections to nodes. A potential boundary
    /// node goes through the boundary-determination rule; existing boundary
    /// nodes are left untouched.
    fn add_self_intersection_nodes(&mut self) {
        let arg = self.arg_index;
        let mut pending: Vec<(Coord, Location)> = Vec::new();
        for e in &self.edges {
            let loc = e
                .label
                .map(|l| l.location_on(arg))
                .unwrap_or(Location::None);
            for ei in e.intersections.iter() {
                pending.push((ei.coord, loc));
            }
        }
        for (coord, loc) in pending {
            if self.is_boundary_node(&coord) {
                continue;
            }
            if loc == Location::Boundary && self.use_boundary_determination_rule {
                self.insert_boundary_point(coord);
            } else {
                self.insert_point(coord, loc);
            }
        }
    }

    /// Append the split sub-edges of every edge, discarding collapsed
    /// zero-width artifacts first.
    pub fn split_edges(&mut self, out: &mut Vec<Edge>) {
        for e in &mut self.edges {
            if e.is_collapsed() {
                trace!("discarding collapsed edge");
                continue;
            }
            e.add_split_edges(out);
        }
    }
}

/// Tests whether two geometries share any point: bounding-box reject, then
/// vertex-in-area containment, point-on-geometry membership, and finally
/// the pairwise edge-intersection pass.
pub fn intersects(g0: &Geometry, g1: &Geometry) -> Result<bool> {
    if g0.is_empty() || g1.is_empty() {
        return Ok(false);
    }
    if !g0.bounding_box().intersects(&g1.bounding_box()) {
        return Ok(false);
    }
    // areal containment: a vertex of one inside the other
    for (area, other) in [(g0, g1), (g1, g0)] {
        if area.has_area() {
            for line in other.lines() {
                if line
                    .coords
                    .iter()
                    .any(|c| PointLocator::locate(c, area) != Location::Exterior)
                {
                    return Ok(true);
                }
            }
        }
    }
    // point components against the other geometry
    for (pts, target) in [(g0.points(), g1), (g1.points(), g0)] {
        if pts
            .iter()
            .any(|p| PointLocator::locate(p, target) != Location::Exterior)
        {
            return Ok(true);
        }
    }
    // lineal crossings
    let mut graph0 = GeometryGraph::new(0, g0);
    let mut graph1 = GeometryGraph::new(1, g1);
    let si = graph0.compute_edge_intersections(&mut graph1, true)?;
    Ok(si.has_intersection())
}
