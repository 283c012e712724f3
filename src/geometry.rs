// topo2d: planar topology graph and distance engine
// License: MIT
//
// The geometry model: a tagged sum over the seven OGC kinds, plus the
// decomposition helpers (component lines, points, polygons) the topology and
// distance passes are built on. Geometries are immutable inputs; nothing in
// the engine mutates one.

use crate::geom::{BoundingBox, Coord, Real};

/// An ordered vertex sequence: a line, or one ring of a polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct LineString {
    pub coords: Vec<Coord>,
}

impl LineString {
    pub fn new(coords: Vec<Coord>) -> Self {
        LineString { coords }
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn coord(&self, i: usize) -> &Coord {
        &self.coords[i]
    }

    /// Number of segments; 0 for degenerate lines.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.coords.len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.coords.len() > 1
            && self.coords[0].equals_2d(&self.coords[self.coords.len() - 1])
    }

    /// Ring orientation by signed area; true for counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        let n = self.coords.len();
        if n < 4 {
            return false;
        }
        let mut sum = 0.0;
        for i in 0..n - 1 {
            let p0 = &self.coords[i];
            let p1 = &self.coords[i + 1];
            sum += (p1.x - p0.x) * (p1.y + p0.y);
        }
        sum < 0.0
    }

    pub fn length(&self) -> Real {
        let mut total = 0.0;
        for i in 0..self.segment_count() {
            total += self.coords[i].distance(&self.coords[i + 1]);
        }
        total
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_coords(&self.coords)
    }
}

/// An areal geometry: one shell ring plus any number of hole rings.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub shell: LineString,
    pub holes: Vec<LineString>,
}

impl Polygon {
    pub fn new(shell: LineString, holes: Vec<LineString>) -> Self {
        Polygon { shell, holes }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// Shell first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &LineString> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.shell.bounding_box()
    }
}

/// A vector geometry value. Collections may nest arbitrarily.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::LineString(l) => l.is_empty(),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPoint(pts) => pts.is_empty(),
            Geometry::MultiLineString(ls) => ls.iter().all(|l| l.is_empty()),
            Geometry::MultiPolygon(ps) => ps.iter().all(|p| p.is_empty()),
            Geometry::Collection(gs) => gs.iter().all(|g| g.is_empty()),
        }
    }

    /// True when any part of the geometry has areal dimension.
    pub fn has_area(&self) -> bool {
        match self {
            Geometry::Polygon(p) => !p.is_empty(),
            Geometry::MultiPolygon(ps) => ps.iter().any(|p| !p.is_empty()),
            Geometry::Collection(gs) => gs.iter().any(|g| g.has_area()),
            _ => false,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        match self {
            Geometry::Point(p) => bb.expand_to_include(p),
            Geometry::LineString(l) => bb = l.bounding_box(),
            Geometry::Polygon(p) => bb = p.bounding_box(),
            Geometry::MultiPoint(pts) => {
                for p in pts {
                    bb.expand_to_include(p);
                }
            }
            Geometry::MultiLineString(ls) => {
                for l in ls {
                    bb.expand_to_include_box(&l.bounding_box());
                }
            }
            Geometry::MultiPolygon(ps) => {
                for p in ps {
                    bb.expand_to_include_box(&p.bounding_box());
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    bb.expand_to_include_box(&g.bounding_box());
                }
            }
        }
        bb
    }

    /// All lineal components, including polygon rings. These are the line
    /// facets of the geometry, the atomic units of the distance scan.
    pub fn lines(&self) -> Vec<&LineString> {
        let mut out = Vec::new();
        self.collect_lines(&mut out);
        out
    }

    fn collect_lines<'a>(&'a self, out: &mut Vec<&'a LineString>) {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::LineString(l) => {
                if !l.is_empty() {
                    out.push(l);
                }
            }
            Geometry::Polygon(p) => {
                out.extend(p.rings().filter(|r| !r.is_empty()));
            }
            Geometry::MultiLineString(ls) => {
                out.extend(ls.iter().filter(|l| !l.is_empty()));
            }
            Geometry::MultiPolygon(ps) => {
                for p in ps {
                    out.extend(p.rings().filter(|r| !r.is_empty()));
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    g.collect_lines(out);
                }
            }
        }
    }

    /// All point components (the point facets of the geometry).
    pub fn points(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        self.collect_points(&mut out);
        out
    }

    fn collect_points(&self, out: &mut Vec<Coord>) {
        match self {
            Geometry::Point(p) => out.push(*p),
            Geometry::MultiPoint(pts) => out.extend_from_slice(pts),
            Geometry::Collection(gs) => {
                for g in gs {
                    g.collect_points(out);
                }
            }
            _ => {}
        }
    }

    /// All polygonal components, recursing through collections.
    pub fn polygons(&self) -> Vec<&Polygon> {
        let mut out = Vec::new();
        self.collect_polygons(&mut out);
        out
    }

    fn collect_polygons<'a>(&'a self, out: &mut Vec<&'a Polygon>) {
        match self {
            Geometry::Polygon(p) => {
                if !p.is_empty() {
                    out.push(p);
                }
            }
            Geometry::MultiPolygon(ps) => {
                out.extend(ps.iter().filter(|p| !p.is_empty()));
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    g.collect_polygons(out);
                }
            }
            _ => {}
        }
    }
}

/// Copies a coordinate sequence dropping consecutive 2D-equal points.
pub fn remove_repeated_points(coords: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(coords.len());
    for c in coords {
        if out.last().map_or(true, |prev| !prev.equals_2d(c)) {
            out.push(*c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> LineString {
        LineString::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(10.0, 0.0),
            Coord::new(10.0, 10.0),
            Coord::new(0.0, 10.0),
            Coord::new(0.0, 0.0),
        ])
    }

    #[test]
    fn ring_orientation() {
        let ccw = square();
        assert!(ccw.is_ccw());
        let mut cw = square();
        cw.coords.reverse();
        assert!(!cw.is_ccw());
    }

    #[test]
    fn polygon_rings_are_line_facets() {
        let poly = Geometry::Polygon(Polygon::new(square(), vec![]));
        assert_eq!(poly.lines().len(), 1);
        assert!(poly.has_area());
        assert!(poly.points().is_empty());
    }

    #[test]
    fn collection_decomposition_recurses() {
        let g = Geometry::Collection(vec![
            Geometry::Point(Coord::new(1.0, 1.0)),
            Geometry::Collection(vec![Geometry::LineString(LineString::new(vec![
                Coord::new(0.0, 0.0),
                Coord::new(1.0, 0.0),
            ]))]),
        ]);
        assert_eq!(g.points().len(), 1);
        assert_eq!(g.lines().len(), 1);
        assert!(!g.has_area());
    }

    #[test]
    fn repeated_points_removed() {
        let pts = vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(2.0, 0.0),
        ];
        assert_eq!(remove_repeated_points(&pts).len(), 3);
    }

    #[test]
    fn empty_geometries() {
        assert!(Geometry::MultiLineString(vec![]).is_empty());
        assert!(Geometry::Collection(vec![]).is_empty());
        assert!(!Geometry::Point(Coord::new(0.0, 0.0)).is_empty());
    }
}
