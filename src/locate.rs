// topo2d: planar topology graph and distance engine
// License: MIT
//
// Point location: ray-crossing point-in-ring and the whole-geometry point
// locator used by the distance containment shortcut and the intersects
// predicate.

use crate::geom::{distance_point_segment, Coord};
use crate::geometry::{Geometry, LineString, Polygon};
use crate::label::Location;

/// Locates a point relative to a closed ring using the ray-crossing rule.
/// Points exactly on a ring segment report `Boundary`.
pub fn locate_point_in_ring(p: &Coord, ring: &[Coord]) -> Location {
    let mut crossings = 0u32;
    for i in 1..ring.len() {
        let p1 = &ring[i];
        let p2 = &ring[i - 1];

        if p1.x < p.x && p2.x < p.x {
            continue;
        }
        if p.equals_2d(p2) {
            return Location::Boundary;
        }
        if p1.y == p.y && p2.y == p.y {
            // horizontal segment at the query height
            let (min_x, max_x) = if p1.x < p2.x { (p1.x, p2.x) } else { (p2.x, p1.x) };
            if min_x <= p.x && p.x <= max_x {
                return Location::Boundary;
            }
            continue;
        }
        // does the segment straddle the rightward ray from p?
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let det = (p1.x - p.x) * (p2.y - p.y) - (p1.y - p.y) * (p2.x - p.x);
            if det == 0.0 {
                return Location::Boundary;
            }
            let mut sign = if det > 0.0 { 1 } else { -1 };
            if p2.y < p1.y {
                sign = -sign;
            }
            if sign > 0 {
                crossings += 1;
            }
        }
    }
    if crossings % 2 == 1 {
        Location::Interior
    } else {
        Location::Exterior
    }
}

/// Locates a point relative to a polygon, honouring holes.
pub fn locate_point_in_polygon(p: &Coord, polygon: &Polygon) -> Location {
    if polygon.is_empty() {
        return Location::Exterior;
    }
    match locate_point_in_ring(p, &polygon.shell.coords) {
        Location::Exterior => Location::Exterior,
        Location::Boundary => Location::Boundary,
        _ => {
            for hole in &polygon.holes {
                match locate_point_in_ring(p, &hole.coords) {
                    Location::Interior => return Location::Exterior,
                    Location::Boundary => return Location::Boundary,
                    _ => {}
                }
            }
            Location::Interior
        }
    }
}

fn locate_point_on_line(p: &Coord, line: &LineString) -> Location {
    for i in 0..line.segment_count() {
        if distance_point_segment(p, line.coord(i), line.coord(i + 1)) == 0.0 {
            // endpoints of an open line are its boundary
            if !line.is_closed()
                && (p.equals_2d(line.coord(0)) || p.equals_2d(line.coord(line.num_points() - 1)))
            {
                return Location::Boundary;
            }
            return Location::Interior;
        }
    }
    Location::Exterior
}

/// Locates a point relative to an arbitrary geometry. Boundary membership
/// across multi-part geometries follows the mod-2 rule: a point on an odd
/// number of component boundaries is on the boundary of the whole.
pub struct PointLocator;

impl PointLocator {
    pub fn locate(p: &Coord, geometry: &Geometry) -> Location {
        if geometry.is_empty() {
            return Location::Exterior;
        }
        // single components short-circuit the counting pass
        match geometry {
            Geometry::Point(pt) => {
                return if pt.equals_2d(p) {
                    Location::Interior
                } else {
                    Location::Exterior
                };
            }
            Geometry::LineString(line) => return locate_point_on_line(p, line),
            Geometry::Polygon(poly) => return locate_point_in_polygon(p, poly),
            _ => {}
        }

        let mut is_in = false;
        let mut boundary_count = 0u32;
        Self::update(p, geometry, &mut is_in, &mut boundary_count);
        if boundary_count % 2 == 1 {
            Location::Boundary
        } else if is_in {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    fn update(p: &Coord, geometry: &Geometry, is_in: &mut bool, boundary_count: &mut u32) {
        let mut note = |loc: Location| match loc {
            Location::Interior => *is_in = true,
            Location::Boundary => *boundary_count += 1,
            _ => {}
        };
        match geometry {
            Geometry::Point(pt) => {
                if pt.equals_2d(p) {
                    *is_in = true;
                }
            }
            Geometry::MultiPoint(pts) => {
                if pts.iter().any(|pt| pt.equals_2d(p)) {
                    *is_in = true;
                }
            }
            Geometry::LineString(line) => note(locate_point_on_line(p, line)),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    note(locate_point_on_line(p, line));
                }
            }
            Geometry::Polygon(poly) => note(locate_point_in_polygon(p, poly)),
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    note(locate_point_in_polygon(p, poly));
                }
            }
            Geometry::Collection(gs) => {
                for g in gs {
                    Self::update(p, g, is_in, boundary_count);
                }
            }
        }
    }
}
