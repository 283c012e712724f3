// topo2d: planar topology graph and distance engine
// Shared builders for the integration suites.

#![allow(dead_code)]

use topo2d::{Coord, Geometry, LineString, Polygon, Real};

pub fn line(pts: &[(Real, Real)]) -> LineString {
    LineString::new(pts.iter().map(|&(x, y)| Coord::new(x, y)).collect())
}

pub fn line_geom(pts: &[(Real, Real)]) -> Geometry {
    Geometry::LineString(line(pts))
}

pub fn point_geom(x: Real, y: Real) -> Geometry {
    Geometry::Point(Coord::new(x, y))
}

/// Axis-aligned square shell, closed, counter-clockwise.
pub fn square(min_x: Real, min_y: Real, size: Real) -> Polygon {
    let max_x = min_x + size;
    let max_y = min_y + size;
    Polygon::new(
        line(&[
            (min_x, min_y),
            (max_x, min_y),
            (max_x, max_y),
            (min_x, max_y),
            (min_x, min_y),
        ]),
        Vec::new(),
    )
}

pub fn square_geom(min_x: Real, min_y: Real, size: Real) -> Geometry {
    Geometry::Polygon(square(min_x, min_y, size))
}
