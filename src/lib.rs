// topo2d: planar topology graph and distance engine
// License: MIT

pub mod chain;
pub mod depth;
pub mod distance;
pub mod edge;
pub mod error;
pub mod geom;
pub mod geometry;
pub mod graph;
pub mod intersector;
pub mod label;
pub mod linearref;
pub mod locate;
pub mod relate;

pub use distance::{DistanceOp, GeometryLocation, INSIDE_AREA};
pub use error::{Error, Result};
pub use geom::{BoundingBox, Coord, Real};
pub use geometry::{Geometry, LineString, Polygon};
pub use graph::{intersects, GeometryGraph};
pub use intersector::LineIntersector;
pub use label::{Label, Location, Position};
pub use linearref::{LineStringLocation, LocationOfPoint, MaximalNearestSubline};
pub use locate::PointLocator;
pub use relate::IntersectionMatrix;
