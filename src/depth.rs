// topo2d: planar topology graph and distance engine
// License: MIT
//
// Interior-depth counters for an edge: for each source geometry and each
// side, how many nested interiors lie on that side. Accumulated from the
// labels of all edges merged into one, then normalized down to the binary
// interior/exterior answer the relate computation needs.

use crate::label::{Label, Location, Position};

const NULL_DEPTH: i32 = -1;

/// Converts a location to its depth contribution: Exterior counts 0,
/// Interior counts 1, anything else is the null sentinel.
fn depth_at_location(location: Location) -> i32 {
    match location {
        Location::Exterior => 0,
        Location::Interior => 1,
        _ => NULL_DEPTH,
    }
}

/// A 2×3 grid of signed depth counts, indexed by (geometry, position).
/// `-1` means unknown/uninitialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Depth {
    depth: [[i32; 3]; 2],
}

impl Depth {
    pub fn new() -> Self {
        Depth {
            depth: [[NULL_DEPTH; 3]; 2],
        }
    }

    #[inline]
    pub fn depth_at(&self, geom_index: usize, pos: Position) -> i32 {
        self.depth[geom_index][pos.index()]
    }

    pub fn set_depth(&mut self, geom_index: usize, pos: Position, value: i32) {
        self.depth[geom_index][pos.index()] = value;
    }

    /// The side is interior exactly when its count is positive.
    pub fn location_at(&self, geom_index: usize, pos: Position) -> Location {
        if self.depth[geom_index][pos.index()] <= 0 {
            Location::Exterior
        } else {
            Location::Interior
        }
    }

    /// Bump one cell by one if the location is Interior.
    pub fn add_location(&mut self, geom_index: usize, pos: Position, location: Location) {
        if location == Location::Interior {
            self.depth[geom_index][pos.index()] += 1;
        }
    }

    /// Accumulate the side locations of a label. A null cell is initialized
    /// from the location's depth value; a non-null cell is incremented, so
    /// repeated overlapping rings sum rather than overwrite.
    pub fn add(&mut self, label: &Label) {
        for g in 0..2 {
            for pos in [Position::Left, Position::Right] {
                let loc = label.location(g, pos);
                if loc == Location::Exterior || loc == Location::Interior {
                    let cell = &mut self.depth[g][pos.index()];
                    if *cell == NULL_DEPTH {
                        *cell = depth_at_location(loc);
                    } else {
                        *cell += depth_at_location(loc);
                    }
                }
            }
        }
    }

    pub fn is_null(&self) -> bool {
        self.depth.iter().flatten().all(|&d| d == NULL_DEPTH)
    }

    pub fn is_null_for(&self, geom_index: usize) -> bool {
        self.depth[geom_index][Position::On.index()] == NULL_DEPTH
            && self.depth[geom_index][Position::Left.index()] == NULL_DEPTH
            && self.depth[geom_index][Position::Right.index()] == NULL_DEPTH
    }

    pub fn is_null_at(&self, geom_index: usize, pos: Position) -> bool {
        self.depth[geom_index][pos.index()] == NULL_DEPTH
    }

    /// Net interior-depth change crossing the edge right to left.
    pub fn delta(&self, geom_index: usize) -> i32 {
        self.depth[geom_index][Position::Right.index()]
            - self.depth[geom_index][Position::Left.index()]
    }

    /// Reduce each geometry's side counts to {0, 1}: with
    /// `m = max(0, min(left, right))`, a side becomes 1 exactly when its raw
    /// count exceeds `m`. Collapses arbitrarily deep ring nesting into the
    /// binary interior/exterior answer.
    pub fn normalize(&mut self) {
        for g in 0..2 {
            if self.is_null_for(g) {
                continue;
            }
            let left = self.depth[g][Position::Left.index()];
            let right = self.depth[g][Position::Right.index()];
            let min_depth = left.min(right).max(0);
            for pos in [Position::Left, Position::Right] {
                let cell = &mut self.depth[g][pos.index()];
                *cell = if *cell > min_depth { 1 } else { 0 };
            }
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::new()
    }
}
