// topo2d: planar topology graph and distance engine
// License: MIT
//
// Topological locations and edge labels. A Label records, for each of the
// two source geometries, where the labelled element lies relative to that
// geometry: on its boundary/interior ("on"), and for area geometries which
// location each side of the element faces.

/// Location of a point or element relative to a geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Unknown / not yet labelled.
    None,
    Interior,
    Boundary,
    Exterior,
}

/// Side positions of an edge. The numeric values index the per-side arrays
/// in `Label` and `Depth`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Position::On => 0,
            Position::Left => 1,
            Position::Right => 2,
        }
    }

    /// Left and Right swap; On is its own opposite.
    pub fn opposite(self) -> Position {
        match self {
            Position::On => Position::On,
            Position::Left => Position::Right,
            Position::Right => Position::Left,
        }
    }
}

/// Per-source-geometry location tags for a graph element: `elt[g][p]` is the
/// location relative to geometry `g` at position `p` (on/left/right).
///
/// A lineal element carries only an "on" location; an areal boundary element
/// carries all three.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Label {
    elt: [[Location; 3]; 2],
}

impl Label {
    /// Line label: geometry `geom_index` gets an "on" location only.
    pub fn new_on(geom_index: usize, on: Location) -> Self {
        let mut label = Label {
            elt: [[Location::None; 3]; 2],
        };
        label.elt[geom_index][Position::On.index()] = on;
        label
    }

    /// Area-boundary label: on/left/right locations for one geometry.
    pub fn new_area(geom_index: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Label {
            elt: [[Location::None; 3]; 2],
        };
        label.elt[geom_index] = [on, left, right];
        label
    }

    #[inline]
    pub fn location(&self, geom_index: usize, pos: Position) -> Location {
        self.elt[geom_index][pos.index()]
    }

    #[inline]
    pub fn location_on(&self, geom_index: usize) -> Location {
        self.elt[geom_index][Position::On.index()]
    }

    pub fn set_location(&mut self, geom_index: usize, pos: Position, loc: Location) {
        self.elt[geom_index][pos.index()] = loc;
    }

    pub fn set_location_on(&mut self, geom_index: usize, loc: Location) {
        self.elt[geom_index][Position::On.index()] = loc;
    }

    pub fn set_all_locations(&mut self, geom_index: usize, loc: Location) {
        self.elt[geom_index] = [loc; 3];
    }

    /// True if this label describes an area boundary for geometry
    /// `geom_index` (it has side locations).
    pub fn is_area_for(&self, geom_index: usize) -> bool {
        self.elt[geom_index][Position::Left.index()] != Location::None
    }

    /// True if either geometry labels this element as an area boundary.
    pub fn is_area(&self) -> bool {
        self.is_area_for(0) || self.is_area_for(1)
    }

    pub fn is_line(&self, geom_index: usize) -> bool {
        self.elt[geom_index][Position::On.index()] != Location::None
            && !self.is_area_for(geom_index)
    }

    /// Swap left and right locations for both geometries (used when an
    /// edge's direction is conceptually reversed).
    pub fn flip(&mut self) {
        for g in 0..2 {
            self.elt[g].swap(Position::Left.index(), Position::Right.index());
        }
    }
}
