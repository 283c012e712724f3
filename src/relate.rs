// topo2d: planar topology graph and distance engine
// License: MIT
//
// The dimensionally-extended 9-intersection matrix: for each pairing of
// (interior, boundary, exterior) of two geometries, the dimension of their
// intersection. Labels accumulated on graph edges and nodes update the
// matrix one element at a time.

use crate::error::{Error, Result};
use crate::label::{Label, Location, Position};

/// Dimension values for matrix entries and pattern symbols.
pub mod dimension {
    /// No intersection.
    pub const FALSE: i8 = -1;
    /// Intersection of unknown dimension (patterns only).
    pub const TRUE: i8 = -2;
    /// Any value accepted (patterns only).
    pub const DONTCARE: i8 = -3;
    pub const POINT: i8 = 0;
    pub const LINE: i8 = 1;
    pub const AREA: i8 = 2;

    pub fn from_symbol(symbol: char) -> Option<i8> {
        match symbol {
            'F' | 'f' => Some(FALSE),
            'T' | 't' => Some(TRUE),
            '*' => Some(DONTCARE),
            '0' => Some(POINT),
            '1' => Some(LINE),
            '2' => Some(AREA),
            _ => None,
        }
    }
}

/// Matrix row/column for a location; `None` has no row.
fn location_index(loc: Location) -> Option<usize> {
    match loc {
        Location::Interior => Some(0),
        Location::Boundary => Some(1),
        Location::Exterior => Some(2),
        Location::None => None,
    }
}

fn matches_dimension(actual: i8, required: i8) -> bool {
    match required {
        dimension::DONTCARE => true,
        dimension::TRUE => actual >= 0 || actual == dimension::TRUE,
        _ => actual == required,
    }
}

/// The 3×3 relate matrix. Rows index the first geometry's
/// interior/boundary/exterior, columns the second's.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IntersectionMatrix {
    matrix: [[i8; 3]; 3],
}

impl IntersectionMatrix {
    pub fn new() -> Self {
        IntersectionMatrix {
            matrix: [[dimension::FALSE; 3]; 3],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.matrix[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, dim: i8) {
        self.matrix[row][col] = dim;
    }

    /// Raise an element to at least the given dimension.
    pub fn set_at_least(&mut self, row: usize, col: usize, min_dim: i8) {
        if self.matrix[row][col] < min_dim {
            self.matrix[row][col] = min_dim;
        }
    }

    /// `set_at_least` guarded on both locations being known.
    pub fn set_at_least_if_valid(&mut self, loc_a: Location, loc_b: Location, min_dim: i8) {
        if let (Some(row), Some(col)) = (location_index(loc_a), location_index(loc_b)) {
            self.set_at_least(row, col, min_dim);
        }
    }

    /// Matches this matrix against a 9-character DE-9IM pattern such as
    /// `"T*F**FFF*"`.
    pub fn matches(&self, pattern: &str) -> Result<bool> {
        if pattern.len() != 9 {
            return Err(Error::InvalidArgument(format!(
                "relate pattern must have 9 characters: {pattern:?}"
            )));
        }
        for (i, symbol) in pattern.chars().enumerate() {
            let required = dimension::from_symbol(symbol).ok_or_else(|| {
                Error::InvalidArgument(format!("bad relate pattern symbol {symbol:?}"))
            })?;
            if !matches_dimension(self.matrix[i / 3][i % 3], required) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    pub fn is_disjoint(&self) -> bool {
        self.matrix[0][0] == dimension::FALSE
            && self.matrix[0][1] == dimension::FALSE
            && self.matrix[1][0] == dimension::FALSE
            && self.matrix[1][1] == dimension::FALSE
    }

    pub fn is_contains(&self) -> bool {
        self.matrix[0][0] >= 0
            && self.matrix[2][0] == dimension::FALSE
            && self.matrix[2][1] == dimension::FALSE
    }

    pub fn is_within(&self) -> bool {
        self.matrix[0][0] >= 0
            && self.matrix[0][2] == dimension::FALSE
            && self.matrix[1][2] == dimension::FALSE
    }

    /// Swap the roles of the two geometries in place.
    pub fn transpose(&mut self) {
        for row in 0..3 {
            for col in row + 1..3 {
                let tmp = self.matrix[row][col];
                self.matrix[row][col] = self.matrix[col][row];
                self.matrix[col][row] = tmp;
            }
        }
    }
}

impl Default for IntersectionMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// Update the matrix from one processed edge label: the "on" pairing gains
/// line dimension, and for an area boundary each side pairing gains area
/// dimension.
pub fn update_matrix_from_label(label: &Label, im: &mut IntersectionMatrix) {
    im.set_at_least_if_valid(
        label.location(0, Position::On),
        label.location(1, Position::On),
        dimension::LINE,
    );
    if label.is_area() {
        im.set_at_least_if_valid(
            label.location(0, Position::Left),
            label.location(1, Position::Left),
            dimension::AREA,
        );
        im.set_at_least_if_valid(
            label.location(0, Position::Right),
            label.location(1, Position::Right),
            dimension::AREA,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_matrix_is_disjoint() {
        let im = IntersectionMatrix::new();
        assert!(im.is_disjoint());
        assert!(!im.is_intersects());
    }

    #[test]
    fn pattern_matching() {
        let mut im = IntersectionMatrix::new();
        im.set(0, 0, dimension::AREA);
        assert!(im.matches("T********").unwrap());
        assert!(im.matches("2********").unwrap());
        assert!(!im.matches("1********").unwrap());
        assert!(im.matches("*********").unwrap());
        assert!(im.matches("T*F**FFF*").unwrap());
    }

    #[test]
    fn bad_pattern_is_invalid_argument() {
        let im = IntersectionMatrix::new();
        assert!(im.matches("T*F").is_err());
        assert!(im.matches("XXXXXXXXX").is_err());
    }

    #[test]
    fn label_update_raises_entries() {
        let mut im = IntersectionMatrix::new();
        let mut label = Label::new_area(0, Location::Boundary, Location::Exterior, Location::Interior);
        label.set_all_locations(1, Location::Interior);
        update_matrix_from_label(&label, &mut im);
        // boundary of A on interior of B
        assert_eq!(im.get(1, 0), dimension::LINE);
        assert!(im.is_intersects());
    }

    #[test]
    fn transpose_swaps_roles() {
        let mut im = IntersectionMatrix::new();
        im.set(0, 2, dimension::LINE);
        im.transpose();
        assert_eq!(im.get(2, 0), dimension::LINE);
        assert_eq!(im.get(0, 2), dimension::FALSE);
    }
}
