//! Board and coordinate types.

use serde::{Deserialize, Serialize};

use crate::game::{Color, PieceId};

/// Default board side length.
pub const BOARD_SIZE: u16 = 8;

/// A coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row (0 is Black's edge).
    pub row: u16,
    /// Column.
    pub col: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    /// Signed `(row, col)` offset from `self` to `other`.
    #[must_use]
    pub fn delta_to(self, other: Coord) -> (i32, i32) {
        (
            i32::from(other.row) - i32::from(self.row),
            i32::from(other.col) - i32::from(self.col),
        )
    }

    /// Chebyshev (king-move) distance to `other`.
    #[must_use]
    pub fn chebyshev(self, other: Coord) -> i32 {
        let (dv, dh) = self.delta_to(other);
        dv.abs().max(dh.abs())
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Non-owning reference from a board cell to a player's piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    /// Piece identifier.
    pub id: PieceId,
    /// Owner of the piece; selects which player's set holds it.
    pub owner: Color,
}

/// The square game board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Side length.
    size: u16,
    /// Cells stored in row-major order.
    cells: Vec<Option<Occupant>>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Returns `None` if `size` is below 2 (the two zone rows would overlap).
    #[must_use]
    pub fn new(size: u16) -> Option<Self> {
        if size < 2 {
            return None;
        }

        let cells = vec![None; usize::from(size) * usize::from(size)];
        Some(Self { size, cells })
    }

    /// Side length of the board.
    #[must_use]
    pub const fn size(&self) -> u16 {
        self.size
    }

    /// Check if a coordinate is within the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.row) * usize::from(self.size) + usize::from(coord.col))
        } else {
            None
        }
    }

    /// Get the occupant of a cell. Out-of-bounds cells read as empty.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<Occupant> {
        self.index(coord).and_then(|idx| self.cells[idx])
    }

    /// Check whether a cell is empty.
    #[must_use]
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord).is_none()
    }

    /// Put an occupant into a cell.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, occupant: Occupant) -> bool {
        if let Some(idx) = self.index(coord) {
            self.cells[idx] = Some(occupant);
            true
        } else {
            false
        }
    }

    /// Empty a cell, returning what was there.
    pub fn clear(&mut self, coord: Coord) -> Option<Occupant> {
        self.index(coord).and_then(|idx| self.cells[idx].take())
    }

    /// The row a color places onto (its zone).
    #[must_use]
    pub const fn zone_row(&self, color: Color) -> u16 {
        match color {
            Color::White => self.size - 1,
            Color::Black => 0,
        }
    }

    /// Whether `coord` lies in `color`'s zone.
    #[must_use]
    pub const fn is_in_zone(&self, coord: Coord, color: Color) -> bool {
        self.in_bounds(coord) && coord.row == self.zone_row(color)
    }

    /// Iterate over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    /// Iterate over occupied cells.
    pub fn occupied(&self) -> impl Iterator<Item = (Coord, Occupant)> + '_ {
        self.coords()
            .filter_map(|coord| self.get(coord).map(|occupant| (coord, occupant)))
    }

    /// Count pieces of one color on the board.
    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|occupant| occupant.owner == color)
            .count()
    }
}
