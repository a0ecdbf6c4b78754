//! Crosscut detection and resolution on binary grids.
//!
//! A crosscut is a 2×2 window whose main diagonal holds one value and whose
//! anti-diagonal holds the other:
//!
//! ```text
//! 1 0      0 1
//! 0 1      1 0
//! ```
//!
//! A player owns one value and resolves crosscuts by swapping one of their
//! stones with an orthogonally adjacent opposing stone of the same window.
//! The [`Resolver`] re-scans after every swap and stops once nothing is left
//! to resolve, or after a fixed number of swaps.
//!
//! This module shares no data with the board game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cell value of a binary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stone {
    /// Value 0.
    Zero,
    /// Value 1.
    One,
}

impl Stone {
    /// The other value.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Stone::Zero => Stone::One,
            Stone::One => Stone::Zero,
        }
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Stone::Zero => 0,
            Stone::One => 1,
        }
    }
}

impl TryFrom<u8> for Stone {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Stone::Zero),
            1 => Ok(Stone::One),
            other => Err(other),
        }
    }
}

impl From<Stone> for u8 {
    fn from(stone: Stone) -> Self {
        stone.value()
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if `other` shares an edge with this cell.
    #[must_use]
    pub const fn is_orthogonal_neighbor(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Reasons a grid is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows.
    #[error("grid is empty")]
    Empty,
    /// A row's length differs from the number of rows.
    #[error("row {row} has {len} cells but the grid has {size} rows")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Its length.
        len: usize,
        /// Number of rows.
        size: usize,
    },
    /// A cell holds something other than 0 or 1.
    #[error("cell ({row}, {col}) holds {value}, expected 0 or 1")]
    InvalidValue {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The value found.
        value: u8,
    },
}

/// Square binary grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Stone>,
}

impl Grid {
    /// Build a grid from rows of 0/1 values.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty, not square, or hold other values.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let stone = Stone::try_from(value)
                    .map_err(|value| GridError::InvalidValue { row, col, value })?;
                cells.push(stone);
            }
        }
        Ok(Self { size, cells })
    }

    /// Side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Check if a cell lies within the grid.
    #[must_use]
    pub const fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    /// Stone at `cell`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<Stone> {
        self.in_bounds(cell)
            .then(|| self.cells[cell.row * self.size + cell.col])
    }

    /// Rows as 0/1 values.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().copied().map(Stone::value).collect())
            .collect()
    }

    /// Exchange the stones on two cells. Returns `false` if either is out of bounds.
    pub fn swap(&mut self, a: Cell, b: Cell) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        self.cells
            .swap(a.row * self.size + a.col, b.row * self.size + b.col);
        true
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.rows()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.size) {
            let line: Vec<String> = row.iter().map(ToString::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// One detected crosscut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crosscut {
    /// Top-left cell of the window.
    pub origin: Cell,
    /// Diagonal pair holding 0.
    pub zeros: [Cell; 2],
    /// Diagonal pair holding 1.
    pub ones: [Cell; 2],
}

impl Crosscut {
    /// The two cells holding `stone`.
    #[must_use]
    pub const fn cells_of(&self, stone: Stone) -> [Cell; 2] {
        match stone {
            Stone::Zero => self.zeros,
            Stone::One => self.ones,
        }
    }

    /// Check if the window covers `cell`.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.zeros.contains(&cell) || self.ones.contains(&cell)
    }
}

/// Find every crosscut, scanning windows in row-major order.
#[must_use]
pub fn find_crosscuts(grid: &Grid) -> Vec<Crosscut> {
    let n = grid.size();
    let mut crosscuts = Vec::new();

    for row in 0..n.saturating_sub(1) {
        for col in 0..n - 1 {
            let tl = Cell::new(row, col);
            let tr = Cell::new(row, col + 1);
            let bl = Cell::new(row + 1, col);
            let br = Cell::new(row + 1, col + 1);
            let (Some(a), Some(b), Some(c), Some(d)) =
                (grid.get(tl), grid.get(tr), grid.get(bl), grid.get(br))
            else {
                continue;
            };

            // Diagonal agrees, anti-diagonal agrees, and the two differ
            if a == d && b == c && a != b {
                let (zeros, ones) = match a {
                    Stone::Zero => ([tl, br], [tr, bl]),
                    Stone::One => ([tr, bl], [tl, br]),
                };
                crosscuts.push(Crosscut {
                    origin: tl,
                    zeros,
                    ones,
                });
            }
        }
    }

    crosscuts
}

/// Number of crosscuts in the grid.
#[must_use]
pub fn count_crosscuts(grid: &Grid) -> usize {
    find_crosscuts(grid).len()
}

/// Distinct cells holding `stone` that belong to any crosscut, row-major.
#[must_use]
pub fn resolving_stones(grid: &Grid, crosscuts: &[Crosscut], stone: Stone) -> Vec<Cell> {
    let mut cells: Vec<Cell> = crosscuts
        .iter()
        .flat_map(|cut| cut.cells_of(stone))
        .filter(|&cell| grid.get(cell) == Some(stone))
        .collect();
    cells.sort_unstable();
    cells.dedup();
    cells
}

/// Opposing cells sharing a crosscut with `stone_pos`, row-major.
///
/// Every partner is orthogonally adjacent to `stone_pos`.
#[must_use]
pub fn swap_partners(grid: &Grid, crosscuts: &[Crosscut], stone_pos: Cell) -> Vec<Cell> {
    let Some(stone) = grid.get(stone_pos) else {
        return Vec::new();
    };
    let enemy = stone.opponent();

    let mut cells: Vec<Cell> = crosscuts
        .iter()
        .filter(|cut| cut.cells_of(stone).contains(&stone_pos))
        .flat_map(|cut| cut.cells_of(enemy))
        .filter(|&cell| grid.get(cell) == Some(enemy))
        .collect();
    cells.sort_unstable();
    cells.dedup();
    cells
}

/// Swap a resolving stone with an opposing partner.
///
/// Returns `false` and leaves the grid untouched if either cell is out of bounds.
pub fn swap(grid: &mut Grid, stone: Cell, partner: Cell) -> bool {
    grid.swap(stone, partner)
}

/// Configuration for a resolution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum swaps before stopping (`None` = 4 × size²).
    pub max_swaps: Option<usize>,
}

impl ResolverConfig {
    /// Swap limit for a grid of `size`.
    #[must_use]
    pub fn swap_limit(&self, size: usize) -> usize {
        self.max_swaps
            .unwrap_or_else(|| size.saturating_mul(size).saturating_mul(4))
    }
}

/// Why a resolution run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionEnd {
    /// The grid holds no crosscut.
    NoCrosscuts,
    /// Crosscuts remain but none involve the player's value.
    NoResolvingStones,
    /// The selected stone has no opposing partner.
    NoPartners,
    /// The swap limit was reached.
    SwapLimit,
}

impl std::fmt::Display for ResolutionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionEnd::NoCrosscuts => write!(f, "no crosscuts remain"),
            ResolutionEnd::NoResolvingStones => write!(f, "no resolving stones"),
            ResolutionEnd::NoPartners => write!(f, "no swap partners"),
            ResolutionEnd::SwapLimit => write!(f, "swap limit reached"),
        }
    }
}

/// What the resolver is waiting for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum ResolutionRequest {
    /// Pick one of the player's stones in a crosscut.
    SelectStone {
        /// Legal choices.
        options: Vec<Cell>,
    },
    /// Pick an opposing stone to swap with.
    SelectPartner {
        /// The stone already chosen.
        stone: Cell,
        /// Legal choices.
        options: Vec<Cell>,
    },
    /// Nothing left to do.
    Finished {
        /// Why the run stopped.
        reason: ResolutionEnd,
    },
}

/// Why a selection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The cell is not one of the offered options.
    #[error("{0} is not one of the offered cells")]
    NotAnOption(Cell),
    /// Resolution already stopped.
    #[error("resolution finished: {0}")]
    Finished(ResolutionEnd),
}

/// Outcome of an accepted selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResolutionEvent {
    /// A resolving stone was chosen.
    StoneSelected {
        /// The chosen stone.
        stone: Cell,
    },
    /// Two stones were swapped and the grid re-scanned.
    Swapped {
        /// The resolving stone's original cell.
        stone: Cell,
        /// The partner's original cell.
        partner: Cell,
        /// Crosscuts left after the swap.
        remaining: usize,
    },
    /// Resolution stopped.
    Finished {
        /// Why the run stopped.
        reason: ResolutionEnd,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolverState {
    SelectStone { options: Vec<Cell> },
    SelectPartner { stone: Cell, options: Vec<Cell> },
    Finished(ResolutionEnd),
}

/// Interactive crosscut resolution for one player.
///
/// Invalid selections are rejected and the same request stays pending.
#[derive(Debug, Clone)]
pub struct Resolver {
    grid: Grid,
    player: Stone,
    crosscuts: Vec<Crosscut>,
    state: ResolverState,
    swaps: usize,
    swap_limit: usize,
}

impl Resolver {
    /// Start resolving `grid` for the player owning `player` stones.
    #[must_use]
    pub fn new(grid: Grid, player: Stone, config: ResolverConfig) -> Self {
        let swap_limit = config.swap_limit(grid.size());
        let mut resolver = Self {
            grid,
            player,
            crosscuts: Vec::new(),
            state: ResolverState::Finished(ResolutionEnd::NoCrosscuts),
            swaps: 0,
            swap_limit,
        };
        resolver.rescan();
        resolver
    }

    /// Current grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Crosscuts found by the last scan.
    #[must_use]
    pub fn crosscuts(&self) -> &[Crosscut] {
        &self.crosscuts
    }

    /// Swaps applied so far.
    #[must_use]
    pub const fn swaps(&self) -> usize {
        self.swaps
    }

    /// Why resolution stopped, once it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<ResolutionEnd> {
        match self.state {
            ResolverState::Finished(reason) => Some(reason),
            ResolverState::SelectStone { .. } | ResolverState::SelectPartner { .. } => None,
        }
    }

    /// Consume the resolver, returning the grid.
    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Describe the selection the resolver is waiting for.
    #[must_use]
    pub fn pending(&self) -> ResolutionRequest {
        match &self.state {
            ResolverState::SelectStone { options } => ResolutionRequest::SelectStone {
                options: options.clone(),
            },
            ResolverState::SelectPartner { stone, options } => ResolutionRequest::SelectPartner {
                stone: *stone,
                options: options.clone(),
            },
            ResolverState::Finished(reason) => ResolutionRequest::Finished { reason: *reason },
        }
    }

    /// Submit a selection for the pending request.
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is not offered or resolution is over.
    pub fn select(&mut self, cell: Cell) -> Result<ResolutionEvent, SelectionError> {
        match &self.state {
            ResolverState::Finished(reason) => Err(SelectionError::Finished(*reason)),
            ResolverState::SelectStone { options } => {
                if !options.contains(&cell) {
                    return Err(SelectionError::NotAnOption(cell));
                }
                let partners = swap_partners(&self.grid, &self.crosscuts, cell);
                if partners.is_empty() {
                    self.state = ResolverState::Finished(ResolutionEnd::NoPartners);
                    return Ok(ResolutionEvent::Finished {
                        reason: ResolutionEnd::NoPartners,
                    });
                }
                self.state = ResolverState::SelectPartner {
                    stone: cell,
                    options: partners,
                };
                Ok(ResolutionEvent::StoneSelected { stone: cell })
            }
            ResolverState::SelectPartner { stone, options } => {
                if !options.contains(&cell) {
                    return Err(SelectionError::NotAnOption(cell));
                }
                let stone = *stone;
                swap(&mut self.grid, stone, cell);
                self.swaps += 1;
                self.rescan();
                tracing::debug!(
                    %stone,
                    partner = %cell,
                    remaining = self.crosscuts.len(),
                    swaps = self.swaps,
                    "stones swapped"
                );
                Ok(ResolutionEvent::Swapped {
                    stone,
                    partner: cell,
                    remaining: self.crosscuts.len(),
                })
            }
        }
    }

    fn rescan(&mut self) {
        self.crosscuts = find_crosscuts(&self.grid);
        let options = resolving_stones(&self.grid, &self.crosscuts, self.player);

        self.state = if self.crosscuts.is_empty() {
            ResolverState::Finished(ResolutionEnd::NoCrosscuts)
        } else if options.is_empty() {
            ResolverState::Finished(ResolutionEnd::NoResolvingStones)
        } else if self.swaps >= self.swap_limit {
            ResolverState::Finished(ResolutionEnd::SwapLimit)
        } else {
            ResolverState::SelectStone { options }
        };
    }
}

/// Drive a resolver to completion with a chooser.
///
/// The chooser sees each request and returns a cell, or `None` to stop early.
/// Rejected selections are logged and the request is asked again; the
/// `max_selections` cap bounds a chooser that never picks a valid cell.
/// Returns the final resolver.
#[must_use]
pub fn resolve_with<F>(mut resolver: Resolver, mut choose: F, max_selections: usize) -> Resolver
where
    F: FnMut(&ResolutionRequest) -> Option<Cell>,
{
    for _ in 0..max_selections {
        let request = resolver.pending();
        if matches!(request, ResolutionRequest::Finished { .. }) {
            break;
        }
        let Some(cell) = choose(&request) else {
            break;
        };
        if let Err(error) = resolver.select(cell) {
            tracing::warn!(%cell, %error, "selection rejected");
        }
    }
    resolver
}
