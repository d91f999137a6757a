use rand::Rng;
use std::fmt;

use super::ops;
use serde::{Deserialize, Serialize};

/// Board side length. The game is defined on a fixed 4x4 grid.
pub const SIZE: usize = 4;

/// Tile value that wins the game when it first appears.
pub const GOAL: Tile = 2048;

/// A tile value: 0 for empty, otherwise a power of two (2, 4, 8, ...).
///
/// Values stay within [2, 2048] in normal play, but the merge math is
/// unbounded: two 2048s legally combine into 4096.
pub type Tile = u32;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, for legality sweeps.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

/// A board coordinate. `x` runs left to right, `y` top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    #[inline]
    pub fn new(x: usize, y: usize) -> Self {
        debug_assert!(x < SIZE && y < SIZE);
        Cell {
            x: x as u8,
            y: y as u8,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The 4x4 board, row-major, indexed `[y][x]`.
///
/// Invariant: nonzero cells hold powers of two >= 2; everything else is 0.
/// `Grid` is a small `Copy` value; every engine operation takes a grid and
/// returns a new one, so a caller can diff old vs. new for animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid([[Tile; SIZE]; SIZE]);

impl Grid {
    /// A constant empty board (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Construct a `Grid` from row-major rows of tile values.
    ///
    /// Debug builds check the tile invariant (zero or a power of two >= 2);
    /// feeding invalid values is a programming error, not a runtime fault.
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Self {
        debug_assert!(
            rows.iter()
                .flatten()
                .all(|&v| v == 0 || (v >= 2 && v.is_power_of_two())),
            "tile values must be 0 or powers of two >= 2"
        );
        Grid(rows)
    }

    /// The board as row-major rows of tile values.
    #[inline]
    pub fn to_rows(self) -> [[Tile; SIZE]; SIZE] {
        self.0
    }

    /// The tile value at `cell` (0 if empty).
    #[inline]
    pub fn tile(&self, cell: Cell) -> Tile {
        self.0[cell.y as usize][cell.x as usize]
    }

    #[inline]
    pub(crate) fn set(&mut self, cell: Cell, value: Tile) {
        self.0[cell.y as usize][cell.x as usize] = value;
    }

    /// Iterate over `(Cell, Tile)` pairs in row-major order.
    #[inline]
    pub fn cells(self) -> CellsIter {
        CellsIter { grid: self, idx: 0 }
    }

    /// Count the number of empty cells on the board.
    ///
    /// ```
    /// use twenty48_core::engine::Grid;
    /// assert_eq!(Grid::EMPTY.count_empty(), 16);
    /// ```
    pub fn count_empty(self) -> usize {
        self.cells().filter(|&(_, v)| v == 0).count()
    }

    /// Every empty cell, in row-major order.
    pub fn empty_cells(self) -> Vec<Cell> {
        self.cells()
            .filter_map(|(cell, v)| (v == 0).then_some(cell))
            .collect()
    }

    /// The highest tile value present (0 on an empty board).
    pub fn highest_tile(self) -> Tile {
        self.cells().map(|(_, v)| v).max().unwrap_or(0)
    }

    /// Return the candidate result of sliding/merging tiles in `direction`.
    ///
    /// The receiver is not changed; commit `outcome.grid` only when
    /// `outcome.moved` is true.
    ///
    /// ```
    /// use twenty48_core::engine::{Grid, Move};
    /// let g = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let outcome = g.slide(Move::Left);
    /// assert!(outcome.moved);
    /// assert_eq!(outcome.grid.to_rows()[0], [4, 0, 0, 0]);
    /// ```
    #[inline]
    pub fn slide(self, direction: Move) -> ops::SlideOutcome {
        ops::slide(self, direction)
    }

    /// True if sliding in `direction` would change the board.
    #[inline]
    pub fn can_slide(self, direction: Move) -> bool {
        ops::can_slide(self, direction)
    }

    /// True iff any cell holds the goal tile (2048).
    #[inline]
    pub fn is_won(self) -> bool {
        ops::is_won(self)
    }

    /// True iff the board is full and no direction has a legal move.
    ///
    /// Check `is_won` first: a full, stuck board that contains the goal tile
    /// reports both, and the win takes priority.
    ///
    /// ```
    /// use twenty48_core::engine::Grid;
    /// // An empty board is never lost (and never won).
    /// assert!(!Grid::EMPTY.is_lost());
    /// assert!(!Grid::EMPTY.is_won());
    /// ```
    #[inline]
    pub fn is_lost(self) -> bool {
        ops::is_lost(self)
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a uniformly random empty
    /// cell, using the provided RNG. Returns the new grid and the spawn cell
    /// (the anchor for a pop-in animation).
    ///
    /// Panics if the board has no empty cell; callers must have confirmed
    /// space via `is_lost` (or `count_empty`) beforehand.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_core::engine::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let (g, cell) = Grid::EMPTY.with_random_tile(&mut rng);
    /// assert!(g.tile(cell) == 2 || g.tile(cell) == 4);
    /// assert_eq!(g.count_empty(), 15);
    /// ```
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> (Self, Cell) {
        let empty = self.empty_cells();
        assert!(!empty.is_empty(), "no empty cell to spawn a tile into");
        let cell = empty[rng.gen_range(0..empty.len())];
        let mut next = self;
        next.set(cell, ops::random_tile_value(rng));
        (next, cell)
    }

    /// Convenience: like `with_random_tile` but uses thread-local RNG.
    pub fn with_random_tile_thread(self) -> (Self, Cell) {
        let mut rng = rand::thread_rng();
        self.with_random_tile(&mut rng)
    }

    /// A fresh game: two random tiles on an otherwise empty board.
    ///
    /// This is also what an external "new game" reset runs.
    ///
    /// ```
    /// use twenty48_core::engine::Grid;
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let g = Grid::new_game(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let (grid, _) = Grid::EMPTY.with_random_tile(rng);
        let (grid, _) = grid.with_random_tile(rng);
        grid
    }

    /// Perform a move then insert a random tile if the move changed the
    /// board, using the provided RNG. A no-op move returns the board as-is.
    ///
    /// ```
    /// use twenty48_core::engine::{Grid, Move};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let g0 = Grid::new_game(&mut rng);
    /// let _g1 = g0.make_move(Move::Up, &mut rng);
    /// ```
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        let outcome = self.slide(direction);
        if outcome.moved {
            outcome.grid.with_random_tile(rng).0
        } else {
            self
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            for &value in row {
                if value == 0 {
                    write!(f, "{:>6}", ".")?;
                } else {
                    write!(f, "{:>6}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over board cells in row-major order.
pub struct CellsIter {
    grid: Grid,
    idx: usize,
}

impl Iterator for CellsIter {
    type Item = (Cell, Tile);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= SIZE * SIZE {
            return None;
        }
        let cell = Cell::new(self.idx % SIZE, self.idx / SIZE);
        self.idx += 1;
        Some((cell, self.grid.tile(cell)))
    }
}

impl IntoIterator for Grid {
    type Item = (Cell, Tile);
    type IntoIter = CellsIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}

impl IntoIterator for &Grid {
    type Item = (Cell, Tile);
    type IntoIter = CellsIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.cells()
    }
}
