use rand::Rng;

use super::state::{Cell, Grid, Move, Tile, GOAL, SIZE};

/// One spawn in this many is a 4; the rest are 2s.
const FOUR_TILE_ODDS: u32 = 10;

/// Result of a slide request: the candidate grid, the origin of every
/// surviving tile, and whether the request is a legal move at all.
///
/// The caller commits `grid` only when `moved` is true; a false `moved` is a
/// no-op move that must not trigger a tile spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideOutcome {
    pub grid: Grid,
    pub origins: TileOrigins,
    pub moved: bool,
}

/// Per-destination origin map produced by a slide: for every occupied cell of
/// the result, the cell its tile occupied before the move (for a merge, the
/// original position of the tile that was merged *into*). Drives positional
/// interpolation only; recomputed every move, no bearing on game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOrigins([[Option<Cell>; SIZE]; SIZE]);

impl TileOrigins {
    const NONE: TileOrigins = TileOrigins([[None; SIZE]; SIZE]);

    /// Where the tile now at `cell` came from (`None` if `cell` is empty).
    #[inline]
    pub fn origin(&self, cell: Cell) -> Option<Cell> {
        self.0[cell.y as usize][cell.x as usize]
    }

    #[inline]
    fn set(&mut self, cell: Cell, origin: Cell) {
        self.0[cell.y as usize][cell.x as usize] = Some(origin);
    }
}

/// Slide/merge tiles in the given direction. No randomness.
///
/// The input grid is never mutated; the outcome carries a full new grid so
/// the caller can diff old vs. new.
///
/// ```
/// use twenty48_core::engine::{slide, Cell, Grid, Move};
/// let g = Grid::from_rows([[0, 2, 0, 2], [0; 4], [0; 4], [0; 4]]);
/// let outcome = slide(g, Move::Left);
/// assert_eq!(outcome.grid.to_rows()[0], [4, 0, 0, 0]);
/// // The 4 is the pair's survivor; it started at x = 1.
/// assert_eq!(outcome.origins.origin(Cell::new(0, 0)), Some(Cell::new(1, 0)));
/// ```
pub fn slide(grid: Grid, direction: Move) -> SlideOutcome {
    let mut out = Grid::EMPTY;
    let mut origins = TileOrigins::NONE;
    for lane in 0..SIZE {
        let cells = lane_cells(direction, lane);
        let values = cells.map(|cell| grid.tile(cell));
        let (merged, sources) = slide_lane(values);
        for (slot, &cell) in cells.iter().enumerate() {
            out.set(cell, merged[slot]);
            if let Some(source) = sources[slot] {
                origins.set(cell, cells[source]);
            }
        }
    }
    // Compaction that moves any tile leaves its old cell empty, so every
    // positional or value change is visible as a cell-value difference.
    let moved = out != grid;
    SlideOutcome {
        grid: out,
        origins,
        moved,
    }
}

/// True if sliding in `direction` would change the board.
pub fn can_slide(grid: Grid, direction: Move) -> bool {
    slide(grid, direction).moved
}

/// True iff any cell holds the goal tile.
pub fn is_won(grid: Grid) -> bool {
    grid.cells().any(|(_, value)| value == GOAL)
}

/// True iff no cell is empty and no move in any direction is legal.
///
/// Uses the adjacency formulation: a full board is stuck exactly when no two
/// horizontally or vertically adjacent cells are equal. The property suite
/// checks this against the slide-every-direction ground truth.
pub fn is_lost(grid: Grid) -> bool {
    for y in 0..SIZE {
        for x in 0..SIZE {
            let value = grid.tile(Cell::new(x, y));
            if value == 0 {
                return false;
            }
            if x + 1 < SIZE && grid.tile(Cell::new(x + 1, y)) == value {
                return false;
            }
            if y + 1 < SIZE && grid.tile(Cell::new(x, y + 1)) == value {
                return false;
            }
        }
    }
    true
}

pub(crate) fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..FOUR_TILE_ODDS) == 0 {
        4
    } else {
        2
    }
}

/// The four cells of `lane`, ordered from the target edge outward.
///
/// Left/Right lanes are rows, Up/Down lanes are columns; Right and Down
/// reverse the slot order instead of mirroring the grid.
fn lane_cells(direction: Move, lane: usize) -> [Cell; SIZE] {
    core::array::from_fn(|slot| match direction {
        Move::Left => Cell::new(slot, lane),
        Move::Right => Cell::new(SIZE - 1 - slot, lane),
        Move::Up => Cell::new(lane, slot),
        Move::Down => Cell::new(lane, SIZE - 1 - slot),
    })
}

/// Compact, merge, and re-pack one lane of four tiles.
///
/// `lane[0]` is the slot at the target edge. Returns the resulting lane and,
/// for each occupied slot, the input slot the surviving tile came from.
fn slide_lane(lane: [Tile; SIZE]) -> ([Tile; SIZE], [Option<usize>; SIZE]) {
    // Pass 1: compaction. Collect nonzero tiles in encounter order from the
    // edge, remembering each tile's source slot.
    let mut packed: Vec<(Tile, usize)> = Vec::with_capacity(SIZE);
    for (slot, &value) in lane.iter().enumerate() {
        if value != 0 {
            packed.push((value, slot));
        }
    }

    // Pass 2 + 3: single merge scan from the edge, emitting contiguously so
    // the result is already re-packed. The scan steps past a consumed pair,
    // so a freshly merged tile never merges again this move.
    let mut out = [0; SIZE];
    let mut sources = [None; SIZE];
    let mut read = 0;
    let mut write = 0;
    while read < packed.len() {
        let (value, source) = packed[read];
        if read + 1 < packed.len() && packed[read + 1].0 == value {
            // The survivor is the tile nearer the edge.
            out[write] = value * 2;
            sources[write] = Some(source);
            read += 2;
        } else {
            out[write] = value;
            sources[write] = Some(source);
            read += 1;
        }
        write += 1;
    }
    (out, sources)
}
