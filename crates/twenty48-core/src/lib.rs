//! twenty48-core: the 2048 board transition engine
//!
//! This crate provides:
//! - A `Grid` type for the fixed 4x4 board with ergonomic methods
//!   (`slide`, `make_move`, `with_random_tile`, ...)
//! - Slide outcomes that carry a per-cell origin map, so a frontend can
//!   interpolate each tile from where it was to where it landed
//! - Terminal-state checks (`is_won`, `is_lost`) and per-direction move
//!   legality (`can_slide`)
//!
//! Quick start:
//! ```
//! use twenty48_core::engine::{Grid, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game start with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::new_game(&mut rng);
//!
//! let outcome = g0.slide(Move::Left);
//! if outcome.moved {
//!     // commit the candidate, then spawn
//!     let (g1, _cell) = outcome.grid.with_random_tile(&mut rng);
//!     assert!(g1.count_empty() <= g0.count_empty());
//! }
//! ```
//!
//! Note: free functions mirroring the `Grid` methods live in `engine`
//! (e.g., `engine::slide`, `engine::is_lost`). Prefer the methods; the free
//! functions exist for callers that pass grids around by value.
pub mod engine;
