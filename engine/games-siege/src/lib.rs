//! Siege: a two-player wall-placement territory game.
//!
//! Blue starts in the top-left corner and Green in the bottom-right. On
//! each turn the side to move walks up to three orthogonal steps (never
//! through the opponent) and then places a wall on one free edge of the
//! cell it landed on. The game ends once the walls separate the two
//! players; whoever can flood-fill the larger region wins.
//!
//! # Board Layout
//!
//! Cells are numbered row-major with row 0 at the top:
//! ```text
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Blue starts at 0
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! ...
//! Row 6: [42][43][44][45][46][47][48]  <- Green starts at 48
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_siege::{Board, Outcome, Player};
//!
//! let mut board = Board::default();
//! // Blue stays put and builds a wall below its cell
//! board.do_action(50).unwrap();
//! assert_eq!(board.active_player(), Player::Green);
//! assert!(board.outcome().is_none());
//! # let _ = Outcome::Draw;
//! ```

pub mod action;
pub mod board;
pub mod grid;
pub mod notation;
pub mod record;
pub mod territory;

pub use action::{decode, encode, reflect_action, MOVE_OFFSETS, NUM_ACTIONS, STAY};
pub use board::{Board, BoardError, Outcome, Player, DEFAULT_BOARD_LEN, NUM_PLANES};
pub use grid::{Cell, CellSet, Wall, Walls, MAX_BOARD_LEN, MIN_BOARD_LEN};
pub use notation::{format_move, parse_move, NotationError};
pub use record::{GameRecord, RecordError};
pub use territory::{cell_value, distance_map, position_value, DistanceMap, TerritoryFn};

#[cfg(test)]
mod tests;
