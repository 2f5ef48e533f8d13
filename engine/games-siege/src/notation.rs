//! Human-readable move notation.
//!
//! A move is written as the destination square followed by the wall edge,
//! e.g. `a7D`: file letter from the column (`a` is column 0), rank counted
//! from the bottom row (`L - row`), and one of `U`, `L`, `D`, `R`.
//! Because actions are relative, rendering a move needs the board it is
//! played on.

use thiserror::Error;

use crate::action::{decode, encode, move_index, MOVE_OFFSETS};
use crate::board::{Board, BoardError};
use crate::grid::{Cell, Wall};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("Malformed move '{0}'")]
    Malformed(String),

    #[error("Move '{0}' is out of reach")]
    OutOfReach(String),

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Square name of `cell` on a board of side `len`.
pub fn square_name(cell: Cell, len: usize) -> String {
    let file = (b'a' + cell.col as u8) as char;
    format!("{}{}", file, len - cell.row)
}

/// Render `action` as played by the side to move on `board`.
pub fn format_move(board: &Board, action: u8) -> Result<String, BoardError> {
    let illegal = BoardError::IllegalAction { action };
    let (index, wall) = decode(action).ok_or(illegal.clone())?;
    let (dr, dc) = MOVE_OFFSETS[index];
    let len = board.len();
    let dest = board
        .position(board.active_player())
        .offset(dr, dc, len)
        .ok_or(illegal)?;
    Ok(format!("{}{}", square_name(dest, len), wall.letter()))
}

/// Parse a move such as `c5R` into an action id for the side to move.
///
/// Legality is not checked here; `Board::do_action` does that.
pub fn parse_move(board: &Board, text: &str) -> Result<u8, NotationError> {
    let malformed = || NotationError::Malformed(text.to_string());
    let text = text.trim();
    let mut chars = text.chars();
    let file = chars.next().ok_or_else(malformed)?;
    let wall = chars
        .next_back()
        .and_then(Wall::from_letter)
        .ok_or_else(malformed)?;
    let rank: usize = chars.as_str().parse().map_err(|_| malformed())?;

    let len = board.len();
    let col = (file.to_ascii_lowercase() as u32).wrapping_sub('a' as u32) as usize;
    if col >= len || rank == 0 || rank > len {
        return Err(malformed());
    }
    let dest = Cell::new(len - rank, col);

    let here = board.position(board.active_player());
    let dr = dest.row as i32 - here.row as i32;
    let dc = dest.col as i32 - here.col as i32;
    let index = move_index(dr, dc).ok_or_else(|| NotationError::OutOfReach(text.to_string()))?;
    Ok(encode(index, wall))
}

/// Notation for a whole move list, replayed from the initial board.
pub fn format_game(len: usize, moves: &[u8]) -> Result<Vec<String>, BoardError> {
    let mut board = Board::new(len)?;
    let mut out = Vec::with_capacity(moves.len());
    for &action in moves {
        out.push(format_move(&board, action)?);
        board.do_action(action)?;
    }
    Ok(out)
}
