//! Action encoding.
//!
//! An action is an integer in `[0, 100)` laid out as `move_index * 4 + wall`:
//!
//! ```text
//! move_index  0..25   index into MOVE_OFFSETS (relative destination)
//! wall        0..4    Up, Left, Down, Right edge of the destination cell
//! ```
//!
//! The offsets cover every displacement with Manhattan distance at most 3,
//! ordered by row offset and then column offset, so index 12 is "stay put".

use crate::grid::Wall;

/// Number of distinct action ids.
pub const NUM_ACTIONS: usize = 100;
/// Number of relative move offsets.
pub const NUM_MOVES: usize = 25;
/// Maximum number of orthogonal steps in one move.
pub const MAX_MOVE_STEPS: u32 = 3;
/// Move index of the zero offset.
pub const STAY: usize = 12;

/// Relative `(dr, dc)` destination for each move index.
pub const MOVE_OFFSETS: [(i32, i32); NUM_MOVES] = [
    (-3, 0),
    (-2, -1),
    (-2, 0),
    (-2, 1),
    (-1, -2),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (-1, 2),
    (0, -3),
    (0, -2),
    (0, -1),
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, -2),
    (1, -1),
    (1, 0),
    (1, 1),
    (1, 2),
    (2, -1),
    (2, 0),
    (2, 1),
    (3, 0),
];

/// Pack a move index and wall into an action id.
#[inline]
pub const fn encode(move_index: usize, wall: Wall) -> u8 {
    (move_index * 4 + wall.index()) as u8
}

/// Split an action id into its move index and wall.
///
/// Returns `None` for ids outside `[0, 100)`.
pub fn decode(action: u8) -> Option<(usize, Wall)> {
    let action = action as usize;
    if action >= NUM_ACTIONS {
        return None;
    }
    Wall::from_index(action % 4).map(|wall| (action / 4, wall))
}

/// Move index for a relative offset, if it is within reach.
pub fn move_index(dr: i32, dc: i32) -> Option<usize> {
    MOVE_OFFSETS.iter().position(|&offset| offset == (dr, dc))
}

/// Remap an action through the main-diagonal reflection.
///
/// The destination offset transposes and the wall edge swaps Up/Left and
/// Down/Right. The mapping is an involution.
pub fn reflect_action(action: u8) -> Option<u8> {
    let (index, wall) = decode(action)?;
    let (dr, dc) = MOVE_OFFSETS[index];
    move_index(dc, dr).map(|m| encode(m, wall.transposed()))
}

/// The full reflection table, indexed by action id.
pub fn reflection_table() -> [u8; NUM_ACTIONS] {
    let mut table = [0u8; NUM_ACTIONS];
    for (action, slot) in table.iter_mut().enumerate() {
        // Every offset in the table has a transposed partner.
        *slot = reflect_action(action as u8).unwrap_or(action as u8);
    }
    table
}
