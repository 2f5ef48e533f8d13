//! The Siege board state machine.
//!
//! The board is a stack of 13 spatial layers, each stored as a `u64`
//! bitboard:
//!
//! ```text
//! 0-2    Blue position (current, previous, previous-previous)
//! 3-5    Green position
//! 6-8    horizontal walls
//! 9-11   vertical walls
//! 12     side to move (all zeros for Blue, all ones for Green)
//! ```
//!
//! Everything is fixed-size, so a `Board` is `Copy` and cloning it for a
//! search simulation is a plain memcpy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::action::{decode, encode, move_index, MAX_MOVE_STEPS, MOVE_OFFSETS, NUM_ACTIONS};
use crate::grid::{transpose_bits, Cell, CellSet, Wall, Walls, MAX_BOARD_LEN, MIN_BOARD_LEN};
use crate::territory::{connected, reachable};

/// Default board side.
pub const DEFAULT_BOARD_LEN: usize = 7;
/// Number of feature planes in the board tensor.
pub const NUM_PLANES: usize = 13;
/// Plies of history kept per position and wall layer.
pub const HISTORY: usize = 3;
/// Index of the side-to-move plane.
pub const TURN_PLANE: usize = 12;

/// Errors raised by board operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Illegal action {action}")]
    IllegalAction { action: u8 },

    #[error("Board size {0} is outside the supported range 2..=8")]
    InvalidBoardSize(usize),
}

/// The two sides. Blue moves first from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Blue,
    Green,
}

impl Player {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::Blue => 0,
            Player::Green => 1,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::Blue => Player::Green,
            Player::Green => Player::Blue,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Player::Blue => "Blue",
            Player::Green => "Green",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Winner(Player),
    Draw,
}

impl Outcome {
    /// +1 for a win, -1 for a loss, 0 for a draw, seen by `player`.
    pub fn value_for(self, player: Player) -> f32 {
        match self {
            Outcome::Winner(p) if p == player => 1.0,
            Outcome::Winner(_) => -1.0,
            Outcome::Draw => 0.0,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Winner(p) => Some(p),
            Outcome::Draw => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Winner(p) => write!(f, "{} wins", p),
            Outcome::Draw => f.write_str("Draw"),
        }
    }
}

/// Complete game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    len: u8,
    /// One-hot positions per player, newest first
    positions: [[u64; HISTORY]; 2],
    /// Wall layers, newest first
    walls: [Walls; HISTORY],
    turn: Player,
    step_count: u32,
    /// Cached legal actions, one bit per action id
    legal: u128,
    /// Cached result, `Some` once the players are separated
    outcome: Option<Outcome>,
}

impl Default for Board {
    fn default() -> Self {
        Self::initial(DEFAULT_BOARD_LEN)
    }
}

impl Board {
    /// Create a board of side `len` in the initial configuration.
    pub fn new(len: usize) -> Result<Self, BoardError> {
        if !(MIN_BOARD_LEN..=MAX_BOARD_LEN).contains(&len) {
            return Err(BoardError::InvalidBoardSize(len));
        }
        Ok(Self::initial(len))
    }

    fn initial(len: usize) -> Self {
        let blue = 1u64 << Cell::new(0, 0).index(len);
        let green = 1u64 << Cell::new(len - 1, len - 1).index(len);
        let mut board = Self {
            len: len as u8,
            positions: [[blue, 0, 0], [green, 0, 0]],
            walls: [Walls::NONE; HISTORY],
            turn: Player::Blue,
            step_count: 0,
            legal: 0,
            outcome: None,
        };
        board.refresh();
        board
    }

    /// Independent copy for simulation.
    #[inline]
    pub fn copy(&self) -> Board {
        *self
    }

    /// Reset to the initial configuration, keeping the board size.
    pub fn clear_board(&mut self) {
        *self = Self::initial(self.len());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn active_player(&self) -> Player {
        self.turn
    }

    #[inline]
    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Current cell of `player`.
    pub fn position(&self, player: Player) -> Cell {
        let bits = self.positions[player.index()][0];
        Cell::from_index(bits.trailing_zeros() as usize, self.len())
    }

    /// Current wall layers.
    #[inline]
    pub fn walls(&self) -> Walls {
        self.walls[0]
    }

    pub fn has_wall(&self, cell: Cell, wall: Wall) -> bool {
        let len = self.len();
        cell.row < len && cell.col < len && {
            // Rim edges report as blocked but carry no wall
            let mut probe = Walls::NONE;
            probe.place(len, cell, wall) && self.walls[0].blocks(len, cell, wall)
        }
    }

    /// Raw bitboard for feature plane `index`.
    pub fn plane(&self, index: usize) -> u64 {
        let full = if self.len() == MAX_BOARD_LEN {
            u64::MAX
        } else {
            (1u64 << (self.len() * self.len())) - 1
        };
        match index {
            0..=2 => self.positions[0][index],
            3..=5 => self.positions[1][index - 3],
            6..=8 => self.walls[index - 6].horizontal,
            9..=11 => self.walls[index - 9].vertical,
            TURN_PLANE if self.turn == Player::Green => full,
            _ => 0,
        }
    }

    /// Feature tensor of shape `[13, len, len]`, flattened row-major.
    pub fn feature_planes(&self) -> Vec<f32> {
        let cells = self.len() * self.len();
        let mut out = Vec::with_capacity(NUM_PLANES * cells);
        for plane in 0..NUM_PLANES {
            let bits = self.plane(plane);
            out.extend((0..cells).map(|i| ((bits >> i) & 1) as f32));
        }
        out
    }

    /// Legal actions as a bitmask over action ids.
    #[inline]
    pub fn legal_mask(&self) -> u128 {
        self.legal
    }

    #[inline]
    pub fn is_legal(&self, action: u8) -> bool {
        (action as usize) < NUM_ACTIONS && (self.legal >> action) & 1 == 1
    }

    /// Legal action ids in ascending order.
    pub fn available_actions(&self) -> Vec<u8> {
        (0..NUM_ACTIONS as u8).filter(|&a| self.is_legal(a)).collect()
    }

    pub fn num_available_actions(&self) -> usize {
        self.legal.count_ones() as usize
    }

    /// Apply `action` for the side to move.
    ///
    /// Fails without touching the board if the action is not legal.
    pub fn do_action(&mut self, action: u8) -> Result<(), BoardError> {
        if !self.is_legal(action) {
            return Err(BoardError::IllegalAction { action });
        }
        let (index, wall) = decode(action).ok_or(BoardError::IllegalAction { action })?;
        let len = self.len();
        let (dr, dc) = MOVE_OFFSETS[index];
        let dest = self
            .position(self.turn)
            .offset(dr, dc, len)
            .ok_or(BoardError::IllegalAction { action })?;

        let me = self.turn.index();
        self.positions[me].copy_within(0..HISTORY - 1, 1);
        self.walls.copy_within(0..HISTORY - 1, 1);

        self.positions[me][0] = 1u64 << dest.index(len);
        self.walls[0].place(len, dest, wall);

        self.turn = self.turn.opponent();
        self.step_count += 1;
        self.refresh();

        trace!(
            action,
            step = self.step_count,
            terminal = self.outcome.is_some(),
            "Applied action"
        );
        Ok(())
    }

    /// Whether the players have been walled apart.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// The result, once terminal.
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Flood-filled regions of (Blue, Green), each ignoring the other player.
    pub fn territory_sets(&self) -> (CellSet, CellSet) {
        let len = self.len();
        let walls = self.walls();
        (
            reachable(len, self.position(Player::Blue), &walls, None, None),
            reachable(len, self.position(Player::Green), &walls, None, None),
        )
    }

    /// Reflection across the main diagonal.
    ///
    /// Every spatial layer is transposed and the horizontal and vertical
    /// wall groups trade places. The side to move is unchanged.
    pub fn transposed(&self) -> Board {
        let len = self.len();
        let mut board = *self;
        for player in &mut board.positions {
            for layer in player.iter_mut() {
                *layer = transpose_bits(*layer, len);
            }
        }
        for walls in &mut board.walls {
            *walls = walls.transposed(len);
        }
        board.refresh();
        board
    }

    /// Recompute the cached outcome and legal actions.
    fn refresh(&mut self) {
        self.outcome = self.compute_outcome();
        self.legal = match self.outcome {
            Some(_) => 0,
            None => self.compute_legal(),
        };
    }

    fn compute_outcome(&self) -> Option<Outcome> {
        let len = self.len();
        let walls = self.walls();
        let blue = self.position(Player::Blue);
        let green = self.position(Player::Green);
        if connected(len, blue, green, &walls) {
            return None;
        }

        let (blue_terr, green_terr) = self.territory_sets();
        let outcome = match blue_terr.len().cmp(&green_terr.len()) {
            std::cmp::Ordering::Greater => Outcome::Winner(Player::Blue),
            std::cmp::Ordering::Less => Outcome::Winner(Player::Green),
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        trace!(
            blue = blue_terr.len(),
            green = green_terr.len(),
            %outcome,
            "Players separated"
        );
        Some(outcome)
    }

    fn compute_legal(&self) -> u128 {
        let len = self.len();
        let walls = self.walls();
        let here = self.position(self.turn);
        let blocker = self.position(self.turn.opponent());
        let destinations = reachable(len, here, &walls, Some(blocker), Some(MAX_MOVE_STEPS));

        let mut mask = 0u128;
        for dest in destinations.cells(len) {
            let dr = dest.row as i32 - here.row as i32;
            let dc = dest.col as i32 - here.col as i32;
            let Some(index) = move_index(dr, dc) else {
                continue;
            };
            for wall in Wall::ALL {
                if walls.placeable(len, dest, wall) {
                    mask |= 1u128 << encode(index, wall);
                }
            }
        }
        mask
    }
}

impl fmt::Display for Board {
    /// ASCII rendering: `B`/`G` for players, `|` and `---` for walls.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.len();
        let walls = self.walls();
        let blue = self.position(Player::Blue);
        let green = self.position(Player::Green);
        for row in 0..len {
            let mut line = String::new();
            let mut under = String::new();
            for col in 0..len {
                let cell = Cell::new(row, col);
                line.push(if cell == blue {
                    'B'
                } else if cell == green {
                    'G'
                } else {
                    '.'
                });
                if col + 1 < len {
                    line.push(if walls.blocks(len, cell, Wall::Right) {
                        '|'
                    } else {
                        ' '
                    });
                }
                under.push(if row + 1 < len && walls.blocks(len, cell, Wall::Down) {
                    '-'
                } else {
                    ' '
                });
                if col + 1 < len {
                    under.push(' ');
                }
            }
            writeln!(f, "{}", line)?;
            if row + 1 < len {
                writeln!(f, "{}", under.trim_end())?;
            }
        }
        write!(f, "{} to move, step {}", self.turn, self.step_count)
    }
}
