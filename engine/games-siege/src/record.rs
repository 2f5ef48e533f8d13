//! Game records: a flat move list plus free-form metadata.
//!
//! Records are stored one JSON object per line. Loading a record replays
//! its moves from the initial board, so a corrupted move list is rejected
//! rather than partially applied.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, BoardError, Outcome};
use crate::notation::format_game;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Illegal move {action} at index {index}")]
    IllegalMove { index: usize, action: u8 },

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Move history of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub board_len: usize,
    pub moves: Vec<u8>,
    /// Unix seconds when the record was created
    pub timestamp: u64,
    #[serde(default)]
    pub result: Option<String>,
    /// Agent names, first mover first
    #[serde(default)]
    pub players: Vec<String>,
}

impl GameRecord {
    pub fn new(board_len: usize) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            board_len,
            moves: Vec::new(),
            timestamp,
            result: None,
            players: Vec::new(),
        }
    }

    pub fn with_players(mut self, players: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.players = players.into_iter().map(Into::into).collect();
        self
    }

    pub fn push(&mut self, action: u8) {
        self.moves.push(action);
    }

    pub fn set_outcome(&mut self, outcome: Outcome) {
        self.result = Some(outcome.to_string());
    }

    /// Rebuild the board by replaying every move from the start.
    pub fn replay(&self) -> Result<Board, RecordError> {
        let mut board = Board::new(self.board_len)?;
        for (index, &action) in self.moves.iter().enumerate() {
            board
                .do_action(action)
                .map_err(|_| RecordError::IllegalMove { index, action })?;
        }
        Ok(board)
    }

    /// Take back the last move and return the resulting board.
    ///
    /// With no moves left this is the initial board.
    pub fn undo(&mut self) -> Result<Board, RecordError> {
        self.moves.pop();
        self.replay()
    }

    pub fn notation(&self) -> Result<Vec<String>, RecordError> {
        Ok(format_game(self.board_len, &self.moves)?)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate one JSON line.
    pub fn from_json(line: &str) -> Result<Self, RecordError> {
        let record: GameRecord = serde_json::from_str(line)?;
        record.replay()?;
        Ok(record)
    }
}
