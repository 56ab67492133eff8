//! Boundary errors.
//!
//! The puzzle algorithms themselves never fail: illegal moves and loose drops are
//! no-ops. These types cover configuration and the two external collaborators.

use crate::types::GameType;

/// Invalid session configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("difficulty {difficulty} is out of range for {game_type} puzzles ({min}..={max})")]
    InvalidDifficulty {
        game_type: GameType,
        difficulty: u8,
        min: u8,
        max: u8,
    },
}

impl SessionError {
    pub fn invalid_difficulty(game_type: GameType, difficulty: u8) -> Self {
        let (min, max) = game_type.difficulty_range();
        SessionError::InvalidDifficulty {
            game_type,
            difficulty,
            min,
            max,
        }
    }
}

/// Best-time store failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("best-time store is unavailable: {0}")]
    Unavailable(String),
    #[error("best-time store I/O failed")]
    Io(#[from] std::io::Error),
    #[error("best-time store holds unreadable data: {0}")]
    Corrupt(String),
}

/// Completion recorder failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("completion recorder is disconnected")]
    Disconnected,
    #[error("completion recorder rejected the event: {0}")]
    Rejected(String),
}
