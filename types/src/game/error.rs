use thiserror::Error as ThisError;

/// Reasons a roll request is rejected. None of these mutate the session.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid dice count {0} (expected 1 or 2)")]
    InvalidDiceCount(i64),
    #[error("unknown mode {0:?} (expected solo, vs_computer or two_player)")]
    UnknownMode(String),
    #[error("unknown player {0} (expected 1 or 2)")]
    UnknownPlayer(i64),
    #[error("two_player rolls must name a player")]
    MissingPlayer,
}

impl GameError {
    /// Stable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::InvalidDiceCount(_) => "INVALID_DICE_COUNT",
            GameError::UnknownMode(_) => "UNKNOWN_MODE",
            GameError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            GameError::MissingPlayer => "MISSING_PLAYER",
        }
    }
}
