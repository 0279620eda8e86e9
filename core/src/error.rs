use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Unknown action `{0}`")]
    UnknownAction(String),
    #[error("Invalid payload for `{action}`: {reason}")]
    InvalidPayload { action: String, reason: String },
    #[error("Unknown direction `{0}`")]
    UnknownDirection(String),
    #[error("Unknown difficulty `{0}`")]
    UnknownDifficulty(String),
    #[error("At least one game must be registered")]
    NoGames,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not encode setting: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Settings backend failed: {0}")]
    Io(#[from] std::io::Error),
}
