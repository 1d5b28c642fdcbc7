use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("number of enemies must be at least 1, got {0}")]
    InvalidEnemyCount(u32),

    #[error("unknown fight style: {0}")]
    UnknownFightStyle(String),
}
