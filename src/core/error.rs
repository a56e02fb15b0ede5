use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForagerError {
    #[error("Invalid board dimensions: {width}x{height}")]
    InvalidBoard { width: i32, height: i32 },

    #[error("Snapshot board {actual:?} does not match agent board {expected:?}")]
    BoardMismatch {
        expected: (i32, i32),
        actual: (i32, i32),
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForagerError>;
