use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Code reader error: {0}")]
    Reader(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Unknown player color: {0}")]
    InvalidColor(String),
}

impl CoreError {
    pub fn reader(msg: impl Into<String>) -> Self {
        Self::Reader(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
