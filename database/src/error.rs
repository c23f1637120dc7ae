use dimension::DimensionError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored dimension content: {0}")]
    Dimension(#[from] DimensionError),

    /// Another writer saved the entity since it was loaded
    #[error("{resource_key} '{id}' was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        resource_key: String,
        id: String,
        expected: i64,
        actual: i64,
    },

    #[error("Database path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),
}
