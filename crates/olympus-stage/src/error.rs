//! Error types for books and library export

use olympus_math::MathError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Book JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Round failed: {0}")]
    Math(#[from] MathError),

    #[error("Library I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StageResult<T> = Result<T, StageError>;
