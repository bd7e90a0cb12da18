use thiserror::Error;

/// Failures surfaced to callers of the session operations.
///
/// Malformed yard lines, unknown patch keys and unrecognized kick types are
/// tolerated and never show up here.
#[derive(Debug, Error)]
pub enum KickError {
    #[error("no kick with id {id} in this session")]
    NotFound { id: u32 },

    #[error("session storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("session lock was poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, KickError>;
