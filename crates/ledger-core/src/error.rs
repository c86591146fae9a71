//! Error types for Ledger

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed field in a record payload
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid month token: {0} (expected YYYY-MM)")]
    InvalidMonthToken(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether this error was caused by caller input rather than the store
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidMonthToken(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
