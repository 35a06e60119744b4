use thiserror::Error;

/// Main error type for round tracking operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if error was caused by malformed caller input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
