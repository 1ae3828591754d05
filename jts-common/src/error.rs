//! Common error types for JTS

use thiserror::Error;

/// Common result type for JTS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the JTS crates
#[derive(Error, Debug)]
pub enum Error {
    /// A catalog source could not be opened or read. Aborts the load run.
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// The document store rejected a submission or clear
    #[error("Indexing error: {0}")]
    Indexing(String),

    /// The document store failed to answer a query
    #[error("Search error: {0}")]
    Search(String),

    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable code reported to API callers
    pub fn code(&self) -> &'static str {
        match self {
            Error::DataLoad(_) => "DATA_LOAD_ERROR",
            Error::Indexing(_) => "INDEXING_ERROR",
            Error::Search(_) => "SEARCH_ERROR",
            #[cfg(feature = "sqlx")]
            Error::Database(_) => "DATABASE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::DataLoad("x".into()).code(), "DATA_LOAD_ERROR");
        assert_eq!(Error::Indexing("x".into()).code(), "INDEXING_ERROR");
        assert_eq!(Error::Search("x".into()).code(), "SEARCH_ERROR");
    }

    #[test]
    fn test_error_display_includes_message() {
        let err = Error::Search("store unreachable".into());
        assert_eq!(err.to_string(), "Search error: store unreachable");
    }
}
