//! Journal error type
//!
//! The server maps these onto HTTP: `InvalidInput` is 400, `NotFound` is 404,
//! everything else is a 500 whose detail stays in the log.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Query, pool or migration failure, including constraint violations
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Creating the data folder
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or unparsable config.toml
    #[error("Configuration error: {0}")]
    Config(String),

    /// Id with no matching row. The message is shown to the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected payload or filter. The message is shown to the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Broken invariant, e.g. a stored sentiment outside the allowed set
    #[error("Internal error: {0}")]
    Internal(String),
}
