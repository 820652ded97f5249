//! Common error types for PhiloPalette

use thiserror::Error;

/// Common result type for PhiloPalette operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across PhiloPalette crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A catalog source failed to deliver books
    #[error("Catalog source error: {0}")]
    CatalogSource(String),
}
