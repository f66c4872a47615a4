//! Error types for the meet_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for meet_core operations
///
/// Engine operations never fail; these cover loading meets, reading
/// configuration, persisting custom orders and exporting sheets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Program-order store error
    #[error("Order store error: {0}")]
    Store(String),

    /// Meet data is unusable (missing event, unknown race, ...)
    #[error("Meet error: {0}")]
    Meet(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
