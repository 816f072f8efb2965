//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers every failure that can occur
//! when building a request, talking to the FMP API, decoding its payloads or
//! reading and writing local price files.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, body read failures, API error payloads).
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL with the API key redacted.
        url: String,
    },

    /// The API returned no data for the requested symbol and date range.
    #[error("Data not available for {symbol} in range {start} to {end}")]
    DataNotAvailable {
        /// The symbol(s) that were requested.
        symbol: String,
        /// Start of the requested date range.
        start: String,
        /// End of the requested date range.
        end: String,
    },

    /// Error decoding a payload or shaping it into a table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error reading or writing the local price-file cache.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
