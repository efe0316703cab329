//! Error types for title extraction.
//!
//! Running out of input while looking for a title is not an error: the
//! extractor reports it as an absent title. What remains here are genuine
//! failures of the transport or of caller-supplied configuration.

use thiserror::Error;

/// Errors surfaced by keepsake operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Building or sending the HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading from the byte source failed before a title was found.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL given by the caller could not be parsed.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A log level name was not one of debug, info, warn or error.
    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
