//! Error types for scroll-lint-core.
//!
//! Data-quality problems are never errors here — the checkers convert them
//! into [`Notice`](crate::notice::Notice) records and keep going. These types
//! cover the two places a genuine failure can surface: fetching remote
//! content and loading configuration.

use thiserror::Error;

/// Errors raised by a [`FileSource`](crate::source::FileSource)
/// implementation.
///
/// The checkers catch every variant at the call site and convert it into a
/// notice; none of them propagates out of a check.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The requested file does not exist in the repository.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The transport failed (network, storage, whatever backs the source).
    #[error("fetch failed: {0}")]
    Transport(String),
}

/// Result type alias using [`FetchError`].
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur when loading checking options from files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;
