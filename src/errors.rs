/*!
 * Error types for the siq-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

use crate::translation::batch::AlignmentReport;

/// Errors that can occur when working with translation provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while reading or writing the pack content document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The content could not be parsed as a single element tree
    #[error("Failed to parse document at byte {position}: {message}")]
    Parse {
        /// Byte offset in the normalized content where parsing stopped
        position: u64,
        /// What went wrong
        message: String,
    },

    /// The tree could not be rendered back to text
    #[error("Failed to serialize document: {0}")]
    Serialize(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The service returned a different number of lines than it was sent
    #[error("Batch {batch} is misaligned: sent {expected} lines, received {received}")]
    BatchMisaligned {
        /// One-based batch number
        batch: usize,
        /// Number of lines submitted
        expected: usize,
        /// Number of lines returned
        received: usize,
        /// Positional pairing of submitted and returned lines
        report: AlignmentReport,
    },
}

/// Errors that can occur while unpacking or repacking a pack archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unreadable zip container
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path that cannot be stored as an archive entry name
    #[error("Invalid archive entry path: {0}")]
    InvalidPath(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document parsing or serialization
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from archive handling
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
