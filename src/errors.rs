/*!
 * Error types for the ass2docx application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a subtitle source.
///
/// These never abort extraction; they are reported next to whatever
/// dialogue was parsed before the failure.
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file could not be opened
    #[error("Failed to open subtitle file {path:?}: {source}")]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reading failed partway through the source
    #[error("Failed to read subtitle source at line {line}: {source}")]
    Read {
        /// 1-based line number of the line that could not be read
        line: usize,
        /// Underlying I/O error (including invalid UTF-8)
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while emitting a transcript document
#[derive(Error, Debug)]
pub enum EmitError {
    /// There is nothing to put in the document
    #[error("Refusing to create a document without dialogue")]
    EmptyTranscript,

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while writing the zip package
    #[error("Packaging error: {0}")]
    Package(#[from] zip::result::ZipError),

    /// The finished document could not be moved into place
    #[error("Failed to persist document to {path:?}: {message}")]
    Persist {
        /// Destination path
        path: PathBuf,
        /// Reason reported by the filesystem
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from document emission
    #[error("Document error: {0}")]
    Emit(#[from] EmitError),

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
