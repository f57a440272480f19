//! Error types for the scamcheck library.
//!
//! All errors are represented by the [`ScamCheckError`] enum. Startup problems
//! (missing or incompatible artifacts, unreadable stopword files) surface as
//! errors from the loading functions; the classification path itself only
//! fails when a custom pipeline component does.
//!
//! # Examples
//!
//! ```
//! use scamcheck::error::{ScamCheckError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ScamCheckError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for scamcheck operations.
#[derive(Error, Debug)]
pub enum ScamCheckError {
    /// I/O errors (file operations, stdin, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Artifact loading/saving errors, including incompatible artifacts
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Model errors (dimension mismatches, malformed parameters)
    #[error("Model error: {0}")]
    Model(String),

    /// Training-related errors
    #[error("Training error: {0}")]
    Training(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary serialization/deserialization errors
    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ScamCheckError.
pub type Result<T> = std::result::Result<T, ScamCheckError>;

impl ScamCheckError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ScamCheckError::Analysis(msg.into())
    }

    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        ScamCheckError::Artifact(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        ScamCheckError::Model(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        ScamCheckError::Training(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ScamCheckError::InvalidArgument(msg.into())
    }
}
