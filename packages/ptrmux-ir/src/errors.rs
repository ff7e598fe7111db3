//! Error types for ptrmux-ir
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for ptrmux-ir operations
#[derive(Debug, Error)]
pub enum PtrMuxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (fact database contract violations are fatal)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PtrMuxError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        PtrMuxError::Parse(msg.into())
    }

    /// Create an internal error (alias for analysis error)
    pub fn internal(msg: impl Into<String>) -> Self {
        PtrMuxError::Analysis(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        PtrMuxError::Config(msg.into())
    }
}

/// Result type alias for ptrmux operations
pub type Result<T> = std::result::Result<T, PtrMuxError>;
