//! Error types for docpage
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Store and cache adapters report their own narrower error types, which
//! convert into [`Error`] at the paginator boundary.

use thiserror::Error;

/// The main error type for docpage
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("Invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    #[error("Invalid cursor: '{cursor}'")]
    InvalidCursor { cursor: String },

    // ============================================================================
    // Collaborator Errors
    // ============================================================================
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    #[error(transparent)]
    CacheUnavailable(#[from] CacheError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid cursor error
    pub fn invalid_cursor(cursor: impl Into<String>) -> Self {
        Self::InvalidCursor {
            cursor: cursor.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error was caused by the caller's input rather than a
    /// collaborator failure
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgument { .. } | Error::InvalidCursor { .. }
        )
    }
}

/// Failure reported by a document store adapter
#[derive(Error, Debug)]
#[error("Document store unavailable during {operation}: {message}")]
pub struct StoreError {
    /// Store operation that failed ("count", "find", ...)
    pub operation: String,
    /// Adapter-provided description
    pub message: String,
}

impl StoreError {
    /// Create a store error for an operation
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by a cache store adapter
#[derive(Error, Debug)]
#[error("Cache unavailable: {message}")]
pub struct CacheError {
    /// Adapter-provided description
    pub message: String,
}

impl CacheError {
    /// Create a cache error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type alias for docpage
pub type Result<T> = std::result::Result<T, Error>;
