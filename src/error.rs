//! Error types for the storefront engine
//!
//! This module provides the crate's error hierarchy:
//! - `thiserror` for ergonomic error definitions
//! - Domain-specific variants for catalog contract violations
//! - Source chaining for snapshot I/O and JSON decoding
//! - Stable error codes for callers that surface errors to a UI layer

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the storefront engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: &'static str },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Store Errors
    // ========================================================================
    #[error("Store error: {message}")]
    Store {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Catalog Errors
    // ========================================================================
    #[error("Game {game_id} references tag '{tag}' which is not in the tag universe")]
    UnknownTag { game_id: i64, tag: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a store error
    pub fn store(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error with source
    pub fn store_with_source(
        message: impl Into<Cow<'static, str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create an unknown tag error
    pub fn unknown_tag(game_id: i64, tag: impl Into<String>) -> Self {
        Self::UnknownTag {
            game_id,
            tag: tag.into(),
        }
    }

    // ========================================================================
    // Error Classification
    // ========================================================================

    /// Returns true if this error is retryable.
    ///
    /// Only store failures qualify; everything the engine itself raises is a
    /// deterministic contract violation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store { .. } | Error::Io(_))
    }

    /// Returns true if the error was caused by the caller's input
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::UnknownTag { .. } | Error::NotFound { .. })
    }

    /// Get error code for callers that surface errors
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingEnvVar { .. } | Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::Store { .. } | Error::Io(_) => "STORE_ERROR",
            Error::NotFound { .. } => "NOT_FOUND",
            Error::UnknownTag { .. } => "UNKNOWN_TAG",
            Error::Json(_) => "SERIALIZATION_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}
