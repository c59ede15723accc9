//! Unified error types for Quarry.
//!
//! Store backends translate their native failures into [`AppError`] so the
//! repository surface exposes one error type with a stable [`ErrorKind`].
//! Nothing in the core retries: a [`ErrorKind::StoreTransient`] error is
//! handed back to the caller, who decides whether to try again.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The identity addressed by a mutation does not exist in the store.
    NotFound,
    /// A malformed specification, query, or entity was supplied.
    InvalidArgument,
    /// The store rejected the change because it collides with existing data.
    Conflict,
    /// The store could not complete the operation; retrying may succeed.
    StoreTransient,
    /// The store could not complete the operation; retrying will not help.
    StorePermanent,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal invariant was broken.
    Internal,
}

impl ErrorKind {
    /// Whether this kind describes a failure inside the underlying store.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::StoreTransient | Self::StorePermanent)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::StoreTransient => write!(f, "STORE_TRANSIENT"),
            Self::StorePermanent => write!(f, "STORE_PERMANENT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout Quarry.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a transient store failure.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreTransient, message)
    }

    /// Create a permanent store failure.
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StorePermanent, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the caller may safely retry the failed operation.
    pub fn is_transient(&self) -> bool {
        self.kind == ErrorKind::StoreTransient
    }

    /// Whether this error reports a missing identity.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
