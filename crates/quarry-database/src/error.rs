//! Store failure translation.
//!
//! Every backend error leaves this crate as an [`AppError`] whose kind tells
//! the caller whether retrying can help.

use quarry_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Failures raised by the store layer itself rather than the database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An entity serialized to something other than a JSON object.
    #[error("'{entity}' did not serialize to a JSON object")]
    NotAnObject {
        /// Table name of the entity.
        entity: &'static str,
    },
    /// A list value was supplied where a single column value is needed.
    #[error("column '{column}' cannot hold a list value")]
    ListValue {
        /// The offending column.
        column: String,
    },
    /// The store registry holds a different type under a table name.
    #[error("table '{table}' is already registered for another entity type")]
    TableTypeMismatch {
        /// The contested table name.
        table: &'static str,
    },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let kind = match err {
            StoreError::NotAnObject { .. } => ErrorKind::Serialization,
            StoreError::ListValue { .. } => ErrorKind::InvalidArgument,
            StoreError::TableTypeMismatch { .. } => ErrorKind::Configuration,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}

/// Wrap a sqlx error with `context`, classifying it by [`classify`].
pub fn store_error(context: &str, err: sqlx::Error) -> AppError {
    AppError::with_source(classify(&err), format!("{context}: {err}"), err)
}

/// Classify a sqlx error.
///
/// Connection, pool and TLS failures and the SQLSTATE classes for
/// connection exceptions (`08`), transaction rollbacks such as
/// serialization failures (`40`), insufficient resources (`53`) and
/// operator intervention (`57P`) are transient. A unique violation is a
/// conflict. Everything else is permanent.
pub fn classify(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => ErrorKind::StoreTransient,
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::Database(db) => match db.code() {
            Some(code) => classify_sqlstate(&code),
            None => ErrorKind::StorePermanent,
        },
        _ => ErrorKind::StorePermanent,
    }
}

/// Classify a PostgreSQL SQLSTATE code.
pub fn classify_sqlstate(code: &str) -> ErrorKind {
    if code == UNIQUE_VIOLATION {
        ErrorKind::Conflict
    } else if code.starts_with("08")
        || code.starts_with("40")
        || code.starts_with("53")
        || code.starts_with("57P")
    {
        ErrorKind::StoreTransient
    } else {
        ErrorKind::StorePermanent
    }
}
