//! Store error types
//!
//! Error codes:
//! - FLEET_STORE_QUERY_FAILED (ERROR severity)
//! - FLEET_STORE_CONSTRAINT (ERROR severity)
//! - FLEET_STORE_LOCK_POISONED (FATAL severity)

use std::fmt;

use thiserror::Error;

use crate::grid::GridError;
use crate::observability::{log_event_with_fields, Event};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// SQLite rejected or failed a statement
    QueryFailed,
    /// A unique or foreign-key constraint was violated
    Constraint,
    /// The connection mutex was poisoned by a panicking holder
    LockPoisoned,
}

impl StoreErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::QueryFailed => "FLEET_STORE_QUERY_FAILED",
            StoreErrorCode::Constraint => "FLEET_STORE_CONSTRAINT",
            StoreErrorCode::LockPoisoned => "FLEET_STORE_LOCK_POISONED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreErrorCode::LockPoisoned)
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with context
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    #[source]
    source: Option<rusqlite::Error>,
}

impl StoreError {
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::QueryFailed,
            message: message.into(),
            source: None,
        }
    }

    pub fn lock_poisoned() -> Self {
        Self {
            code: StoreErrorCode::LockPoisoned,
            message: "database connection lock poisoned".to_string(),
            source: None,
        }
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when SQLite refused the write because of a constraint
    pub fn is_constraint(&self) -> bool {
        self.code == StoreErrorCode::Constraint
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => StoreErrorCode::Constraint,
            _ => StoreErrorCode::QueryFailed,
        };
        let message = err.to_string();
        log_event_with_fields(
            Event::StoreQueryFailed,
            &[("code", code.code()), ("error", message.as_str())],
        );
        Self {
            code,
            message,
            source: Some(err),
        }
    }
}

impl From<StoreError> for GridError {
    fn from(err: StoreError) -> Self {
        GridError::backend(err.message)
    }
}
