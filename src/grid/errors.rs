//! Grid engine errors
//!
//! Error codes:
//! - FLEET_GRID_BACKEND_FAILED (ERROR)
//!
//! Malformed filters, unknown columns and unparseable dates never become
//! errors; they only drop the affected predicate. The one failure the engine
//! surfaces is the backend rejecting or failing a query.

use std::fmt;

use thiserror::Error;

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridErrorCode {
    /// Page, key or count query failed in the backend
    BackendFailed,
}

impl GridErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            GridErrorCode::BackendFailed => "FLEET_GRID_BACKEND_FAILED",
        }
    }
}

impl fmt::Display for GridErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Grid error with context
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct GridError {
    code: GridErrorCode,
    message: String,
}

impl GridError {
    /// The backend failed to run a query
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            code: GridErrorCode::BackendFailed,
            message: message.into(),
        }
    }

    pub fn code(&self) -> GridErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
