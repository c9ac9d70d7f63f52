//! Business-rule errors shared by the person, vehicle and analytics services

use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::grid::GridError;
use crate::storage::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// One rejected input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: &str, message: &str) -> Self {
        Self {
            path: path.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// Request body failed field validation
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// Delete refused because other rows still reference the target
    #[error("{message}")]
    Conflict { message: String, ref_count: u64 },

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Grid(#[from] GridError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        ServiceError::NotFound(format!("{} not found: {}", entity, id))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) | ServiceError::Validation(_) => 400,
            ServiceError::Auth(err) => err.status_code(),
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict { .. } => 409,
            ServiceError::Grid(_) | ServiceError::Store(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::not_found("Vehicle", 3).status_code(), 404);
        assert_eq!(ServiceError::not_found("Vehicle", 3).to_string(), "Vehicle not found: 3");
        assert_eq!(ServiceError::Validation(vec![]).status_code(), 400);
        assert_eq!(
            ServiceError::Conflict {
                message: "x".into(),
                ref_count: 2
            }
            .status_code(),
            409
        );
        assert_eq!(ServiceError::from(AuthError::AuthenticationRequired).status_code(), 401);
        assert_eq!(ServiceError::from(GridError::backend("boom")).status_code(), 500);
    }
}
