//! # Auth Errors
//!
//! Error types for admin authentication and sessions.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Authentication Errors
    // ==================
    /// Unknown login or wrong password (never says which)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Login already taken
    #[error("Login already registered")]
    LoginAlreadyExists,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Login is empty after trimming
    #[error("Login must not be blank")]
    BlankLogin,

    // ==================
    // Session Errors
    // ==================
    /// No bearer token on a request that needs one
    #[error("No active session")]
    AuthenticationRequired,

    /// Token unknown, expired or revoked
    #[error("Session expired or invalid")]
    SessionInvalid,

    /// Authorization header present but not `Bearer <token>`
    #[error("Malformed token")]
    MalformedToken,

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::WeakPassword(_) => 400,
            AuthError::BlankLogin => 400,
            AuthError::MalformedToken => 400,

            AuthError::InvalidCredentials => 401,
            AuthError::AuthenticationRequired => 401,
            AuthError::SessionInvalid => 401,

            AuthError::LoginAlreadyExists => 409,

            AuthError::HashingFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<crate::storage::StoreError> for AuthError {
    fn from(err: crate::storage::StoreError) -> Self {
        AuthError::StorageError(err.message().to_string())
    }
}
