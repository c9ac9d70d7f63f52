//! CLI error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::auth::AuthError;
use crate::storage::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing, malformed or invalid
    ConfigError,
    /// stdout or filesystem failure
    IoError,
    /// Database could not be opened or queried
    StoreError,
    /// Admin account was refused (duplicate login, weak password)
    AdminRejected,
    /// Runtime or listener could not start
    BootFailed,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "FLEET_CLI_CONFIG_ERROR",
            Self::IoError => "FLEET_CLI_IO_ERROR",
            Self::StoreError => "FLEET_CLI_STORE_ERROR",
            Self::AdminRejected => "FLEET_CLI_ADMIN_REJECTED",
            Self::BootFailed => "FLEET_CLI_BOOT_FAILED",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::StoreError, e.to_string())
    }
}

impl From<AuthError> for CliError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::StorageError(msg) => Self::new(CliErrorCode::StoreError, msg),
            other => Self::new(CliErrorCode::AdminRejected, other.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
