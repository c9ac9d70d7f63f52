//! # FleetDesk Auth Module
//!
//! Admin accounts with Argon2 password hashes and opaque bearer sessions
//! kept in memory.

pub mod crypto;
pub mod errors;
pub mod service;
pub mod session;

pub use errors::{AuthError, AuthResult};
pub use service::{create_admin, AuthService, LoginRequest, LoginResponse};
pub use session::{InMemorySessionRepository, Session, SessionConfig, SessionManager, SessionRepository};
