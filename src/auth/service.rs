//! # Auth Service
//!
//! Admin login, logout and session lookup on top of the admin store and the
//! session manager.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::crypto::{hash_password, validate_password, verify_password};
use super::errors::{AuthError, AuthResult};
use super::session::{SessionConfig, SessionManager, SessionRepository};
use crate::model::{now_millis, AdminRef};
use crate::observability::{log_event_with_fields, Event};
use crate::storage::{AdminStore, Database};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub admin_id: i64,
    pub login: String,
}

pub struct AuthService<S: SessionRepository> {
    db: Arc<Database>,
    sessions: SessionManager<S>,
}

impl<S: SessionRepository> AuthService<S> {
    pub fn new(db: Arc<Database>, config: SessionConfig, repository: S) -> Self {
        Self {
            db,
            sessions: SessionManager::new(config, repository),
        }
    }

    /// Check credentials and open a session
    pub fn login(&self, request: &LoginRequest) -> AuthResult<LoginResponse> {
        let login = request.login.trim();
        let admin = AdminStore::new(&self.db).find_by_login(login)?;

        let admin = match admin {
            Some(admin) if verify_password(&request.password, &admin.pass_hash)? => admin,
            _ => {
                log_event_with_fields(Event::LoginFailed, &[("login", login)]);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let (session, token) = self.sessions.create_session(admin.id)?;
        let admin_id = admin.id.to_string();
        log_event_with_fields(Event::LoginSucceeded, &[("admin_id", admin_id.as_str())]);

        Ok(LoginResponse {
            status: "ok",
            token,
            expires_at: session.expires_at,
            admin_id: admin.id,
            login: admin.login,
        })
    }

    /// Revoke the session behind `token`
    pub fn logout(&self, token: &str) -> AuthResult<()> {
        let session = self.sessions.revoke(token)?;
        let admin_id = session.admin_id.to_string();
        log_event_with_fields(Event::Logout, &[("admin_id", admin_id.as_str())]);
        Ok(())
    }

    /// The admin owning a live session
    pub fn authenticate(&self, token: &str) -> AuthResult<AdminRef> {
        let session = self.sessions.validate(token)?;
        let admin = AdminStore::new(&self.db)
            .find(session.admin_id)?
            .ok_or(AuthError::SessionInvalid)?;
        Ok(AdminRef::from(&admin))
    }

    /// Register an admin with a freshly hashed password
    pub fn create_admin(&self, login: &str, password: &str) -> AuthResult<i64> {
        create_admin(&self.db, login, password)
    }
}

/// Register an admin without a running service (used by the CLI)
pub fn create_admin(db: &Database, login: &str, password: &str) -> AuthResult<i64> {
    let login = login.trim();
    if login.is_empty() {
        return Err(AuthError::BlankLogin);
    }
    validate_password(password)?;

    let store = AdminStore::new(db);
    if store.find_by_login(login)?.is_some() {
        return Err(AuthError::LoginAlreadyExists);
    }

    let hash = hash_password(password)?;
    let id = store.insert(login, &hash, &now_millis()).map_err(|e| {
        if e.is_constraint() {
            AuthError::LoginAlreadyExists
        } else {
            AuthError::from(e)
        }
    })?;

    log_event_with_fields(Event::AdminCreated, &[("login", login)]);
    Ok(id)
}
