//! # Session Management
//!
//! Opaque bearer sessions for admins. The raw token is handed to the client
//! once; only its digest is kept.
//!
//! Sessions expire at `expires_at` and logout revokes them immediately.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::crypto::{constant_time_str_eq, generate_token, hash_token};
use super::errors::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub admin_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Session {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(720),
        }
    }
}

/// Session storage seam
pub trait SessionRepository: Send + Sync {
    fn create(&self, session: &Session) -> AuthResult<()>;

    fn find_by_token_hash(&self, hash: &str) -> AuthResult<Option<Session>>;

    fn revoke(&self, id: Uuid) -> AuthResult<()>;

    /// Drop sessions that expired before `now`; returns how many
    fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<usize>;
}

/// Process-local session table
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: std::sync::RwLock<Vec<Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::StorageError("Lock poisoned".to_string())
}

impl SessionRepository for InMemorySessionRepository {
    fn create(&self, session: &Session) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.push(session.clone());
        Ok(())
    }

    fn find_by_token_hash(&self, hash: &str) -> AuthResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .iter()
            .find(|s| constant_time_str_eq(&s.token_hash, hash))
            .cloned())
    }

    fn revoke(&self, id: Uuid) -> AuthResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        match sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.revoked = true;
                Ok(())
            }
            None => Err(AuthError::SessionInvalid),
        }
    }

    fn delete_expired(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|s| s.expires_at > now);
        Ok(before - sessions.len())
    }
}

/// Issues, validates and revokes sessions
pub struct SessionManager<R: SessionRepository> {
    config: SessionConfig,
    repository: R,
}

impl<R: SessionRepository> SessionManager<R> {
    pub fn new(config: SessionConfig, repository: R) -> Self {
        Self { config, repository }
    }

    /// Start a session; returns it with the raw token
    pub fn create_session(&self, admin_id: i64) -> AuthResult<(Session, String)> {
        let token = generate_token();
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            admin_id,
            token_hash: hash_token(&token),
            created_at: now,
            expires_at: now + self.config.ttl,
            revoked: false,
        };

        let _ = self.repository.delete_expired(now)?;
        self.repository.create(&session)?;
        Ok((session, token))
    }

    /// The live session behind `token`
    pub fn validate(&self, token: &str) -> AuthResult<Session> {
        let session = self
            .repository
            .find_by_token_hash(&hash_token(token))?
            .ok_or(AuthError::SessionInvalid)?;

        if !session.is_active(Utc::now()) {
            return Err(AuthError::SessionInvalid);
        }
        Ok(session)
    }

    /// Revoke the session behind `token`
    pub fn revoke(&self, token: &str) -> AuthResult<Session> {
        let session = self.validate(token)?;
        self.repository.revoke(session.id)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(ttl: Duration) -> SessionManager<InMemorySessionRepository> {
        SessionManager::new(SessionConfig { ttl }, InMemorySessionRepository::new())
    }

    #[test]
    fn test_create_and_validate() {
        let manager = manager(Duration::minutes(5));
        let (session, token) = manager.create_session(7).unwrap();

        assert_ne!(session.token_hash, token);
        let found = manager.validate(&token).unwrap();
        assert_eq!(found.admin_id, 7);
        assert!(matches!(manager.validate("bogus"), Err(AuthError::SessionInvalid)));
    }

    #[test]
    fn test_revoke_invalidates_immediately() {
        let manager = manager(Duration::minutes(5));
        let (_, token) = manager.create_session(1).unwrap();

        manager.revoke(&token).unwrap();
        assert!(matches!(manager.validate(&token), Err(AuthError::SessionInvalid)));
        assert!(manager.revoke(&token).is_err());
    }

    #[test]
    fn test_expired_session_is_rejected_and_swept() {
        let manager = manager(Duration::seconds(-1));
        let (_, token) = manager.create_session(1).unwrap();
        assert!(matches!(manager.validate(&token), Err(AuthError::SessionInvalid)));

        let swept = manager.repository.delete_expired(Utc::now()).unwrap();
        assert_eq!(swept, 1);
    }
}
