//! # Shared handler state
//!
//! Services are synchronous and talk to SQLite, so handlers hand them to the
//! blocking pool through [`run_blocking`].

use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::errors::{ApiError, ApiResult};
use crate::auth::{AuthError, AuthService, InMemorySessionRepository, SessionConfig};
use crate::model::AdminRef;
use crate::service::{PersonService, ServiceResult, SpecialService, VehicleService};
use crate::storage::Database;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub auth: AuthService<InMemorySessionRepository>,
    pub vehicles: VehicleService,
    pub persons: PersonService,
    pub special: SpecialService,
}

impl AppState {
    pub fn new(db: Arc<Database>, sessions: SessionConfig, search_limit_max: u32) -> Self {
        Self {
            auth: AuthService::new(db.clone(), sessions, InMemorySessionRepository::new()),
            vehicles: VehicleService::new(db.clone()),
            persons: PersonService::new(db.clone(), search_limit_max),
            special: SpecialService::new(db),
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

/// Run a service call on the blocking pool
pub async fn run_blocking<T, F>(state: &SharedState, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> ServiceResult<T> + Send + 'static,
{
    let state = state.clone();
    Ok(tokio::task::spawn_blocking(move || f(&state)).await??)
}

/// Extract bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

/// The admin behind a live session. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub admin: AdminRef,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<SharedState> for AuthenticatedAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &SharedState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::AuthenticationRequired)?;
        let lookup = token.clone();
        let admin = run_blocking(state, move |s| Ok(s.auth.authenticate(&lookup)?)).await?;
        Ok(Self { admin, token })
    }
}
