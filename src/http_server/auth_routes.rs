//! # Auth Routes
//!
//! - `POST /auth/login`
//! - `POST /auth/logout`
//! - `GET /auth/me`
//! - `GET /auth/check-session`

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::errors::ApiResult;
use super::state::{run_blocking, AuthenticatedAdmin, SharedState};
use crate::auth::{LoginRequest, LoginResponse};
use crate::model::AdminRef;

pub fn auth_routes(state: SharedState) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/me", get(me_handler))
        .route("/check-session", get(check_session_handler))
        .with_state(state)
}

async fn login_handler(
    State(state): State<SharedState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let response = run_blocking(&state, move |s| Ok(s.auth.login(&request)?)).await?;
    Ok(Json(response))
}

async fn logout_handler(State(state): State<SharedState>, caller: AuthenticatedAdmin) -> ApiResult<Json<Value>> {
    run_blocking(&state, move |s| Ok(s.auth.logout(&caller.token)?)).await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn me_handler(caller: AuthenticatedAdmin) -> Json<AdminRef> {
    Json(caller.admin)
}

async fn check_session_handler(caller: AuthenticatedAdmin) -> Json<Value> {
    Json(json!({ "status": "ok", "login": caller.admin.login }))
}
