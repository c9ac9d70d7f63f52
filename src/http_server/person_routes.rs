//! # Person Routes
//!
//! Owners under `/person`: grid, CRUD, guarded or reassigning delete, name
//! search for pickers and usage counts. Every route requires a session.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::ApiResult;
use super::state::{run_blocking, AuthenticatedAdmin, SharedState};
use crate::grid::{GridQuery, QueryPage};
use crate::service::persons::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT};
use crate::service::{PersonDto, Usage};

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "reassignTo")]
    pub reassign_to: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

pub fn person_routes(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create_handler))
        .route("/query", post(query_handler))
        .route("/search", get(search_handler))
        .route("/list", get(list_handler))
        .route("/:id", get(get_handler).put(update_handler).delete(delete_handler))
        .route("/:id/usage", get(usage_handler))
        .with_state(state)
}

async fn query_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    payload: Result<Json<GridQuery>, JsonRejection>,
) -> ApiResult<Json<QueryPage<PersonDto>>> {
    let Json(query) = payload?;
    let page = run_blocking(&state, move |s| s.persons.query(&query)).await?;
    Ok(Json(page))
}

async fn create_handler(
    State(state): State<SharedState>,
    caller: AuthenticatedAdmin,
    payload: Result<Json<PersonDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(dto) = payload?;
    let id = run_blocking(&state, move |s| s.persons.create(&dto, &caller.admin)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn get_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<PersonDto>> {
    let Path(id) = id?;
    let dto = run_blocking(&state, move |s| s.persons.get(id)).await?;
    Ok(Json(dto))
}

async fn update_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PersonDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    run_blocking(&state, move |s| s.persons.update(id, &dto)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Query(params) = params?;
    run_blocking(&state, move |s| s.persons.delete(id, params.reassign_to)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<Vec<PersonDto>>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let rows = run_blocking(&state, move |s| s.persons.search(params.q.as_deref(), limit)).await?;
    Ok(Json(rows))
}

async fn list_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<PersonDto>>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let rows = run_blocking(&state, move |s| s.persons.list(limit)).await?;
    Ok(Json(rows))
}

async fn usage_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Usage>> {
    let Path(id) = id?;
    let usage = run_blocking(&state, move |s| s.persons.usage(id)).await?;
    Ok(Json(usage))
}
