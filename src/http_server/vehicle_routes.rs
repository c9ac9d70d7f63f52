//! # Vehicle Routes
//!
//! CRUD, the vehicle grid and the analytics endpoints under `/vehicle`.
//! Every route requires a session.

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
use crate::service::vehicles::DEFAULT_LIST_LIMIT;
use crate::service::VehicleDto;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct FuelParams {
    pub value: f32,
}

#[derive(Debug, Deserialize)]
pub struct TypeParams {
    #[serde(rename = "type")]
    pub vehicle_type: String,
}

#[derive(Debug, Deserialize)]
pub struct EngineParams {
    pub min: i32,
    pub max: i32,
}

pub fn vehicle_routes(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create_handler).get(list_handler))
        .route("/query", post(query_handler))
        .route("/:id", get(get_handler).put(update_handler).delete(delete_handler))
        .route("/special/min-distance", get(min_distance_handler))
        .route("/special/fuel-gt/count", get(fuel_count_handler))
        .route("/special/fuel-gt", get(fuel_list_handler))
        .route("/special/by-type", get(by_type_handler))
        .route("/special/engine-between", get(engine_between_handler))
        .with_state(state)
}

async fn query_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    payload: Result<Json<GridQuery>, JsonRejection>,
) -> ApiResult<Json<QueryPage<VehicleDto>>> {
    let Json(query) = payload?;
    let page = run_blocking(&state, move |s| s.vehicles.query(&query)).await?;
    Ok(Json(page))
}

async fn create_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    payload: Result<Json<VehicleDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(dto) = payload?;
    let id = run_blocking(&state, move |s| s.vehicles.create(&dto)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

async fn list_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<VehicleDto>>> {
    let Query(params) = params?;
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let rows = run_blocking(&state, move |s| s.vehicles.list(offset, limit)).await?;
    Ok(Json(rows))
}

async fn get_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<VehicleDto>> {
    let Path(id) = id?;
    let dto = run_blocking(&state, move |s| s.vehicles.get(id)).await?;
    Ok(Json(dto))
}

async fn update_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<VehicleDto>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    run_blocking(&state, move |s| s.vehicles.update(id, &dto)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    run_blocking(&state, move |s| s.vehicles.delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn min_distance_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
) -> ApiResult<Json<VehicleDto>> {
    let dto = run_blocking(&state, |s| s.special.min_distance()).await?;
    Ok(Json(dto))
}

async fn fuel_count_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<FuelParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(params) = params?;
    let count = run_blocking(&state, move |s| s.special.count_fuel_greater_than(params.value)).await?;
    Ok(Json(json!({ "count": count })))
}

async fn fuel_list_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<FuelParams>, QueryRejection>,
) -> ApiResult<Json<Vec<VehicleDto>>> {
    let Query(params) = params?;
    let rows = run_blocking(&state, move |s| s.special.list_fuel_greater_than(params.value)).await?;
    Ok(Json(rows))
}

async fn by_type_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<TypeParams>, QueryRejection>,
) -> ApiResult<Json<Vec<VehicleDto>>> {
    let Query(params) = params?;
    let rows = run_blocking(&state, move |s| s.special.list_by_type(&params.vehicle_type)).await?;
    Ok(Json(rows))
}

async fn engine_between_handler(
    State(state): State<SharedState>,
    _caller: AuthenticatedAdmin,
    params: Result<Query<EngineParams>, QueryRejection>,
) -> ApiResult<Json<Vec<VehicleDto>>> {
    let Query(params) = params?;
    let rows = run_blocking(&state, move |s| {
        s.special.list_engine_power_between(params.min, params.max)
    })
    .await?;
    Ok(Json(rows))
}
