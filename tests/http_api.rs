//! HTTP API Tests
//!
//! Drives the assembled router with `oneshot` requests:
//! - Sessions gate every data endpoint
//! - Vehicle and owner CRUD status codes and bodies
//! - Validation and refused-delete response shapes
//! - Grid endpoints accept data-grid request bodies

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fleetdesk::auth::{create_admin, SessionConfig};
use fleetdesk::http_server::{AppState, HttpServer, HttpServerConfig};
use fleetdesk::storage::Database;

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    let db = Arc::new(Database::open_in_memory().unwrap());
    create_admin(&db, "root", "correct-horse").unwrap();
    let state = AppState::new(db, SessionConfig::default(), 100).shared();
    HttpServer::new(HttpServerConfig::default(), state).router()
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"login": "root", "password": "correct-horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    body["token"].as_str().unwrap().to_string()
}

fn vehicle_body(name: &str, owner_id: Option<i64>) -> Value {
    json!({
        "name": name,
        "coordinates": {"x": 10.5, "y": 20.0},
        "type": "BOAT",
        "enginePower": 120,
        "numberOfWheels": 1,
        "distanceTravelled": 300,
        "fuelConsumption": 2.5,
        "fuelType": "DIESEL",
        "ownerId": owner_id
    })
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> i64 {
    let (status, created) = send(app, "POST", uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", created);
    created["id"].as_i64().unwrap()
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_health_needs_no_session() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_bad_credentials_are_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({"login": "root", "password": "wrong-horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_data_endpoints_require_session() {
    let app = app();
    for (method, uri) in [
        ("GET", "/vehicle"),
        ("POST", "/vehicle/query"),
        ("GET", "/person/search?q=a"),
        ("GET", "/auth/me"),
    ] {
        let (status, _) = send(&app, method, uri, None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }

    let (status, _) = send(&app, "GET", "/vehicle", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = app();
    let token = login(&app).await;

    let (status, me) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["login"], "root");

    let (status, _) = send(&app, "POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/auth/check-session", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 401);
}

// =============================================================================
// Vehicles
// =============================================================================

#[tokio::test]
async fn test_vehicle_lifecycle() {
    let app = app();
    let token = login(&app).await;

    let id = create(&app, &token, "/vehicle", vehicle_body("Nautilus", None)).await;

    let (status, body) = send(&app, "GET", &format!("/vehicle/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nautilus");
    assert_eq!(body["type"], "BOAT");
    assert!(body["creationDate"].is_string());

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/vehicle/{}", id),
        Some(&token),
        Some(vehicle_body("Nautilus II", None)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/vehicle?offset=0&limit=10", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Nautilus II");

    let (status, _) = send(&app, "DELETE", &format!("/vehicle/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &format!("/vehicle/{}", id), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_vehicle_validation_reports_every_field() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/vehicle",
        Some(&token),
        Some(json!({"name": " ", "coordinates": {"x": 700.0, "y": 1.0}, "numberOfWheels": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let paths: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["name", "coordinates.x", "type", "numberOfWheels", "fuelConsumption", "fuelType"]
    );
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/vehicle",
        Some(&token),
        Some(json!({"name": "x", "type": "SUBMARINE"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(&app, "GET", "/vehicle/not-a-number", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vehicle_grid_endpoint() {
    let app = app();
    let token = login(&app).await;
    for name in ["Alpha", "beta", "Gamma"] {
        create(&app, &token, "/vehicle", vehicle_body(name, None)).await;
    }

    let (status, page) = send(
        &app,
        "POST",
        "/vehicle/query",
        Some(&token),
        Some(json!({
            "startRow": 0,
            "endRow": 2,
            "sortModel": [{"colId": "name", "sort": "asc"}],
            "filterModel": {"name": {"filterType": "text", "type": "contains", "filter": "A"}}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["rows"].as_array().unwrap().len(), 2);
    assert_eq!(page["rows"][0]["name"], "Alpha");
}

#[tokio::test]
async fn test_special_endpoints() {
    let app = app();
    let token = login(&app).await;

    let (status, _) = send(&app, "GET", "/vehicle/special/min-distance", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create(&app, &token, "/vehicle", vehicle_body("Slow", None)).await;

    let (status, body) = send(&app, "GET", "/vehicle/special/min-distance", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Slow");

    let (_, body) = send(&app, "GET", "/vehicle/special/fuel-gt/count?value=2", Some(&token), None).await;
    assert_eq!(body["count"], 1);

    let (_, body) = send(&app, "GET", "/vehicle/special/fuel-gt?value=3", Some(&token), None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = send(&app, "GET", "/vehicle/special/by-type?type=BOAT", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/vehicle/special/by-type?type=SUBMARINE", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/vehicle/special/engine-between?min=100&max=120", Some(&token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/vehicle/special/engine-between?min=5&max=1", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Persons
// =============================================================================

#[tokio::test]
async fn test_guarded_delete_and_reassignment() {
    let app = app();
    let token = login(&app).await;

    let ann = create(&app, &token, "/person", json!({"fullName": "Ann"})).await;
    let bob = create(&app, &token, "/person", json!({"fullName": "Bob"})).await;
    create(&app, &token, "/vehicle", vehicle_body("Ann's boat", Some(ann))).await;

    let (status, body) = send(&app, "DELETE", &format!("/person/{}", ann), Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FK_CONSTRAINT");
    assert_eq!(body["refCount"], 1);

    let (_, usage) = send(&app, "GET", &format!("/person/{}/usage", ann), Some(&token), None).await;
    assert_eq!(usage, json!({"vehicles": 1}));

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/person/{}?reassignTo={}", ann, ann),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/person/{}?reassignTo={}", ann, bob),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, usage) = send(&app, "GET", &format!("/person/{}/usage", bob), Some(&token), None).await;
    assert_eq!(usage["vehicles"], 1);
}

#[tokio::test]
async fn test_person_search_and_grid() {
    let app = app();
    let token = login(&app).await;
    for name in ["Carla", "carl", "Bea"] {
        create(&app, &token, "/person", json!({"fullName": name})).await;
    }

    let (status, found) = send(&app, "GET", "/person/search?q=CARL&limit=500", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 2);

    let (_, listed) = send(&app, "GET", "/person/list?limit=1", Some(&token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["fullName"], "Bea");

    let (status, page) = send(
        &app,
        "POST",
        "/person/query",
        Some(&token),
        Some(json!({"startRow": 0, "endRow": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["rows"][0]["adminLogin"], "root");
    assert_eq!(page["rows"][0]["vehiclesCount"], 0);

    let (status, body) = send(&app, "POST", "/person", Some(&token), Some(json!({"fullName": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["path"], "fullName");
}
