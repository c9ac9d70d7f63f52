//! # HTTP Server
//!
//! JSON API over the vehicle and owner services.
//!
//! # Endpoints
//!
//! - `/health` - Liveness
//! - `/auth/*` - Admin login and sessions
//! - `/vehicle/*` - Vehicles, vehicle grid, analytics
//! - `/person/*` - Owners, owner grid, search

pub mod auth_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod person_routes;
pub mod server;
pub mod state;
pub mod vehicle_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use server::HttpServer;
pub use state::{AppState, AuthenticatedAdmin, SharedState};
