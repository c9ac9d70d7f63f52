//! SQLite persistence for admins, persons and vehicles
//!
//! `Database` owns the single connection. Each table gets a small borrowed
//! store; the person and vehicle stores also implement `GridStore`, which is
//! where grid predicates are rendered into SQL (`sql`).
//!
//! Timestamps are ISO text with millisecond precision, so comparing the
//! stored strings orders them chronologically.

pub mod admins;
pub mod analytics;
pub mod database;
mod errors;
pub mod persons;
mod rows;
pub mod schema;
pub mod sql;
pub mod vehicles;

pub use admins::AdminStore;
pub use analytics::VehicleAnalytics;
pub use database::Database;
pub use errors::{StoreError, StoreErrorCode, StoreResult};
pub use persons::PersonStore;
pub use vehicles::VehicleStore;
