//! fleetdesk - vehicle and owner registry with a server-side data grid
//!
//! The `grid` module turns data-grid requests (filter model, sort model,
//! row window) into a backend-neutral predicate tree plus ordering, and
//! `storage` renders that into SQLite queries.

pub mod auth;
pub mod cli;
pub mod grid;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod service;
pub mod storage;
