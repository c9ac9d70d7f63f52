//! CLI module for FleetDesk
//!
//! Provides command-line interface for:
//! - init: Create the database schema
//! - serve: Start the HTTP API
//! - create-admin: Register an administrator

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{create_admin, init, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
