//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};
use crate::auth;
use crate::http_server::{AppState, HttpServer};
use crate::observability::ObservationScope;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command. A failed
/// command also prints a JSON error object on stdout.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command).map_err(|e| {
        // the error is still returned; a broken stdout must not mask it
        let _ = write_error(e.code_str(), e.message());
        e
    })
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
        Command::CreateAdmin {
            config,
            login,
            password,
        } => create_admin(&config, &login, &password),
    }
}

/// Create the database file and schema. Safe to run more than once.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;

    let scope = ObservationScope::with_fields("INIT", &[("database", config.database_path.as_str())]);
    if let Err(e) = config.open_database() {
        scope.fail(e.message());
        return Err(e);
    }
    scope.complete();

    write_response(json!({
        "initialized": true,
        "database": config.database_path,
    }))
}

/// Open the database and serve the HTTP API until Ctrl-C
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load(config_path)?;
    let db = Arc::new(config.open_database()?);

    let state = AppState::new(db, config.session_config(), config.search_limit_max).shared();
    let server = HttpServer::new(config.http.clone(), state);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

pub fn create_admin(config_path: &Path, login: &str, password: &str) -> CliResult<()> {
    let config = load(config_path)?;
    let db = config.open_database()?;
    let id = auth::create_admin(&db, login, password)?;

    write_response(json!({ "id": id, "login": login.trim() }))
}

fn load(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    config.apply_log_level()?;
    Ok(config)
}
