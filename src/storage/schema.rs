//! SQLite connection setup and table definitions

use std::path::Path;

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::{Value, ValueRef};
use rusqlite::Connection;

use super::errors::StoreResult;
use crate::observability::{log_event_with_fields, Event};

/// In-memory database path accepted by `open_connection`
pub const MEMORY_PATH: &str = ":memory:";

/// Open a connection with foreign keys enforced and Unicode case folding
pub fn open_connection(path: &str) -> StoreResult<Connection> {
    let conn = if path == MEMORY_PATH {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    super::errors::StoreError::query_failed(format!(
                        "failed to create parent dir {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Connection::open(path)?
    };
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    register_functions(&conn)?;
    Ok(conn)
}

/// Replace the built-in `lower()`, which folds ASCII letters only
fn register_functions(conn: &Connection) -> StoreResult<()> {
    conn.create_scalar_function(
        "lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        unicode_lower,
    )?;
    Ok(())
}

fn unicode_lower(ctx: &Context<'_>) -> rusqlite::Result<Value> {
    Ok(match ctx.get_raw(0) {
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).to_lowercase()),
        other => other.into(),
    })
}

/// Create tables and indexes if they do not exist yet
pub fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS admins (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            login         TEXT NOT NULL UNIQUE,
            pass_hash     TEXT NOT NULL,
            creation_time TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS persons (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            full_name     TEXT NOT NULL CHECK (length(trim(full_name)) > 0),
            creation_time TEXT NOT NULL,
            admin_id      INTEGER NOT NULL,
            FOREIGN KEY (admin_id) REFERENCES admins(id)
        );

        CREATE TABLE IF NOT EXISTS vehicles (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            name               TEXT NOT NULL CHECK (length(trim(name)) > 0),
            coordinate_x       REAL CHECK (coordinate_x IS NULL OR coordinate_x <= 613),
            coordinate_y       REAL NOT NULL CHECK (coordinate_y <= 962),
            creation_time      TEXT NOT NULL,
            vehicle_type       TEXT NOT NULL,
            engine_power       INTEGER CHECK (engine_power IS NULL OR engine_power > 0),
            number_of_wheels   INTEGER NOT NULL CHECK (number_of_wheels >= 1),
            capacity           INTEGER CHECK (capacity IS NULL OR capacity > 0),
            distance_travelled INTEGER CHECK (distance_travelled IS NULL OR distance_travelled > 0),
            fuel_consumption   REAL NOT NULL CHECK (fuel_consumption > 0),
            fuel_type          TEXT NOT NULL,
            owner_id           INTEGER,
            FOREIGN KEY (owner_id) REFERENCES persons(id)
        );

        CREATE INDEX IF NOT EXISTS idx_persons_full_name ON persons(full_name);
        CREATE INDEX IF NOT EXISTS idx_vehicles_owner ON vehicles(owner_id);
        CREATE INDEX IF NOT EXISTS idx_vehicles_creation_time ON vehicles(creation_time);
        ",
    )?;

    log_event_with_fields(Event::SchemaReady, &[("tables", "admins,persons,vehicles")]);
    Ok(())
}
