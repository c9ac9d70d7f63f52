//! Vehicle persistence and grid hydration

use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::database::Database;
use super::errors::StoreResult;
use super::rows::{enum_column, timestamp_column};
use super::sql;
use crate::grid::{Criteria, GridResult, GridStore, PageQuery};
use crate::model::catalog::VEHICLES_TABLE;
use crate::model::{format_timestamp, Coordinates, NewVehicle, PersonRef, Vehicle};

/// Hydrating select with the owner name. Aliases match the grid's.
const SELECT_VEHICLE: &str = "SELECT t0.id, t0.name, t0.coordinate_x, t0.coordinate_y, t0.creation_time, \
     t0.vehicle_type, t0.engine_power, t0.number_of_wheels, t0.capacity, t0.distance_travelled, \
     t0.fuel_consumption, t0.fuel_type, t0.owner_id, o.full_name \
     FROM vehicles AS t0 LEFT JOIN persons AS o ON o.id = t0.owner_id";

pub(crate) fn map_vehicle(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    let owner_id: Option<i64> = row.get(12)?;
    let owner_name: Option<String> = row.get(13)?;
    let y: f64 = row.get(3)?;
    let fuel_consumption: f64 = row.get(10)?;

    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
        coordinates: Coordinates {
            x: row.get(2)?,
            y: y as f32,
        },
        creation_time: timestamp_column(row, 4)?,
        vehicle_type: enum_column(row, 5)?,
        engine_power: row.get(6)?,
        number_of_wheels: row.get(7)?,
        capacity: row.get(8)?,
        distance_travelled: row.get(9)?,
        fuel_consumption: fuel_consumption as f32,
        fuel_type: enum_column(row, 11)?,
        owner: match (owner_id, owner_name) {
            (Some(id), Some(full_name)) => Some(PersonRef { id, full_name }),
            _ => None,
        },
    })
}

/// Run a vehicle select with a trailing clause and bound values
pub(crate) fn query_vehicles(conn: &Connection, tail: &str, values: &[Value]) -> StoreResult<Vec<Vehicle>> {
    let sql = format!("{} {}", SELECT_VEHICLE, tail);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(values.iter()), map_vehicle)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Vehicles table access
pub struct VehicleStore<'a> {
    db: &'a Database,
}

impl<'a> VehicleStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, vehicle: &NewVehicle, creation_time: &chrono::NaiveDateTime) -> StoreResult<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO vehicles (name, coordinate_x, coordinate_y, creation_time, vehicle_type, \
                 engine_power, number_of_wheels, capacity, distance_travelled, fuel_consumption, \
                 fuel_type, owner_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    vehicle.name,
                    vehicle.coordinates.x,
                    f64::from(vehicle.coordinates.y),
                    format_timestamp(creation_time),
                    vehicle.vehicle_type.as_str(),
                    vehicle.engine_power,
                    vehicle.number_of_wheels,
                    vehicle.capacity,
                    vehicle.distance_travelled,
                    f64::from(vehicle.fuel_consumption),
                    vehicle.fuel_type.as_str(),
                    vehicle.owner_id,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Overwrite writable fields. Returns false when the id is unknown.
    pub fn update(&self, id: i64, vehicle: &NewVehicle) -> StoreResult<bool> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE vehicles SET name = ?1, coordinate_x = ?2, coordinate_y = ?3, vehicle_type = ?4, \
                 engine_power = ?5, number_of_wheels = ?6, capacity = ?7, distance_travelled = ?8, \
                 fuel_consumption = ?9, fuel_type = ?10, owner_id = ?11 WHERE id = ?12",
                params![
                    vehicle.name,
                    vehicle.coordinates.x,
                    f64::from(vehicle.coordinates.y),
                    vehicle.vehicle_type.as_str(),
                    vehicle.engine_power,
                    vehicle.number_of_wheels,
                    vehicle.capacity,
                    vehicle.distance_travelled,
                    f64::from(vehicle.fuel_consumption),
                    vehicle.fuel_type.as_str(),
                    vehicle.owner_id,
                    id,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn find(&self, id: i64) -> StoreResult<Option<Vehicle>> {
        self.db.with_conn(|conn| {
            let sql = format!("{} WHERE t0.id = ?1", SELECT_VEHICLE);
            Ok(conn.query_row(&sql, params![id], map_vehicle).optional()?)
        })
    }

    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        self.db
            .with_conn(|conn| Ok(conn.execute("DELETE FROM vehicles WHERE id = ?1", params![id])? > 0))
    }

    /// Vehicles by id, one window at a time
    pub fn list(&self, offset: u64, limit: u64) -> StoreResult<Vec<Vehicle>> {
        let window = [
            Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)),
            Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)),
        ];
        self.db
            .with_conn(|conn| query_vehicles(conn, "ORDER BY t0.id ASC LIMIT ? OFFSET ?", &window))
    }
}

impl GridStore for VehicleStore<'_> {
    type Row = Vehicle;
    type Key = i64;

    fn row_key(row: &Vehicle) -> i64 {
        row.id
    }

    fn fetch_page(&self, query: &PageQuery) -> GridResult<Vec<Vehicle>> {
        let keys = self.fetch_keys(query)?;
        let rows = self.fetch_by_keys(&keys)?;
        Ok(crate::grid::reorder_by_keys(&keys, rows, Self::row_key))
    }

    fn fetch_keys(&self, query: &PageQuery) -> GridResult<Vec<i64>> {
        let stmt = sql::select_keys(VEHICLES_TABLE, "id", query);
        let keys = self.db.with_conn(|conn| {
            let mut prepared = conn.prepare(&stmt.sql)?;
            let keys = prepared
                .query_map(stmt.params(), |row| row.get::<_, i64>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(keys)
        })?;
        Ok(keys)
    }

    fn fetch_by_keys(&self, keys: &[i64]) -> GridResult<Vec<Vehicle>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<Value> = keys.iter().map(|k| Value::Integer(*k)).collect();
        let tail = format!("WHERE t0.id IN ({})", sql::placeholders(keys.len()));
        Ok(self.db.with_conn(|conn| query_vehicles(conn, &tail, &values))?)
    }

    fn count(&self, criteria: &Criteria) -> GridResult<u64> {
        let stmt = sql::count(VEHICLES_TABLE, criteria);
        let n: i64 = self
            .db
            .with_conn(|conn| Ok(conn.query_row(&stmt.sql, stmt.params(), |row| row.get(0))?))?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}
