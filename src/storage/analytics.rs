//! Fixed analytic queries over vehicles

use rusqlite::types::Value;
use rusqlite::params;

use super::database::Database;
use super::errors::StoreResult;
use super::vehicles::query_vehicles;
use crate::model::{Vehicle, VehicleType};

pub struct VehicleAnalytics<'a> {
    db: &'a Database,
}

impl<'a> VehicleAnalytics<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Some vehicle with the smallest known distance travelled
    pub fn any_with_min_distance(&self) -> StoreResult<Option<Vehicle>> {
        let rows = self.db.with_conn(|conn| {
            query_vehicles(
                conn,
                "WHERE t0.distance_travelled IS NOT NULL \
                 ORDER BY t0.distance_travelled ASC, t0.id ASC LIMIT 1",
                &[],
            )
        })?;
        Ok(rows.into_iter().next())
    }

    pub fn count_fuel_greater_than(&self, value: f32) -> StoreResult<u64> {
        self.db.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM vehicles WHERE fuel_consumption > ?1",
                params![f64::from(value)],
                |row| row.get(0),
            )?;
            Ok(u64::try_from(n).unwrap_or(0))
        })
    }

    pub fn list_fuel_greater_than(&self, value: f32) -> StoreResult<Vec<Vehicle>> {
        self.db.with_conn(|conn| {
            query_vehicles(
                conn,
                "WHERE t0.fuel_consumption > ?1 ORDER BY t0.id ASC",
                &[Value::Real(f64::from(value))],
            )
        })
    }

    pub fn list_by_type(&self, vehicle_type: VehicleType) -> StoreResult<Vec<Vehicle>> {
        self.db.with_conn(|conn| {
            query_vehicles(
                conn,
                "WHERE t0.vehicle_type = ?1 ORDER BY t0.id ASC",
                &[Value::Text(vehicle_type.as_str().to_string())],
            )
        })
    }

    /// Engine power within `[min, max]`, both ends included
    pub fn list_engine_power_between(&self, min: i32, max: i32) -> StoreResult<Vec<Vehicle>> {
        self.db.with_conn(|conn| {
            query_vehicles(
                conn,
                "WHERE t0.engine_power BETWEEN ?1 AND ?2 ORDER BY t0.id ASC",
                &[Value::Integer(i64::from(min)), Value::Integer(i64::from(max))],
            )
        })
    }
}
