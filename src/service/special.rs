//! Vehicle analytics: minimal distance, fuel and engine power filters

use std::str::FromStr;
use std::sync::Arc;

use super::dto::VehicleDto;
use super::errors::{ServiceError, ServiceResult};
use crate::model::VehicleType;
use crate::storage::{Database, VehicleAnalytics};

pub struct SpecialService {
    db: Arc<Database>,
}

impl SpecialService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn analytics(&self) -> VehicleAnalytics<'_> {
        VehicleAnalytics::new(&self.db)
    }

    /// Any vehicle with the smallest distance travelled; 404 when no vehicle
    /// has a distance
    pub fn min_distance(&self) -> ServiceResult<VehicleDto> {
        self.analytics()
            .any_with_min_distance()?
            .map(VehicleDto::from)
            .ok_or_else(|| ServiceError::NotFound("No vehicle with a known distance".to_string()))
    }

    pub fn count_fuel_greater_than(&self, value: f32) -> ServiceResult<u64> {
        Ok(self.analytics().count_fuel_greater_than(value)?)
    }

    pub fn list_fuel_greater_than(&self, value: f32) -> ServiceResult<Vec<VehicleDto>> {
        let rows = self.analytics().list_fuel_greater_than(value)?;
        Ok(rows.into_iter().map(VehicleDto::from).collect())
    }

    pub fn list_by_type(&self, raw_type: &str) -> ServiceResult<Vec<VehicleDto>> {
        let vehicle_type = VehicleType::from_str(raw_type.trim()).map_err(ServiceError::BadRequest)?;
        let rows = self.analytics().list_by_type(vehicle_type)?;
        Ok(rows.into_iter().map(VehicleDto::from).collect())
    }

    pub fn list_engine_power_between(&self, min: i32, max: i32) -> ServiceResult<Vec<VehicleDto>> {
        if min > max {
            return Err(ServiceError::BadRequest(format!(
                "min ({}) must not exceed max ({})",
                min, max
            )));
        }
        let rows = self.analytics().list_engine_power_between(min, max)?;
        Ok(rows.into_iter().map(VehicleDto::from).collect())
    }
}
