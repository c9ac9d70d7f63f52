//! Wire shapes for persons and vehicles
//!
//! The same DTO is read from request bodies and written to responses.
//! Incoming bodies are checked by `validate`, which reports every bad field
//! at once.

use serde::{Deserialize, Serialize};

use super::errors::{FieldViolation, ServiceError, ServiceResult};
use crate::model::{format_timestamp, Coordinates, FuelType, NewVehicle, Person, Vehicle, VehicleType};

pub const MAX_COORDINATE_X: f64 = 613.0;
pub const MAX_COORDINATE_Y: f32 = 962.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinatesDto {
    pub x: Option<f64>,
    pub y: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub coordinates: Option<CoordinatesDto>,
    #[serde(default, rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub engine_power: Option<i32>,
    #[serde(default)]
    pub number_of_wheels: Option<i32>,
    #[serde(default)]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub distance_travelled: Option<i32>,
    #[serde(default)]
    pub fuel_consumption: Option<f32>,
    #[serde(default)]
    pub fuel_type: Option<FuelType>,
    /// Output only; ignored on input
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    /// Output only; ignored on input
    #[serde(default)]
    pub owner_name: Option<String>,
}

fn positive(violations: &mut Vec<FieldViolation>, path: &str, value: Option<i32>) {
    if matches!(value, Some(v) if v <= 0) {
        violations.push(FieldViolation::new(path, &format!("{} must be > 0", path)));
    }
}

impl VehicleDto {
    /// Check every constraint and produce the writable fields
    pub fn validate(&self) -> ServiceResult<NewVehicle> {
        let mut violations = Vec::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            violations.push(FieldViolation::new("name", "name must not be blank"));
        }

        let coordinates = match &self.coordinates {
            None => {
                violations.push(FieldViolation::new("coordinates", "coordinates are required"));
                None
            }
            Some(c) => {
                if matches!(c.x, Some(x) if !(x <= MAX_COORDINATE_X)) {
                    violations.push(FieldViolation::new("coordinates.x", "coordinates.x must be <= 613"));
                }
                match c.y {
                    None => violations.push(FieldViolation::new("coordinates.y", "coordinates.y is required")),
                    Some(y) if !(y <= MAX_COORDINATE_Y) => {
                        violations.push(FieldViolation::new("coordinates.y", "coordinates.y must be <= 962"))
                    }
                    Some(_) => {}
                }
                c.y.map(|y| Coordinates { x: c.x, y })
            }
        };

        if self.vehicle_type.is_none() {
            violations.push(FieldViolation::new("type", "type is required"));
        }
        positive(&mut violations, "enginePower", self.engine_power);
        match self.number_of_wheels {
            None => violations.push(FieldViolation::new("numberOfWheels", "numberOfWheels is required")),
            Some(_) => positive(&mut violations, "numberOfWheels", self.number_of_wheels),
        }
        positive(&mut violations, "capacity", self.capacity);
        positive(&mut violations, "distanceTravelled", self.distance_travelled);
        match self.fuel_consumption {
            None => violations.push(FieldViolation::new("fuelConsumption", "fuelConsumption is required")),
            Some(f) if !(f > 0.0) => {
                violations.push(FieldViolation::new("fuelConsumption", "fuelConsumption must be > 0"))
            }
            Some(_) => {}
        }
        if self.fuel_type.is_none() {
            violations.push(FieldViolation::new("fuelType", "fuelType is required"));
        }

        match (
            violations.is_empty(),
            coordinates,
            self.vehicle_type,
            self.number_of_wheels,
            self.fuel_consumption,
            self.fuel_type,
        ) {
            (true, Some(coordinates), Some(vehicle_type), Some(number_of_wheels), Some(fuel_consumption), Some(fuel_type)) => {
                Ok(NewVehicle {
                    name: name.to_string(),
                    coordinates,
                    vehicle_type,
                    engine_power: self.engine_power,
                    number_of_wheels,
                    capacity: self.capacity,
                    distance_travelled: self.distance_travelled,
                    fuel_consumption,
                    fuel_type,
                    owner_id: self.owner_id,
                })
            }
            _ => Err(ServiceError::Validation(violations)),
        }
    }
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        let (owner_id, owner_name) = match v.owner {
            Some(owner) => (Some(owner.id), Some(owner.full_name)),
            None => (None, None),
        };
        Self {
            id: Some(v.id),
            name: Some(v.name),
            coordinates: Some(CoordinatesDto {
                x: v.coordinates.x,
                y: Some(v.coordinates.y),
            }),
            vehicle_type: Some(v.vehicle_type),
            engine_power: v.engine_power,
            number_of_wheels: Some(v.number_of_wheels),
            capacity: v.capacity,
            distance_travelled: v.distance_travelled,
            fuel_consumption: Some(v.fuel_consumption),
            fuel_type: Some(v.fuel_type),
            creation_date: Some(format_timestamp(&v.creation_time)),
            owner_id,
            owner_name,
        }
    }
}

/// Person as sent to clients. The short form carries only id and name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicles_count: Option<u64>,
}

impl PersonDto {
    pub fn full(person: Person, vehicles_count: u64) -> Self {
        Self {
            id: Some(person.id),
            full_name: Some(person.full_name),
            creation_date: Some(format_timestamp(&person.creation_time)),
            admin_id: Some(person.admin.id),
            admin_login: Some(person.admin.login),
            vehicles_count: Some(vehicles_count),
        }
    }

    pub fn short(person: Person) -> Self {
        Self {
            id: Some(person.id),
            full_name: Some(person.full_name),
            ..Self::default()
        }
    }

    /// The trimmed full name, the only writable field
    pub fn validate(&self) -> ServiceResult<String> {
        let name = self.full_name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(ServiceError::Validation(vec![FieldViolation::new(
                "fullName",
                "fullName must not be blank",
            )]));
        }
        Ok(name.to_string())
    }
}
