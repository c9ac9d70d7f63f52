//! Vehicle entity

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::person::PersonRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleType {
    Plane,
    Boat,
    Bicycle,
    Hoverboard,
    Spaceship,
}

impl VehicleType {
    /// Stored names, in declaration order
    pub const NAMES: &'static [&'static str] = &["PLANE", "BOAT", "BICYCLE", "HOVERBOARD", "SPACESHIP"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Plane => "PLANE",
            VehicleType::Boat => "BOAT",
            VehicleType::Bicycle => "BICYCLE",
            VehicleType::Hoverboard => "HOVERBOARD",
            VehicleType::Spaceship => "SPACESHIP",
        }
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLANE" => Ok(VehicleType::Plane),
            "BOAT" => Ok(VehicleType::Boat),
            "BICYCLE" => Ok(VehicleType::Bicycle),
            "HOVERBOARD" => Ok(VehicleType::Hoverboard),
            "SPACESHIP" => Ok(VehicleType::Spaceship),
            other => Err(format!("unknown vehicle type: {}", other)),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Kerosene,
    Electricity,
    Diesel,
    Manpower,
    Nuclear,
}

impl FuelType {
    pub const NAMES: &'static [&'static str] = &["KEROSENE", "ELECTRICITY", "DIESEL", "MANPOWER", "NUCLEAR"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Kerosene => "KEROSENE",
            FuelType::Electricity => "ELECTRICITY",
            FuelType::Diesel => "DIESEL",
            FuelType::Manpower => "MANPOWER",
            FuelType::Nuclear => "NUCLEAR",
        }
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "KEROSENE" => Ok(FuelType::Kerosene),
            "ELECTRICITY" => Ok(FuelType::Electricity),
            "DIESEL" => Ok(FuelType::Diesel),
            "MANPOWER" => Ok(FuelType::Manpower),
            "NUCLEAR" => Ok(FuelType::Nuclear),
            other => Err(format!("unknown fuel type: {}", other)),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a vehicle. `x` ≤ 613 when present, `y` ≤ 962.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: Option<f64>,
    pub y: f32,
}

/// Persisted vehicle with its owner hydrated
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub coordinates: Coordinates,
    pub creation_time: NaiveDateTime,
    pub vehicle_type: VehicleType,
    pub engine_power: Option<i32>,
    pub number_of_wheels: i32,
    pub capacity: Option<i32>,
    pub distance_travelled: Option<i32>,
    pub fuel_consumption: f32,
    pub fuel_type: FuelType,
    pub owner: Option<PersonRef>,
}

/// Writable vehicle fields
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub name: String,
    pub coordinates: Coordinates,
    pub vehicle_type: VehicleType,
    pub engine_power: Option<i32>,
    pub number_of_wheels: i32,
    pub capacity: Option<i32>,
    pub distance_travelled: Option<i32>,
    pub fuel_consumption: f32,
    pub fuel_type: FuelType,
    pub owner_id: Option<i64>,
}
