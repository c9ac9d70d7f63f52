//! Grid catalogs for persons and vehicles
//!
//! Built once at startup and shared read-only by every request.

use std::sync::Arc;

use crate::grid::{
    AttributeKind, ColumnCatalog, ColumnMapping, DefaultOrder, EntitySchema, FetchStrategy,
    GridDescriptor,
};

use super::vehicle::{FuelType, VehicleType};

pub const ADMINS_TABLE: &str = "admins";
pub const PERSONS_TABLE: &str = "persons";
pub const VEHICLES_TABLE: &str = "vehicles";

/// Admin attributes visible to grids. The password hash is not one of them.
pub fn admin_schema() -> EntitySchema {
    EntitySchema::new("admin", ADMINS_TABLE)
        .attribute("id", "id", AttributeKind::Long)
        .attribute("login", "login", AttributeKind::Text)
        .attribute("creationTime", "creation_time", AttributeKind::Timestamp)
}

pub fn person_schema() -> EntitySchema {
    EntitySchema::new("person", PERSONS_TABLE)
        .attribute("id", "id", AttributeKind::Long)
        .attribute("fullName", "full_name", AttributeKind::Text)
        .attribute("creationTime", "creation_time", AttributeKind::Timestamp)
        .relation("admin", "admin_id", Arc::new(admin_schema()))
}

pub fn vehicle_schema() -> EntitySchema {
    EntitySchema::new("vehicle", VEHICLES_TABLE)
        .attribute("id", "id", AttributeKind::Long)
        .attribute("name", "name", AttributeKind::Text)
        .attribute("coordinateX", "coordinate_x", AttributeKind::Double)
        .attribute("coordinateY", "coordinate_y", AttributeKind::Float)
        .attribute("creationTime", "creation_time", AttributeKind::Timestamp)
        .attribute("type", "vehicle_type", AttributeKind::Enum(VehicleType::NAMES))
        .attribute("enginePower", "engine_power", AttributeKind::Int)
        .attribute("numberOfWheels", "number_of_wheels", AttributeKind::Int)
        .attribute("capacity", "capacity", AttributeKind::Int)
        .attribute("distanceTravelled", "distance_travelled", AttributeKind::Int)
        .attribute("fuelConsumption", "fuel_consumption", AttributeKind::Float)
        .attribute("fuelType", "fuel_type", AttributeKind::Enum(FuelType::NAMES))
        .relation("owner", "owner_id", Arc::new(person_schema()))
}

/// Person grid: direct fetch with the admin joined eagerly
pub fn person_grid() -> GridDescriptor {
    let mapping = ColumnMapping::new()
        .map("creationDate", "creationTime")
        .map("adminLogin", "admin.login")
        .map("adminId", "admin.id");

    GridDescriptor::new(
        ColumnCatalog::new(Arc::new(person_schema()), mapping),
        DefaultOrder::new().asc("fullName").asc("id"),
        FetchStrategy::Direct,
    )
}

/// Vehicle grid: ordered ids first, then hydration with the owner
pub fn vehicle_grid() -> GridDescriptor {
    let mapping = ColumnMapping::new()
        .map("creationDate", "creationTime")
        .map("coordinates.x", "coordinateX")
        .map("coordinates.y", "coordinateY")
        .map("ownerName", "owner.fullName")
        .map("ownerId", "owner.id");

    GridDescriptor::new(
        ColumnCatalog::new(Arc::new(vehicle_schema()), mapping),
        DefaultOrder::new().desc("creationTime").asc("id"),
        FetchStrategy::TwoPhase,
    )
}
