//! Domain entities and their grid catalogs

pub mod admin;
pub mod catalog;
pub mod person;
pub mod vehicle;

use chrono::{Local, NaiveDateTime, Timelike};

pub use admin::{Admin, AdminRef};
pub use person::{Person, PersonRef};
pub use vehicle::{Coordinates, FuelType, NewVehicle, Vehicle, VehicleType};

/// Storage and wire layout of timestamps: ISO, no zone, milliseconds
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Current local time truncated to milliseconds
pub fn now_millis() -> NaiveDateTime {
    let now = Local::now().naive_local();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(millis).unwrap_or(now)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
