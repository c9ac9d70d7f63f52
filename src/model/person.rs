//! Person (owner) entity

use chrono::NaiveDateTime;

use super::admin::AdminRef;

/// Persisted person with the creating admin hydrated
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub full_name: String,
    pub creation_time: NaiveDateTime,
    pub admin: AdminRef,
}

/// Short reference used when a person is embedded in another row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRef {
    pub id: i64,
    pub full_name: String,
}
