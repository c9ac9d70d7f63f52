//! Administrator accounts

use chrono::NaiveDateTime;
use serde::Serialize;

/// Administrator as stored. `pass_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admin {
    pub id: i64,
    pub login: String,
    pub pass_hash: String,
    pub creation_time: NaiveDateTime,
}

/// Short reference used when an admin is embedded in another row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRef {
    pub id: i64,
    pub login: String,
}

impl From<&Admin> for AdminRef {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            login: admin.login.clone(),
        }
    }
}
