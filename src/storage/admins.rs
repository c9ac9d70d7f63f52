//! Administrator accounts

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Row};

use super::database::Database;
use super::errors::StoreResult;
use super::rows::timestamp_column;
use crate::model::{format_timestamp, Admin};

fn map_admin(row: &Row<'_>) -> rusqlite::Result<Admin> {
    Ok(Admin {
        id: row.get(0)?,
        login: row.get(1)?,
        pass_hash: row.get(2)?,
        creation_time: timestamp_column(row, 3)?,
    })
}

pub struct AdminStore<'a> {
    db: &'a Database,
}

impl<'a> AdminStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert an admin. A duplicate login fails with a constraint error.
    pub fn insert(&self, login: &str, pass_hash: &str, creation_time: &NaiveDateTime) -> StoreResult<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO admins (login, pass_hash, creation_time) VALUES (?1, ?2, ?3)",
                params![login, pass_hash, format_timestamp(creation_time)],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_by_login(&self, login: &str) -> StoreResult<Option<Admin>> {
        self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, login, pass_hash, creation_time FROM admins WHERE login = ?1",
                    params![login],
                    map_admin,
                )
                .optional()?)
        })
    }

    pub fn find(&self, id: i64) -> StoreResult<Option<Admin>> {
        self.db.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, login, pass_hash, creation_time FROM admins WHERE id = ?1",
                    params![id],
                    map_admin,
                )
                .optional()?)
        })
    }
}
