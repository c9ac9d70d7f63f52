//! Person persistence, vehicle counts and owner reassignment

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Row};

use super::database::Database;
use super::errors::StoreResult;
use super::rows::timestamp_column;
use super::sql;
use crate::grid::{Criteria, GridResult, GridStore, JoinSpec, PageQuery};
use crate::model::catalog::{ADMINS_TABLE, PERSONS_TABLE};
use crate::model::{format_timestamp, AdminRef, Person};

const PERSON_COLUMNS: &str = "\"t0\".\"id\", \"t0\".\"full_name\", \"t0\".\"creation_time\", \
     \"j_admin\".\"id\", \"j_admin\".\"login\"";

const SELECT_PERSON: &str = "SELECT t0.id, t0.full_name, t0.creation_time, j_admin.id, j_admin.login \
     FROM persons AS t0 JOIN admins AS j_admin ON j_admin.id = t0.admin_id";

/// The admin join every person select needs, named the way the grid names it
fn admin_join() -> JoinSpec {
    JoinSpec {
        relation: "admin".to_string(),
        alias: "j_admin".to_string(),
        table: ADMINS_TABLE.to_string(),
        foreign_key: "admin_id".to_string(),
        target_key: "id".to_string(),
    }
}

fn map_person(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        id: row.get(0)?,
        full_name: row.get(1)?,
        creation_time: timestamp_column(row, 2)?,
        admin: AdminRef {
            id: row.get(3)?,
            login: row.get(4)?,
        },
    })
}

/// Persons table access
pub struct PersonStore<'a> {
    db: &'a Database,
}

impl<'a> PersonStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, full_name: &str, admin_id: i64, creation_time: &NaiveDateTime) -> StoreResult<i64> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO persons (full_name, creation_time, admin_id) VALUES (?1, ?2, ?3)",
                params![full_name, format_timestamp(creation_time), admin_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Rename a person. Returns false when the id is unknown.
    pub fn update_name(&self, id: i64, full_name: &str) -> StoreResult<bool> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE persons SET full_name = ?1 WHERE id = ?2",
                params![full_name, id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn find(&self, id: i64) -> StoreResult<Option<Person>> {
        self.db.with_conn(|conn| {
            let sql = format!("{} WHERE t0.id = ?1", SELECT_PERSON);
            Ok(conn.query_row(&sql, params![id], map_person).optional()?)
        })
    }

    pub fn exists(&self, id: i64) -> StoreResult<bool> {
        self.db.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM persons WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(n > 0)
        })
    }

    pub fn delete(&self, id: i64) -> StoreResult<bool> {
        self.db
            .with_conn(|conn| Ok(conn.execute("DELETE FROM persons WHERE id = ?1", params![id])? > 0))
    }

    /// Case-insensitive substring match on the full name
    pub fn search(&self, needle: &str, limit: u32) -> StoreResult<Vec<Person>> {
        let pattern = format!("%{}%", sql::escape_like(&needle.trim().to_lowercase()));
        self.db.with_conn(|conn| {
            let sql = format!(
                "{} WHERE lower(t0.full_name) LIKE ?1 ESCAPE '\\' ORDER BY t0.full_name ASC, t0.id ASC LIMIT ?2",
                SELECT_PERSON
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![pattern, limit], map_person)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// First `limit` persons by name
    pub fn top(&self, limit: u32) -> StoreResult<Vec<Person>> {
        self.db.with_conn(|conn| {
            let sql = format!("{} ORDER BY t0.full_name ASC, t0.id ASC LIMIT ?1", SELECT_PERSON);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![limit], map_person)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Vehicles owned by each of `ids`, zero for persons without vehicles.
    /// One grouped query regardless of how many ids are asked for.
    pub fn vehicle_counts(&self, ids: &[i64]) -> StoreResult<HashMap<i64, u64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let values: Vec<Value> = ids.iter().map(|id| Value::Integer(*id)).collect();
        let sql = format!(
            "SELECT p.id, COUNT(v.id) FROM persons AS p LEFT JOIN vehicles AS v ON v.owner_id = p.id \
             WHERE p.id IN ({}) GROUP BY p.id",
            sql::placeholders(ids.len())
        );

        let mut counts: HashMap<i64, u64> = self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values.iter()), |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows
                .into_iter()
                .map(|(id, n)| (id, u64::try_from(n).unwrap_or(0)))
                .collect())
        })?;

        for id in ids {
            counts.entry(*id).or_insert(0);
        }
        Ok(counts)
    }

    pub fn vehicle_count(&self, id: i64) -> StoreResult<u64> {
        self.db.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM vehicles WHERE owner_id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(u64::try_from(n).unwrap_or(0))
        })
    }

    /// Move every vehicle of `id` to `target`, then delete `id`, atomically.
    /// Returns the number of vehicles moved.
    pub fn reassign_and_delete(&self, id: i64, target: i64) -> StoreResult<u64> {
        self.db.with_transaction(|tx| {
            let moved = tx.execute(
                "UPDATE vehicles SET owner_id = ?1 WHERE owner_id = ?2",
                params![target, id],
            )?;
            tx.execute("DELETE FROM persons WHERE id = ?1", params![id])?;
            Ok(moved as u64)
        })
    }
}

impl GridStore for PersonStore<'_> {
    type Row = Person;
    type Key = i64;

    fn row_key(row: &Person) -> i64 {
        row.id
    }

    fn fetch_page(&self, query: &PageQuery) -> GridResult<Vec<Person>> {
        let joins = sql::with_join(&query.criteria.joins, admin_join());
        let stmt = sql::select_page(PERSON_COLUMNS, PERSONS_TABLE, &joins, query);
        let rows = self.db.with_conn(|conn| {
            let mut prepared = conn.prepare(&stmt.sql)?;
            let rows = prepared
                .query_map(stmt.params(), map_person)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        Ok(rows)
    }

    fn fetch_keys(&self, query: &PageQuery) -> GridResult<Vec<i64>> {
        let stmt = sql::select_keys(PERSONS_TABLE, "id", query);
        let keys = self.db.with_conn(|conn| {
            let mut prepared = conn.prepare(&stmt.sql)?;
            let keys = prepared
                .query_map(stmt.params(), |row| row.get::<_, i64>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(keys)
        })?;
        Ok(keys)
    }

    fn fetch_by_keys(&self, keys: &[i64]) -> GridResult<Vec<Person>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<Value> = keys.iter().map(|k| Value::Integer(*k)).collect();
        let sql = format!("{} WHERE t0.id IN ({})", SELECT_PERSON, sql::placeholders(keys.len()));
        let rows = self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values.iter()), map_person)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;
        Ok(rows)
    }

    fn count(&self, criteria: &Criteria) -> GridResult<u64> {
        let stmt = sql::count(PERSONS_TABLE, criteria);
        let n: i64 = self
            .db
            .with_conn(|conn| Ok(conn.query_row(&stmt.sql, stmt.params(), |row| row.get(0))?))?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::now_millis;
    use crate::storage::admins::AdminStore;

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let admin = AdminStore::new(&db).insert("root", "hash", &now_millis()).unwrap();
        (db, admin)
    }

    fn add_vehicle(db: &Database, owner: i64) {
        db.with_conn(|c| {
            c.execute(
                "INSERT INTO vehicles (name, coordinate_y, creation_time, vehicle_type, number_of_wheels, \
                 fuel_consumption, fuel_type, owner_id) VALUES ('v', 1.0, '2025-01-01T00:00:00.000', 'BOAT', 1, 1.0, 'DIESEL', ?1)",
                params![owner],
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let (db, admin) = setup();
        let store = PersonStore::new(&db);
        let now = now_millis();
        store.insert("Zoe Adams", admin, &now).unwrap();
        store.insert("adam smith", admin, &now).unwrap();
        store.insert("Bob", admin, &now).unwrap();

        let found = store.search("  ADAM ", 10).unwrap();
        let names: Vec<&str> = found.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Zoe Adams", "adam smith"]);
        assert_eq!(found[0].admin.login, "root");
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let (db, admin) = setup();
        let store = PersonStore::new(&db);
        store.insert("100% Real", admin, &now_millis()).unwrap();
        store.insert("Plain", admin, &now_millis()).unwrap();

        assert_eq!(store.search("%", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_vehicle_counts_fill_zeros() {
        let (db, admin) = setup();
        let store = PersonStore::new(&db);
        let a = store.insert("A", admin, &now_millis()).unwrap();
        let b = store.insert("B", admin, &now_millis()).unwrap();
        add_vehicle(&db, a);
        add_vehicle(&db, a);

        let counts = store.vehicle_counts(&[a, b, 999]).unwrap();
        assert_eq!(counts[&a], 2);
        assert_eq!(counts[&b], 0);
        assert_eq!(counts[&999], 0);
        assert_eq!(store.vehicle_count(a).unwrap(), 2);
    }

    #[test]
    fn test_reassign_and_delete() {
        let (db, admin) = setup();
        let store = PersonStore::new(&db);
        let from = store.insert("From", admin, &now_millis()).unwrap();
        let to = store.insert("To", admin, &now_millis()).unwrap();
        add_vehicle(&db, from);
        add_vehicle(&db, from);

        assert_eq!(store.reassign_and_delete(from, to).unwrap(), 2);
        assert!(!store.exists(from).unwrap());
        assert_eq!(store.vehicle_count(to).unwrap(), 2);
    }

    #[test]
    fn test_delete_with_vehicles_violates_constraint() {
        let (db, admin) = setup();
        let store = PersonStore::new(&db);
        let owner = store.insert("Owner", admin, &now_millis()).unwrap();
        add_vehicle(&db, owner);

        let err = store.delete(owner).unwrap_err();
        assert!(err.is_constraint());
    }
}
