//! Shared SQLite handle

use std::sync::Mutex;

use rusqlite::Connection;

use super::errors::{StoreError, StoreResult};
use super::schema::{init_schema, open_connection, MEMORY_PATH};

/// One connection behind a mutex. Callers hold the lock for a single
/// statement or transaction.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open `path` and make sure the schema exists
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = open_connection(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(MEMORY_PATH)
    }

    /// Run `f` with the connection locked
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self.conn.lock().map_err(|_| StoreError::lock_poisoned())?;
        f(&conn)
    }

    /// Run `f` inside a transaction, committing when it returns `Ok`
    pub fn with_transaction<T>(
        &self,
        f: impl FnOnce(&rusqlite::Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::lock_poisoned())?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let result: StoreResult<()> = db.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO admins (login, pass_hash, creation_time) VALUES ('root', 'x', '2025-01-01T00:00:00.000')",
                [],
            )?;
            Err(StoreError::query_failed("abort"))
        });
        assert!(result.is_err());

        let count: i64 = db
            .with_conn(|c| Ok(c.query_row("SELECT COUNT(*) FROM admins", [], |r| r.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }
}
