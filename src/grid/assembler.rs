//! Result assembly
//!
//! Pairs ordered rows with the total count. Rows are never reordered here;
//! the only reordering in the engine is `reorder_by_keys`, which restores
//! the id-phase order after a membership hydration.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// One page of grid rows plus the total number of matching rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
}

impl<T> QueryPage<T> {
    pub fn new(rows: Vec<T>, total_count: u64) -> Self {
        Self { rows, total_count }
    }

    /// Map each row, keeping order and count
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> QueryPage<U> {
        QueryPage {
            rows: self.rows.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Put hydrated rows back into key order
///
/// Keys with no hydrated row (deleted between the two phases) are skipped.
/// Rows whose key was not requested are dropped.
pub fn reorder_by_keys<K, T>(keys: &[K], rows: Vec<T>, key_of: impl Fn(&T) -> K) -> Vec<T>
where
    K: Eq + Hash,
{
    let mut by_key: HashMap<K, T> = rows.into_iter().map(|row| (key_of(&row), row)).collect();
    keys.iter().filter_map(|key| by_key.remove(key)).collect()
}
