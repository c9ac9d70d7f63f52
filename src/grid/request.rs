//! Grid request envelope
//!
//! The shape produced by interactive data-table components for server-side
//! row models. Filter entries are kept as raw JSON here; the parser decides
//! what each one means.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page request from a data grid
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridQuery {
    /// First row index, inclusive
    pub start_row: i64,
    /// Last row index, exclusive
    pub end_row: i64,
    #[serde(default)]
    pub sort_model: Option<Vec<SortModelEntry>>,
    /// Column id → raw filter. Ordered so that rendered queries are stable.
    #[serde(default)]
    pub filter_model: Option<BTreeMap<String, Value>>,
}

impl GridQuery {
    pub fn new(start_row: i64, end_row: i64) -> Self {
        Self {
            start_row,
            end_row,
            sort_model: None,
            filter_model: None,
        }
    }

    /// Add a sort entry
    pub fn sort(mut self, col_id: &str, sort: &str) -> Self {
        self.sort_model.get_or_insert_with(Vec::new).push(SortModelEntry {
            col_id: Some(col_id.to_string()),
            sort: Some(sort.to_string()),
        });
        self
    }

    /// Add a raw filter entry
    pub fn filter(mut self, col_id: &str, filter: Value) -> Self {
        self.filter_model
            .get_or_insert_with(BTreeMap::new)
            .insert(col_id.to_string(), filter);
        self
    }

    /// Number of rows requested, never less than one
    pub fn page_size(&self) -> u64 {
        self.end_row.saturating_sub(self.start_row).max(1) as u64
    }

    /// Rows to skip, never negative
    pub fn offset(&self) -> u64 {
        self.start_row.max(0) as u64
    }

    pub fn sort_entries(&self) -> &[SortModelEntry] {
        self.sort_model.as_deref().unwrap_or(&[])
    }
}

/// One `sortModel` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortModelEntry {
    #[serde(default)]
    pub col_id: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_request() {
        let query: GridQuery = serde_json::from_value(json!({
            "startRow": 20,
            "endRow": 40,
            "sortModel": [{"colId": "name", "sort": "desc"}],
            "filterModel": {"name": {"filterType": "text", "type": "contains", "filter": "a"}}
        }))
        .unwrap();

        assert_eq!(query.offset(), 20);
        assert_eq!(query.page_size(), 20);
        assert_eq!(query.sort_entries()[0].col_id.as_deref(), Some("name"));
        assert!(query.filter_model.unwrap().contains_key("name"));
    }

    #[test]
    fn test_missing_models_are_optional() {
        let query: GridQuery = serde_json::from_value(json!({"startRow": 0, "endRow": 10})).unwrap();
        assert!(query.sort_entries().is_empty());
        assert!(query.filter_model.is_none());
    }

    #[test]
    fn test_missing_bounds_are_rejected() {
        let result: Result<GridQuery, _> = serde_json::from_value(json!({"startRow": 0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_page_size_is_at_least_one() {
        assert_eq!(GridQuery::new(10, 10).page_size(), 1);
        assert_eq!(GridQuery::new(10, 5).page_size(), 1);
        assert_eq!(GridQuery::new(0, 25).page_size(), 25);
    }

    #[test]
    fn test_negative_start_is_clamped() {
        let query = GridQuery::new(-5, 10);
        assert_eq!(query.offset(), 0);
        assert_eq!(query.page_size(), 15);
    }
}
