//! Sort compiler
//!
//! Produces a total ordering: the client's sort model (or the entity default
//! when the model is empty), always terminated by the primary identifier so
//! that paging through equal sort keys is deterministic.

use super::columns::{ColumnRef, ColumnResolver};
use super::request::SortModelEntry;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// `"desc"` in any case is descending, anything else ascending
    pub fn from_client(s: Option<&str>) -> Self {
        match s {
            Some(s) if s.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One ordering term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    pub column: ColumnRef,
    pub direction: SortDirection,
}

/// Entity default ordering, as (column id, direction) pairs
#[derive(Debug, Clone, Default)]
pub struct DefaultOrder(Vec<(&'static str, SortDirection)>);

impl DefaultOrder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(mut self, column_id: &'static str) -> Self {
        self.0.push((column_id, SortDirection::Asc));
        self
    }

    pub fn desc(mut self, column_id: &'static str) -> Self {
        self.0.push((column_id, SortDirection::Desc));
        self
    }

    pub fn terms(&self) -> &[(&'static str, SortDirection)] {
        &self.0
    }
}

/// Compile a sort model into a total ordering
pub fn compile_order(
    sort_model: &[SortModelEntry],
    default: &DefaultOrder,
    resolver: &mut ColumnResolver<'_>,
) -> Vec<OrderClause> {
    let mut order: Vec<OrderClause> = if sort_model.is_empty() {
        default
            .terms()
            .iter()
            .map(|(column_id, direction)| OrderClause {
                column: resolver.resolve(Some(column_id)).column,
                direction: *direction,
            })
            .collect()
    } else {
        sort_model
            .iter()
            .map(|entry| OrderClause {
                column: resolver.resolve(entry.col_id.as_deref()).column,
                direction: SortDirection::from_client(entry.sort.as_deref()),
            })
            .collect()
    };

    let primary_key = resolver.primary_key();
    if !order.iter().any(|clause| clause.column == primary_key) {
        order.push(OrderClause {
            column: primary_key,
            direction: SortDirection::Asc,
        });
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::columns::{ColumnCatalog, ColumnMapping};
    use crate::grid::schema::{AttributeKind, EntitySchema};
    use std::sync::Arc;

    fn catalog() -> ColumnCatalog {
        let person = Arc::new(
            EntitySchema::new("person", "persons")
                .attribute("id", "id", AttributeKind::Long)
                .attribute("fullName", "full_name", AttributeKind::Text),
        );
        let schema = EntitySchema::new("vehicle", "vehicles")
            .attribute("id", "id", AttributeKind::Long)
            .attribute("name", "name", AttributeKind::Text)
            .attribute("creationTime", "creation_time", AttributeKind::Timestamp)
            .relation("owner", "owner_id", person);
        ColumnCatalog::new(
            Arc::new(schema),
            ColumnMapping::new()
                .map("creationDate", "creationTime")
                .map("ownerName", "owner.fullName"),
        )
    }

    fn entry(col: &str, sort: &str) -> SortModelEntry {
        SortModelEntry {
            col_id: Some(col.to_string()),
            sort: Some(sort.to_string()),
        }
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(SortDirection::from_client(Some("desc")), SortDirection::Desc);
        assert_eq!(SortDirection::from_client(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::from_client(Some("asc")), SortDirection::Asc);
        assert_eq!(SortDirection::from_client(Some("sideways")), SortDirection::Asc);
        assert_eq!(SortDirection::from_client(None), SortDirection::Asc);
    }

    #[test]
    fn test_empty_model_uses_default_with_tiebreak() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();
        let default = DefaultOrder::new().desc("creationTime");

        let order = compile_order(&[], &default, &mut resolver);
        assert_eq!(
            order,
            vec![
                OrderClause {
                    column: ColumnRef::root("creation_time"),
                    direction: SortDirection::Desc
                },
                OrderClause {
                    column: ColumnRef::root("id"),
                    direction: SortDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn test_client_model_replaces_default() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();
        let default = DefaultOrder::new().desc("creationTime");

        let order = compile_order(&[entry("ownerName", "asc")], &default, &mut resolver);
        assert_eq!(order.len(), 2);
        assert_eq!(order[0].column, ColumnRef::new("j_owner", "full_name"));
        assert_eq!(order[1].column, ColumnRef::root("id"));
        assert_eq!(resolver.joins().len(), 1);
    }

    #[test]
    fn test_existing_primary_key_is_not_duplicated() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();

        let order = compile_order(
            &[entry("id", "desc"), entry("name", "asc")],
            &DefaultOrder::new(),
            &mut resolver,
        );
        assert_eq!(order.len(), 2);
        assert_eq!(order[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_blank_column_sorts_by_primary_key() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();

        let order = compile_order(
            &[SortModelEntry {
                col_id: None,
                sort: Some("desc".into()),
            }],
            &DefaultOrder::new(),
            &mut resolver,
        );
        assert_eq!(
            order,
            vec![OrderClause {
                column: ColumnRef::root("id"),
                direction: SortDirection::Desc
            }]
        );
    }
}
