//! Filter model parser
//!
//! Turns the raw `filterModel` object into predicates. A filter entry is
//! either a single condition tagged by `filterType`, or a compound entry:
//!
//! ```json
//! { "filterType": "text", "operator": "OR",
//!   "condition1": { "type": "contains", "filter": "a" },
//!   "condition2": { "type": "endsWith", "filter": "z" } }
//! ```
//!
//! Newer clients send `conditions: [...]` instead of `condition1/2`; both
//! are accepted. Children inherit the parent's `filterType` when they do not
//! carry their own. Entries that cannot be understood produce no predicate.

use std::collections::BTreeMap;

use serde_json::Value;

use super::columns::{ColumnResolver, ResolvedColumn};
use super::filters::{FilterCondition, RawFilter};
use super::predicate::Expr;

/// How compound children combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn from_client(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("and") {
            Some(LogicalOperator::And)
        } else if s.eq_ignore_ascii_case("or") {
            Some(LogicalOperator::Or)
        } else {
            None
        }
    }
}

/// A parsed filter entry
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSpec {
    Condition(FilterCondition),
    Compound {
        operator: LogicalOperator,
        children: Vec<FilterSpec>,
    },
}

impl FilterSpec {
    /// Parse one raw entry. `inherited` is the parent's `filterType`.
    pub fn parse(raw: &Value, inherited: Option<&str>) -> Option<FilterSpec> {
        let raw = raw.as_object()?;
        let filter_type = raw
            .get("filterType")
            .and_then(Value::as_str)
            .or(inherited);

        if Self::is_compound(raw) {
            return Self::parse_compound(raw, filter_type);
        }

        FilterCondition::parse(filter_type?, raw).map(FilterSpec::Condition)
    }

    /// A logical operator alone does not make an entry compound; it also
    /// needs child descriptors.
    fn is_compound(raw: &RawFilter) -> bool {
        let has_operator = raw.get("operator").map_or(false, Value::is_string);
        let has_children = ["condition1", "condition2", "conditions"]
            .iter()
            .any(|key| raw.get(*key).map_or(false, |v| !v.is_null()));
        has_operator && has_children
    }

    fn parse_compound(raw: &RawFilter, filter_type: Option<&str>) -> Option<FilterSpec> {
        let operator = LogicalOperator::from_client(raw.get("operator")?.as_str()?)?;

        let raw_children: Vec<&Value> = match raw.get("conditions").and_then(Value::as_array) {
            Some(conditions) => conditions.iter().collect(),
            None => ["condition1", "condition2"]
                .iter()
                .filter_map(|key| raw.get(*key))
                .collect(),
        };

        let mut children: Vec<FilterSpec> = raw_children
            .into_iter()
            .filter_map(|child| FilterSpec::parse(child, filter_type))
            .collect();

        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(FilterSpec::Compound { operator, children }),
        }
    }

    /// Compile against a resolved column. Children that compile to nothing
    /// are dropped; a single survivor stands alone.
    pub fn compile(&self, column: &ResolvedColumn) -> Option<Expr> {
        match self {
            FilterSpec::Condition(condition) => condition.compile(column),
            FilterSpec::Compound { operator, children } => {
                let combine: fn(Expr, Expr) -> Expr = match operator {
                    LogicalOperator::And => Expr::and,
                    LogicalOperator::Or => Expr::or,
                };
                children
                    .iter()
                    .filter_map(|child| child.compile(column))
                    .reduce(combine)
            }
        }
    }
}

/// Predicates compiled from a whole filter model
#[derive(Debug, Default)]
pub struct CompiledFilters {
    pub predicates: Vec<Expr>,
    /// Column ids whose entries produced nothing
    pub skipped: Vec<String>,
}

/// Compile every entry of a filter model, in key order
pub fn compile_filter_model(
    filter_model: Option<&BTreeMap<String, Value>>,
    resolver: &mut ColumnResolver<'_>,
) -> CompiledFilters {
    let mut out = CompiledFilters::default();
    let Some(model) = filter_model else {
        return out;
    };

    for (column_id, raw) in model {
        let predicate = FilterSpec::parse(raw, None).and_then(|spec| {
            let column = resolver.resolve(Some(column_id));
            spec.compile(&column)
        });

        match predicate {
            Some(expr) => out.predicates.push(expr),
            None => out.skipped.push(column_id.clone()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::columns::{ColumnCatalog, ColumnMapping, ColumnRef};
    use crate::grid::predicate::{CompareOp, Literal, Operand, Pattern};
    use crate::grid::schema::{AttributeKind, EntitySchema};
    use serde_json::json;
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
            .attribute("numberOfWheels", "number_of_wheels", AttributeKind::Int)
            .relation("owner", "owner_id", person);
        ColumnCatalog::new(
            Arc::new(schema),
            ColumnMapping::new().map("ownerName", "owner.fullName"),
        )
    }

    fn name_column() -> ResolvedColumn {
        ResolvedColumn {
            column: ColumnRef::root("name"),
            kind: Some(AttributeKind::Text),
        }
    }

    fn like(needle: &str) -> Expr {
        Expr::Like {
            operand: Operand::Lowercase(ColumnRef::root("name")),
            pattern: Pattern::Contains(needle.into()),
            negated: false,
        }
    }

    #[test]
    fn test_single_condition() {
        let spec = FilterSpec::parse(&json!({"filterType": "text", "type": "contains", "filter": "A"}), None).unwrap();
        assert_eq!(spec.compile(&name_column()), Some(like("a")));
    }

    #[test]
    fn test_compound_or() {
        let raw = json!({
            "filterType": "text",
            "operator": "or",
            "condition1": {"filterType": "text", "type": "contains", "filter": "a"},
            "condition2": {"type": "contains", "filter": "b"}
        });
        let spec = FilterSpec::parse(&raw, None).unwrap();
        assert_eq!(spec.compile(&name_column()), Some(Expr::or(like("a"), like("b"))));
    }

    #[test]
    fn test_compound_conditions_array() {
        let raw = json!({
            "filterType": "text",
            "operator": "AND",
            "conditions": [
                {"type": "contains", "filter": "a"},
                {"type": "contains", "filter": "b"},
                {"type": "contains", "filter": "c"}
            ]
        });
        let spec = FilterSpec::parse(&raw, None).unwrap();
        assert_eq!(
            spec.compile(&name_column()),
            Some(Expr::and(Expr::and(like("a"), like("b")), like("c")))
        );
    }

    #[test]
    fn test_compound_single_survivor_stands_alone() {
        let raw = json!({
            "filterType": "text",
            "operator": "AND",
            "condition1": {"type": "contains", "filter": "a"},
            "condition2": {"type": "contains", "filter": ""}
        });
        let spec = FilterSpec::parse(&raw, None).unwrap();
        assert!(matches!(spec, FilterSpec::Condition(_)));
        assert_eq!(spec.compile(&name_column()), Some(like("a")));
    }

    #[test]
    fn test_compound_with_no_survivors_is_nothing() {
        let raw = json!({
            "filterType": "text",
            "operator": "OR",
            "condition1": {"type": "bogus", "filter": "a"},
            "condition2": {"type": "contains"}
        });
        assert!(FilterSpec::parse(&raw, None).is_none());
    }

    #[test]
    fn test_unknown_logical_operator_is_nothing() {
        let raw = json!({
            "filterType": "text",
            "operator": "XOR",
            "condition1": {"type": "contains", "filter": "a"},
            "condition2": {"type": "contains", "filter": "b"}
        });
        assert!(FilterSpec::parse(&raw, None).is_none());
    }

    #[test]
    fn test_null_operator_is_a_plain_condition() {
        let raw = json!({"filterType": "text", "operator": null, "type": "contains", "filter": "A"});
        let spec = FilterSpec::parse(&raw, None).unwrap();
        assert_eq!(spec.compile(&name_column()), Some(like("a")));
    }

    #[test]
    fn test_operator_without_children_is_a_plain_condition() {
        let raw = json!({"filterType": "text", "operator": "AND", "type": "contains", "filter": "A"});
        let spec = FilterSpec::parse(&raw, None).unwrap();
        assert!(matches!(spec, FilterSpec::Condition(_)));
        assert_eq!(spec.compile(&name_column()), Some(like("a")));

        let raw = json!({"filterType": "text", "operator": "OR", "conditions": null, "type": "contains", "filter": "a"});
        assert_eq!(FilterSpec::parse(&raw, None).unwrap().compile(&name_column()), Some(like("a")));
    }

    #[test]
    fn test_text_filter_on_number_column_is_skipped() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();

        let mut model = BTreeMap::new();
        model.insert("numberOfWheels".to_string(), json!({"filterType": "text", "type": "contains", "filter": "4"}));

        let compiled = compile_filter_model(Some(&model), &mut resolver);
        assert!(compiled.predicates.is_empty());
        assert_eq!(compiled.skipped, vec!["numberOfWheels".to_string()]);
    }

    #[test]
    fn test_unknown_filter_type_is_nothing() {
        assert!(FilterSpec::parse(&json!({"filterType": "agMultiColumn", "type": "contains", "filter": "a"}), None).is_none());
        assert!(FilterSpec::parse(&json!({"type": "contains", "filter": "a"}), None).is_none());
        assert!(FilterSpec::parse(&json!("contains a"), None).is_none());
    }

    #[test]
    fn test_filter_model_in_key_order() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();

        let mut model = BTreeMap::new();
        model.insert("numberOfWheels".to_string(), json!({"filterType": "number", "type": "equals", "filter": 4}));
        model.insert("bogus".to_string(), json!({"filterType": "whatever"}));
        model.insert("name".to_string(), json!({"filterType": "text", "type": "contains", "filter": "x"}));

        let compiled = compile_filter_model(Some(&model), &mut resolver);
        assert_eq!(compiled.skipped, vec!["bogus".to_string()]);
        assert_eq!(compiled.predicates.len(), 2);
        assert_eq!(compiled.predicates[0], like("x"));
        assert_eq!(
            compiled.predicates[1],
            Expr::compare(
                Operand::Column(ColumnRef::root("number_of_wheels")),
                CompareOp::Eq,
                Literal::Int(4)
            )
        );
    }

    #[test]
    fn test_filter_model_joins_relation_once() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();

        let mut model = BTreeMap::new();
        model.insert("ownerName".to_string(), json!({"filterType": "text", "type": "contains", "filter": "x"}));
        model.insert("owner.fullName".to_string(), json!({"filterType": "text", "type": "equals", "filter": "y"}));

        let compiled = compile_filter_model(Some(&model), &mut resolver);
        assert_eq!(compiled.predicates.len(), 2);
        assert_eq!(resolver.joins().len(), 1);
    }

    #[test]
    fn test_kind_mismatch_is_skipped() {
        let catalog = catalog();
        let mut resolver = catalog.resolver();

        let mut model = BTreeMap::new();
        model.insert("name".to_string(), json!({"filterType": "number", "type": "equals", "filter": 4}));

        let compiled = compile_filter_model(Some(&model), &mut resolver);
        assert!(compiled.predicates.is_empty());
        assert_eq!(compiled.skipped, vec!["name".to_string()]);
    }
}
