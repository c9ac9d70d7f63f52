//! Set filters
//!
//! Membership in a list of values, each cast to the column's declared kind.
//! If any member fails to cast the whole predicate is dropped rather than
//! silently narrowing the set.

use serde_json::Value;

use super::{parse_decimal, FilterKind, RawFilter};
use crate::grid::columns::ResolvedColumn;
use crate::grid::predicate::{Expr, Literal, Operand};
use crate::grid::schema::AttributeKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCondition {
    pub values: Vec<String>,
}

pub struct SetFilter;

impl FilterKind for SetFilter {
    type Condition = SetCondition;
    const NAME: &'static str = "set";

    fn parse(raw: &RawFilter) -> Option<SetCondition> {
        let values = raw
            .get("values")?
            .as_array()?
            .iter()
            .map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        if values.is_empty() {
            return None;
        }
        Some(SetCondition { values })
    }

    fn compile(column: &ResolvedColumn, condition: &SetCondition) -> Option<Expr> {
        let values = condition
            .values
            .iter()
            .map(|v| cast(v, column.kind))
            .collect::<Option<Vec<_>>>()?;

        Some(Expr::In {
            operand: Operand::Column(column.column.clone()),
            values,
        })
    }
}

/// Cast one member to the literal type of `kind`
fn cast(value: &str, kind: Option<AttributeKind>) -> Option<Literal> {
    let Some(kind) = kind else {
        return Some(Literal::Text(value.to_string()));
    };

    match kind {
        AttributeKind::Enum(members) => members
            .iter()
            .find(|m| **m == value)
            .map(|m| Literal::Text((*m).to_string())),
        AttributeKind::Int => value.trim().parse().ok().map(Literal::Int),
        AttributeKind::Long => value.trim().parse().ok().map(Literal::Long),
        AttributeKind::Float => value.trim().parse().ok().map(Literal::Float),
        AttributeKind::Double => value.trim().parse().ok().map(Literal::Double),
        AttributeKind::Decimal => parse_decimal(value.trim()).map(Literal::Decimal),
        AttributeKind::Text | AttributeKind::Timestamp => Some(Literal::Text(value.to_string())),
    }
}
