//! Number filters
//!
//! Values travel as `Decimal` until compilation, where they are coerced to
//! the column's declared kind. Integer kinds truncate toward zero; float
//! kinds round to the nearest representable value so that equality against
//! stored single precision values stays exact.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{raw_decimal, raw_string, FilterKind, RawFilter};
use crate::grid::columns::ResolvedColumn;
use crate::grid::predicate::{Bound, CompareOp, Expr, Literal, Operand};
use crate::grid::schema::AttributeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOperator {
    Equals,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    InRange,
}

impl NumberOperator {
    pub fn from_client(s: &str) -> Option<Self> {
        match s {
            "equals" => Some(NumberOperator::Equals),
            "notEqual" => Some(NumberOperator::NotEqual),
            "lessThan" => Some(NumberOperator::LessThan),
            "lessThanOrEqual" => Some(NumberOperator::LessThanOrEqual),
            "greaterThan" => Some(NumberOperator::GreaterThan),
            "greaterThanOrEqual" => Some(NumberOperator::GreaterThanOrEqual),
            "inRange" => Some(NumberOperator::InRange),
            _ => None,
        }
    }

    fn compare_op(&self) -> Option<CompareOp> {
        match self {
            NumberOperator::Equals => Some(CompareOp::Eq),
            NumberOperator::NotEqual => Some(CompareOp::Ne),
            NumberOperator::LessThan => Some(CompareOp::Lt),
            NumberOperator::LessThanOrEqual => Some(CompareOp::Le),
            NumberOperator::GreaterThan => Some(CompareOp::Gt),
            NumberOperator::GreaterThanOrEqual => Some(CompareOp::Ge),
            NumberOperator::InRange => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberCondition {
    pub operator: NumberOperator,
    pub value: Option<Decimal>,
    /// Upper bound, only meaningful for `inRange`
    pub value_to: Option<Decimal>,
}

pub struct NumberFilter;

impl FilterKind for NumberFilter {
    type Condition = NumberCondition;
    const NAME: &'static str = "number";

    fn parse(raw: &RawFilter) -> Option<NumberCondition> {
        let operator = NumberOperator::from_client(&raw_string(raw, "type")?)?;
        let value = raw_decimal(raw, "filter");
        let value_to = raw_decimal(raw, "filterTo");

        match operator {
            NumberOperator::InRange if value.is_none() && value_to.is_none() => None,
            NumberOperator::InRange => Some(NumberCondition {
                operator,
                value,
                value_to,
            }),
            _ => value.map(|value| NumberCondition {
                operator,
                value: Some(value),
                value_to: None,
            }),
        }
    }

    fn compile(column: &ResolvedColumn, condition: &NumberCondition) -> Option<Expr> {
        let kind = column.kind.filter(AttributeKind::is_numeric)?;
        let operand = || Operand::Column(column.column.clone());

        if let Some(op) = condition.operator.compare_op() {
            let value = coerce(condition.value?, kind)?;
            return Some(Expr::compare(operand(), op, value));
        }

        let lower = match condition.value {
            Some(v) => Some(coerce(v, kind)?),
            None => None,
        };
        let upper = match condition.value_to {
            Some(v) => Some(coerce(v, kind)?),
            None => None,
        };

        match (lower, upper) {
            (Some(lower), Some(upper)) => Some(Expr::Range {
                operand: operand(),
                lower: Bound::inclusive(lower),
                upper: Bound::inclusive(upper),
            }),
            (Some(lower), None) => Some(Expr::compare(operand(), CompareOp::Ge, lower)),
            (None, Some(upper)) => Some(Expr::compare(operand(), CompareOp::Le, upper)),
            (None, None) => None,
        }
    }
}

/// Coerce a decimal to the literal type of `kind`
pub fn coerce(value: Decimal, kind: AttributeKind) -> Option<Literal> {
    match kind {
        AttributeKind::Int => value.trunc().to_i32().map(Literal::Int),
        AttributeKind::Long => value.trunc().to_i64().map(Literal::Long),
        AttributeKind::Float => value.to_f32().map(Literal::Float),
        AttributeKind::Double => value.to_f64().map(Literal::Double),
        AttributeKind::Decimal => Some(Literal::Decimal(value)),
        AttributeKind::Text | AttributeKind::Enum(_) | AttributeKind::Timestamp => None,
    }
}
