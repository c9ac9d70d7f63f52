//! Text filters
//!
//! Case-insensitive on both sides: the column is folded with `lower()` and
//! the needle is lowercased before compilation. Blank needles constrain
//! nothing.

use super::{raw_string, FilterKind, RawFilter};
use crate::grid::columns::ResolvedColumn;
use crate::grid::predicate::{CompareOp, Expr, Literal, Operand, Pattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOperator {
    Contains,
    NotContains,
    Equals,
    NotEqual,
    StartsWith,
    EndsWith,
}

impl TextOperator {
    pub fn from_client(s: &str) -> Option<Self> {
        match s {
            "contains" => Some(TextOperator::Contains),
            "notContains" => Some(TextOperator::NotContains),
            "equals" => Some(TextOperator::Equals),
            "notEqual" => Some(TextOperator::NotEqual),
            "startsWith" => Some(TextOperator::StartsWith),
            "endsWith" => Some(TextOperator::EndsWith),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCondition {
    pub operator: TextOperator,
    /// Already lowercased
    pub needle: String,
}

pub struct TextFilter;

impl FilterKind for TextFilter {
    type Condition = TextCondition;
    const NAME: &'static str = "text";

    fn parse(raw: &RawFilter) -> Option<TextCondition> {
        let operator = TextOperator::from_client(&raw_string(raw, "type")?)?;
        let value = raw_string(raw, "filter")?;
        if value.trim().is_empty() {
            return None;
        }
        Some(TextCondition {
            operator,
            needle: value.to_lowercase(),
        })
    }

    fn compile(column: &ResolvedColumn, condition: &TextCondition) -> Option<Expr> {
        if !column.kind.map_or(false, |k| k.is_textual()) {
            return None;
        }
        let operand = Operand::Lowercase(column.column.clone());
        let needle = condition.needle.clone();

        let expr = match condition.operator {
            TextOperator::Contains => like(operand, Pattern::Contains(needle), false),
            TextOperator::NotContains => like(operand, Pattern::Contains(needle), true),
            TextOperator::StartsWith => like(operand, Pattern::StartsWith(needle), false),
            TextOperator::EndsWith => like(operand, Pattern::EndsWith(needle), false),
            TextOperator::Equals => Expr::compare(operand, CompareOp::Eq, Literal::Text(needle)),
            TextOperator::NotEqual => Expr::compare(operand, CompareOp::Ne, Literal::Text(needle)),
        };
        Some(expr)
    }
}

fn like(operand: Operand, pattern: Pattern, negated: bool) -> Expr {
    Expr::Like {
        operand,
        pattern,
        negated,
    }
}
