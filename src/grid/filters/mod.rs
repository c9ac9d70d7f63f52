//! Per-kind filter conditions
//!
//! Each filter kind parses its own raw shape and compiles its own predicate.
//! Neither step can fail loudly: anything malformed, unknown or impossible to
//! coerce yields `None` and the column simply does not constrain the query.

pub mod date;
pub mod number;
pub mod set;
pub mod text;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use super::columns::ResolvedColumn;
use super::predicate::Expr;

pub use date::{DateCondition, DateFilter, DateOperator};
pub use number::{NumberCondition, NumberFilter, NumberOperator};
pub use set::{SetCondition, SetFilter};
pub use text::{TextCondition, TextFilter, TextOperator};

/// Raw filter object as received from the client
pub type RawFilter = Map<String, Value>;

/// Extension point for one filter kind
pub trait FilterKind {
    /// Typed condition produced by `parse`
    type Condition;

    /// Value of `filterType` selecting this kind
    const NAME: &'static str;

    /// Read a typed condition from a raw filter object
    fn parse(raw: &RawFilter) -> Option<Self::Condition>;

    /// Compile a condition against a resolved column
    fn compile(column: &ResolvedColumn, condition: &Self::Condition) -> Option<Expr>;
}

/// A typed condition of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Text(TextCondition),
    Number(NumberCondition),
    Date(DateCondition),
    Set(SetCondition),
}

impl FilterCondition {
    /// Parse a raw filter of the given `filterType`. Unknown kinds yield `None`.
    pub fn parse(filter_type: &str, raw: &RawFilter) -> Option<Self> {
        match filter_type {
            TextFilter::NAME => TextFilter::parse(raw).map(FilterCondition::Text),
            NumberFilter::NAME => NumberFilter::parse(raw).map(FilterCondition::Number),
            DateFilter::NAME => DateFilter::parse(raw).map(FilterCondition::Date),
            SetFilter::NAME => SetFilter::parse(raw).map(FilterCondition::Set),
            _ => None,
        }
    }

    pub fn compile(&self, column: &ResolvedColumn) -> Option<Expr> {
        match self {
            FilterCondition::Text(c) => TextFilter::compile(column, c),
            FilterCondition::Number(c) => NumberFilter::compile(column, c),
            FilterCondition::Date(c) => DateFilter::compile(column, c),
            FilterCondition::Set(c) => SetFilter::compile(column, c),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterCondition::Text(_) => TextFilter::NAME,
            FilterCondition::Number(_) => NumberFilter::NAME,
            FilterCondition::Date(_) => DateFilter::NAME,
            FilterCondition::Set(_) => SetFilter::NAME,
        }
    }
}

/// Read a string field. Numbers and booleans are rendered as text.
pub(crate) fn raw_string(raw: &RawFilter, key: &str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a numeric field. Numeric strings are accepted; anything else is absent.
pub(crate) fn raw_decimal(raw: &RawFilter, key: &str) -> Option<Decimal> {
    match raw.get(key)? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

/// Parse plain or scientific notation
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
}
