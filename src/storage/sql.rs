//! Renders grid criteria into parameterized SQLite statements
//!
//! Identifiers are quoted and qualified by their table alias; every literal
//! is bound as a parameter. Text patterns are escaped so `%` and `_` in user
//! input match literally.

use rusqlite::types::Value;
use rust_decimal::prelude::ToPrimitive;

use crate::grid::{
    Bound, ColumnRef, Criteria, Expr, JoinSpec, Literal, Operand, OrderClause,
    PageQuery, Pattern, ROOT_ALIAS,
};
use crate::model::format_timestamp;

const LIKE_ESCAPE: char = '\\';

/// A statement and its bound values
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn params(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, Value>> {
        rusqlite::params_from_iter(self.params.iter())
    }
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn qualified(column: &ColumnRef) -> String {
    format!("{}.{}", quote_ident(&column.qualifier), quote_ident(&column.name))
}

/// Root table plus the left joins the criteria need
pub fn render_from(table: &str, joins: &[JoinSpec]) -> String {
    let mut sql = format!("FROM {} AS {}", quote_ident(table), quote_ident(ROOT_ALIAS));
    for join in joins {
        sql.push_str(&format!(
            " LEFT JOIN {} AS {} ON {}.{} = {}.{}",
            quote_ident(&join.table),
            quote_ident(&join.alias),
            quote_ident(&join.alias),
            quote_ident(&join.target_key),
            quote_ident(ROOT_ALIAS),
            quote_ident(&join.foreign_key),
        ));
    }
    sql
}

/// Add `extra` unless a join with the same alias is already present
pub fn with_join(joins: &[JoinSpec], extra: JoinSpec) -> Vec<JoinSpec> {
    let mut all = joins.to_vec();
    if !all.iter().any(|j| j.alias == extra.alias) {
        all.push(extra);
    }
    all
}

/// `WHERE` clause joining every predicate with AND; empty when there are none
pub fn render_where(predicates: &[Expr], params: &mut Vec<Value>) -> String {
    if predicates.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = predicates
        .iter()
        .map(|expr| render_expr(expr, params))
        .collect();
    format!(" WHERE {}", parts.join(" AND "))
}

pub fn render_order(order: &[OrderClause]) -> String {
    if order.is_empty() {
        return String::new();
    }
    let terms: Vec<String> = order
        .iter()
        .map(|clause| format!("{} {}", qualified(&clause.column), clause.direction.as_sql()))
        .collect();
    format!(" ORDER BY {}", terms.join(", "))
}

fn render_page(query: &PageQuery, params: &mut Vec<Value>) -> String {
    params.push(Value::Integer(clamp_i64(query.limit)));
    params.push(Value::Integer(clamp_i64(query.offset)));
    " LIMIT ? OFFSET ?".to_string()
}

fn clamp_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// `SELECT <select> FROM ... WHERE ... ORDER BY ... LIMIT ? OFFSET ?`
pub fn select_page(select: &str, table: &str, joins: &[JoinSpec], query: &PageQuery) -> Statement {
    let mut params = Vec::new();
    let mut sql = format!("SELECT {} {}", select, render_from(table, joins));
    sql.push_str(&render_where(&query.criteria.predicates, &mut params));
    sql.push_str(&render_order(&query.order));
    sql.push_str(&render_page(query, &mut params));
    Statement { sql, params }
}

/// Ordered primary keys of one page
pub fn select_keys(table: &str, primary_key: &str, query: &PageQuery) -> Statement {
    let select = qualified(&ColumnRef::root(primary_key));
    select_page(&select, table, &query.criteria.joins, query)
}

/// Row count under the same joins and predicates
pub fn count(table: &str, criteria: &Criteria) -> Statement {
    let mut params = Vec::new();
    let mut sql = format!("SELECT COUNT(*) {}", render_from(table, &criteria.joins));
    sql.push_str(&render_where(&criteria.predicates, &mut params));
    Statement { sql, params }
}

/// `?, ?, ?` for an id membership list
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn render_operand(operand: &Operand) -> String {
    match operand {
        Operand::Column(column) => qualified(column),
        Operand::Lowercase(column) => format!("lower({})", qualified(column)),
    }
}

fn bind(value: &Literal, params: &mut Vec<Value>) -> &'static str {
    params.push(to_value(value));
    "?"
}

pub fn to_value(literal: &Literal) -> Value {
    match literal {
        Literal::Int(v) => Value::Integer(i64::from(*v)),
        Literal::Long(v) => Value::Integer(*v),
        Literal::Float(v) => Value::Real(f64::from(*v)),
        Literal::Double(v) => Value::Real(*v),
        Literal::Decimal(v) => Value::Real(v.to_f64().unwrap_or(f64::NAN)),
        Literal::Text(v) => Value::Text(v.clone()),
        Literal::Timestamp(v) => Value::Text(format_timestamp(v)),
    }
}

pub(crate) fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

fn like_pattern(pattern: &Pattern) -> String {
    let needle = escape_like(pattern.needle());
    match pattern {
        Pattern::Contains(_) => format!("%{}%", needle),
        Pattern::StartsWith(_) => format!("{}%", needle),
        Pattern::EndsWith(_) => format!("%{}", needle),
    }
}

fn render_bound(column: &str, bound: &Bound, lower: bool, params: &mut Vec<Value>) -> String {
    let op = match (lower, bound.inclusive) {
        (true, true) => ">=",
        (true, false) => ">",
        (false, true) => "<=",
        (false, false) => "<",
    };
    format!("{} {} {}", column, op, bind(&bound.value, params))
}

pub fn render_expr(expr: &Expr, params: &mut Vec<Value>) -> String {
    match expr {
        Expr::Compare { operand, op, value } => {
            let lhs = render_operand(operand);
            format!("{} {} {}", lhs, op.as_str(), bind(value, params))
        }
        Expr::Like {
            operand,
            pattern,
            negated,
        } => {
            let lhs = render_operand(operand);
            params.push(Value::Text(like_pattern(pattern)));
            let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
            format!("{} {} ? ESCAPE '{}'", lhs, keyword, LIKE_ESCAPE)
        }
        Expr::Range {
            operand,
            lower,
            upper,
        } => {
            let lhs = render_operand(operand);
            let low = render_bound(&lhs, lower, true, params);
            let high = render_bound(&lhs, upper, false, params);
            format!("({} AND {})", low, high)
        }
        Expr::In { operand, values } => {
            if values.is_empty() {
                return "0".to_string();
            }
            let lhs = render_operand(operand);
            for value in values {
                params.push(to_value(value));
            }
            format!("{} IN ({})", lhs, placeholders(values.len()))
        }
        Expr::And(left, right) => {
            let l = render_expr(left, params);
            let r = render_expr(right, params);
            format!("({} AND {})", l, r)
        }
        Expr::Or(left, right) => {
            let l = render_expr(left, params);
            let r = render_expr(right, params);
            format!("({} OR {})", l, r)
        }
    }
}
