//! Backend-agnostic predicate expressions
//!
//! Filters compile into this small tree. Storage adapters render it; nothing
//! here knows about SQL.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::columns::ColumnRef;

/// A typed value compared against a column
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Text(String),
    Timestamp(NaiveDateTime),
}

/// Left-hand side of a predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Column(ColumnRef),
    /// Column value folded to lower case
    Lowercase(ColumnRef),
}

impl Operand {
    pub fn column(&self) -> &ColumnRef {
        match self {
            Operand::Column(c) | Operand::Lowercase(c) => c,
        }
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Substring pattern, matched literally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

impl Pattern {
    pub fn needle(&self) -> &str {
        match self {
            Pattern::Contains(s) | Pattern::StartsWith(s) | Pattern::EndsWith(s) => s,
        }
    }
}

/// One end of a range
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub value: Literal,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: Literal) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: Literal) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// Predicate expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        operand: Operand,
        op: CompareOp,
        value: Literal,
    },
    Like {
        operand: Operand,
        pattern: Pattern,
        negated: bool,
    },
    Range {
        operand: Operand,
        lower: Bound,
        upper: Bound,
    },
    In {
        operand: Operand,
        values: Vec<Literal>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn compare(operand: Operand, op: CompareOp, value: Literal) -> Self {
        Expr::Compare { operand, op, value }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Visit every column the expression reads
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Expr::Compare { operand, .. }
            | Expr::Like { operand, .. }
            | Expr::Range { operand, .. }
            | Expr::In { operand, .. } => out.push(operand.column()),
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
        }
    }
}
