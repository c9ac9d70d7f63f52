//! Date filters
//!
//! Date filters work at day granularity against timestamp columns. Every
//! input is reduced to a calendar day first, then compiled into half-open
//! ranges over midnights:
//!
//! | operator      | predicate                    |
//! |---------------|------------------------------|
//! | `equals`      | `[day, day+1)`               |
//! | `lessThan`    | `< day`                      |
//! | `greaterThan` | `>= day+1`                   |
//! | `inRange`     | `[from, to+1)`, `to` = `from` when absent |

use chrono::{NaiveDate, NaiveDateTime};

use super::{raw_string, FilterKind, RawFilter};
use crate::grid::columns::ResolvedColumn;
use crate::grid::predicate::{Bound, CompareOp, Expr, Literal, Operand};

/// Accepted date-time layouts, tried after the plain date
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.3f",
    "%Y-%m-%d %H:%M:%S",
];

/// Reduce a client date string to a calendar day
///
/// Tries a plain `yyyy-MM-dd` date, then ISO date-time, then the space
/// separated layouts with and without milliseconds.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOperator {
    Equals,
    LessThan,
    GreaterThan,
    InRange,
}

impl DateOperator {
    pub fn from_client(s: &str) -> Option<Self> {
        match s {
            "equals" => Some(DateOperator::Equals),
            "lessThan" => Some(DateOperator::LessThan),
            "greaterThan" => Some(DateOperator::GreaterThan),
            "inRange" => Some(DateOperator::InRange),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCondition {
    pub operator: DateOperator,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

pub struct DateFilter;

impl FilterKind for DateFilter {
    type Condition = DateCondition;
    const NAME: &'static str = "date";

    fn parse(raw: &RawFilter) -> Option<DateCondition> {
        let operator = DateOperator::from_client(&raw_string(raw, "type")?)?;
        let from = parse_day(&raw_string(raw, "dateFrom")?)?;
        let to = raw_string(raw, "dateTo").and_then(|s| parse_day(&s));
        Some(DateCondition { operator, from, to })
    }

    fn compile(column: &ResolvedColumn, condition: &DateCondition) -> Option<Expr> {
        if !column.kind.map_or(false, |k| k.is_timestamp()) {
            return None;
        }
        let operand = Operand::Column(column.column.clone());
        let start = midnight(condition.from)?;

        let expr = match condition.operator {
            DateOperator::Equals => Expr::Range {
                operand,
                lower: Bound::inclusive(Literal::Timestamp(start)),
                upper: Bound::exclusive(Literal::Timestamp(next_midnight(condition.from)?)),
            },
            DateOperator::LessThan => {
                Expr::compare(operand, CompareOp::Lt, Literal::Timestamp(start))
            }
            DateOperator::GreaterThan => Expr::compare(
                operand,
                CompareOp::Ge,
                Literal::Timestamp(next_midnight(condition.from)?),
            ),
            DateOperator::InRange => {
                let to = condition.to.unwrap_or(condition.from);
                Expr::Range {
                    operand,
                    lower: Bound::inclusive(Literal::Timestamp(start)),
                    upper: Bound::exclusive(Literal::Timestamp(next_midnight(to)?)),
                }
            }
        };
        Some(expr)
    }
}

fn midnight(day: NaiveDate) -> Option<NaiveDateTime> {
    day.and_hms_opt(0, 0, 0)
}

fn next_midnight(day: NaiveDate) -> Option<NaiveDateTime> {
    midnight(day.succ_opt()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::columns::ColumnRef;
    use crate::grid::schema::AttributeKind;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawFilter {
        value.as_object().cloned().unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32) -> Literal {
        Literal::Timestamp(day(y, m, d).and_hms_opt(0, 0, 0).unwrap())
    }

    fn created() -> ResolvedColumn {
        ResolvedColumn {
            column: ColumnRef::root("creation_time"),
            kind: Some(AttributeKind::Timestamp),
        }
    }

    #[test]
    fn test_parse_day_formats() {
        let expected = Some(day(2024, 1, 15));
        assert_eq!(parse_day("2024-01-15"), expected);
        assert_eq!(parse_day("2024-01-15T10:20:30"), expected);
        assert_eq!(parse_day("2024-01-15T10:20:30.123"), expected);
        assert_eq!(parse_day("2024-01-15T10:20"), expected);
        assert_eq!(parse_day("2024-01-15 10:20:30.123"), expected);
        assert_eq!(parse_day("2024-01-15 10:20:30"), expected);
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("15/01/2024"), None);
        assert_eq!(parse_day("2024-13-01"), None);
        assert_eq!(parse_day("yesterday"), None);
    }

    #[test]
    fn test_unparseable_from_skips_filter() {
        assert!(DateFilter::parse(&raw(json!({"type": "equals", "dateFrom": "nope"}))).is_none());
        assert!(DateFilter::parse(&raw(json!({"type": "equals"}))).is_none());
    }

    #[test]
    fn test_equals_is_one_day_half_open() {
        let c = DateFilter::parse(&raw(json!({"type": "equals", "dateFrom": "2024-01-15 00:00:00"}))).unwrap();
        assert_eq!(
            DateFilter::compile(&created(), &c).unwrap(),
            Expr::Range {
                operand: Operand::Column(ColumnRef::root("creation_time")),
                lower: Bound::inclusive(ts(2024, 1, 15)),
                upper: Bound::exclusive(ts(2024, 1, 16)),
            }
        );
    }

    #[test]
    fn test_less_and_greater_than() {
        let lt = DateFilter::parse(&raw(json!({"type": "lessThan", "dateFrom": "2024-01-15"}))).unwrap();
        let gt = DateFilter::parse(&raw(json!({"type": "greaterThan", "dateFrom": "2024-01-15"}))).unwrap();

        match DateFilter::compile(&created(), &lt).unwrap() {
            Expr::Compare { op, value, .. } => {
                assert_eq!(op, CompareOp::Lt);
                assert_eq!(value, ts(2024, 1, 15));
            }
            other => panic!("unexpected {:?}", other),
        }
        match DateFilter::compile(&created(), &gt).unwrap() {
            Expr::Compare { op, value, .. } => {
                assert_eq!(op, CompareOp::Ge);
                assert_eq!(value, ts(2024, 1, 16));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_in_range_defaults_to_single_day() {
        let c = DateFilter::parse(&raw(json!({"type": "inRange", "dateFrom": "2024-02-28", "dateTo": "bad"}))).unwrap();
        assert_eq!(c.to, None);
        match DateFilter::compile(&created(), &c).unwrap() {
            Expr::Range { lower, upper, .. } => {
                assert_eq!(lower, Bound::inclusive(ts(2024, 2, 28)));
                assert_eq!(upper, Bound::exclusive(ts(2024, 2, 29)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_in_range_includes_end_day() {
        let c = DateFilter::parse(&raw(json!({"type": "inRange", "dateFrom": "2024-01-01", "dateTo": "2024-01-31"}))).unwrap();
        match DateFilter::compile(&created(), &c).unwrap() {
            Expr::Range { upper, .. } => assert_eq!(upper, Bound::exclusive(ts(2024, 2, 1))),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_timestamp_column_is_skipped() {
        let c = DateFilter::parse(&raw(json!({"type": "equals", "dateFrom": "2024-01-15"}))).unwrap();
        let text = ResolvedColumn {
            column: ColumnRef::root("name"),
            kind: Some(AttributeKind::Text),
        };
        let unknown = ResolvedColumn {
            column: ColumnRef::root("bogus"),
            kind: None,
        };
        assert!(DateFilter::compile(&text, &c).is_none());
        assert!(DateFilter::compile(&unknown, &c).is_none());
    }
}
