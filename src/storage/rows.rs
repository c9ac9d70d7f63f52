//! Column decoding shared by the stores

use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::Row;

use crate::model::parse_timestamp;

/// Decode an enum stored by name
pub(crate) fn enum_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    T::from_str(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

/// Decode a timestamp stored as ISO text
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, format!("bad timestamp: {}", raw).into())
    })
}
