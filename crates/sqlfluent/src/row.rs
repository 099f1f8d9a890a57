//! Decoding driver rows into text maps.
//!
//! Columns are converted from the raw value the driver hands back, never from
//! the declared column type, so any type the database can return comes out
//! as text.

use crate::error::Result;
use crate::result::{NULL_TEXT, QueryResult, RowColumns};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, ColumnIndex, Row, TypeInfo, ValueRef};

/// Decode rows: every column becomes text, SQL `NULL` becomes `"NULL"`.
///
/// When two columns share a name the later one wins.
fn decode_with<R>(rows: &[R], column_text: fn(&R, usize) -> Result<String>) -> Result<QueryResult>
where
    R: Row,
    usize: ColumnIndex<R>,
{
    let mut data = Vec::with_capacity(rows.len());
    for row in rows {
        let mut out = RowColumns::new();
        for (index, column) in row.columns().iter().enumerate() {
            let text = if row.try_get_raw(index)?.is_null() {
                NULL_TEXT.to_string()
            } else {
                column_text(row, index)?
            };
            out.insert(column.name().to_string(), text);
        }
        data.push(out);
    }
    Ok(QueryResult::new(data))
}

pub(crate) fn decode_sqlite_rows(rows: &[SqliteRow]) -> Result<QueryResult> {
    decode_with(rows, sqlite_text)
}

pub(crate) fn decode_mysql_rows(rows: &[MySqlRow]) -> Result<QueryResult> {
    decode_with(rows, mysql_text)
}

fn lossy(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

// SQLite converts any storage class to its text form when read as bytes.
fn sqlite_text(row: &SqliteRow, index: usize) -> Result<String> {
    let bytes: Vec<u8> = row.try_get_unchecked(index)?;
    Ok(lossy(bytes))
}

// MySQL rows arrive in the binary protocol: numbers and temporal values are
// packed, everything else (DECIMAL, JSON, ENUM, strings, blobs) is raw text.
fn mysql_text(row: &MySqlRow, index: usize) -> Result<String> {
    let type_name = row.try_get_raw(index)?.type_info().name().to_string();
    let text = match type_name.as_str() {
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            row.try_get_unchecked::<i64, _>(index)?.to_string()
        }
        name if name.ends_with(" UNSIGNED") => row.try_get_unchecked::<u64, _>(index)?.to_string(),
        "FLOAT" => row.try_get_unchecked::<f32, _>(index)?.to_string(),
        "DOUBLE" => row.try_get_unchecked::<f64, _>(index)?.to_string(),
        "DATE" => row.try_get_unchecked::<NaiveDate, _>(index)?.to_string(),
        "DATETIME" | "TIMESTAMP" => row.try_get_unchecked::<NaiveDateTime, _>(index)?.to_string(),
        "TIME" => row.try_get_unchecked::<NaiveTime, _>(index)?.to_string(),
        _ => lossy(row.try_get_unchecked::<Vec<u8>, _>(index)?),
    };
    Ok(text)
}
