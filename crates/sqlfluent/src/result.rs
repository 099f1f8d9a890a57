//! Uniform results returned by every execution path.

use serde::Serialize;
use std::collections::BTreeMap;

/// Text stored for SQL `NULL` column values.
pub const NULL_TEXT: &str = "NULL";

/// One decoded row: column name → textual value.
pub type RowColumns = BTreeMap<String, String>;

/// Rows returned by a query, in the order the database produced them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub data: Vec<RowColumns>,
}

impl QueryResult {
    pub fn new(data: Vec<RowColumns>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&RowColumns> {
        self.data.first()
    }

    /// Take the first row, or `None` for an empty result.
    pub fn into_first(self) -> Option<RowColumns> {
        self.data.into_iter().next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowColumns> {
        self.data.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = RowColumns;
    type IntoIter = std::vec::IntoIter<RowColumns>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Mutation summary for INSERT/UPDATE/DELETE and DDL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Present when the driver reports one (SQLite rowid, MySQL AUTO_INCREMENT).
    pub last_insert_id: Option<i64>,
}

impl From<sqlx::sqlite::SqliteQueryResult> for ExecResult {
    fn from(r: sqlx::sqlite::SqliteQueryResult) -> Self {
        Self {
            rows_affected: r.rows_affected(),
            last_insert_id: Some(r.last_insert_rowid()),
        }
    }
}

impl From<sqlx::mysql::MySqlQueryResult> for ExecResult {
    fn from(r: sqlx::mysql::MySqlQueryResult) -> Self {
        Self {
            rows_affected: r.rows_affected(),
            last_insert_id: i64::try_from(r.last_insert_id()).ok(),
        }
    }
}
