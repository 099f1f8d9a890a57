//! `tracing` events for SQL sent to the driver and lifecycle transitions.
//!
//! The library never installs a subscriber. Enable the targets
//! `sqlfluent::sql` and `sqlfluent::lifecycle` at `debug` to see them.

use std::fmt;

/// SQL longer than this many bytes is truncated in log events.
pub const MAX_LOGGED_SQL_BYTES: usize = 200;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// Anything else (DDL, pragmas, ...)
    Other,
}

impl QueryType {
    /// Detect query type from the first keyword of the SQL text.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or("");

        if keyword.eq_ignore_ascii_case("SELECT") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// How a statement reaches the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecKind {
    Direct,
    Prepare,
    Prepared,
    TxDirect,
    TxPrepare,
    TxPrepared,
}

impl ExecKind {
    fn as_str(self) -> &'static str {
        match self {
            ExecKind::Direct => "direct",
            ExecKind::Prepare => "prepare",
            ExecKind::Prepared => "prepared",
            ExecKind::TxDirect => "tx_direct",
            ExecKind::TxPrepare => "tx_prepare",
            ExecKind::TxPrepared => "tx_prepared",
        }
    }
}

pub(crate) fn log_sql(kind: ExecKind, sql: &str, arg_count: usize) {
    if !tracing::enabled!(target: "sqlfluent::sql", tracing::Level::DEBUG) {
        return;
    }
    let shown = truncate_sql_bytes(sql, MAX_LOGGED_SQL_BYTES);
    let truncated = shown.len() < sql.len();
    tracing::debug!(
        target: "sqlfluent::sql",
        kind = kind.as_str(),
        query_type = %QueryType::from_sql(sql),
        arg_count,
        truncated,
        sql = %shown.trim(),
    );
}

pub(crate) fn log_transition(from: &'static str, to: &'static str, op: &'static str) {
    tracing::debug!(target: "sqlfluent::lifecycle", op, from, to, "state transition");
}

pub(crate) fn log_close_failure(op: &'static str, err: &crate::Error) {
    tracing::warn!(target: "sqlfluent::lifecycle", op, error = %err, "statement close failed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_query_type_from_leading_keyword() {
        assert_eq!(QueryType::from_sql(" SELECT *  FROM `t` "), QueryType::Select);
        assert_eq!(QueryType::from_sql("  insert INTO  `t` "), QueryType::Insert);
        assert_eq!(QueryType::from_sql(" UPDATE  `t`  SET a=1 "), QueryType::Update);
        assert_eq!(QueryType::from_sql(" DELETE  FROM `t` "), QueryType::Delete);
        assert_eq!(QueryType::from_sql("(SELECT 1)"), QueryType::Select);
        assert_eq!(QueryType::from_sql("CREATE TABLE t (id INT)"), QueryType::Other);
        assert_eq!(QueryType::from_sql(""), QueryType::Other);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 200), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT * FROM users", 10), "SELECT * F");
        // 'é' is two bytes; cutting through it backs off to the boundary.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }
}
