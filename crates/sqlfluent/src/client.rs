//! Driver-facing traits.
//!
//! The lifecycle never talks to a database library directly; it goes through
//! these three traits. [`crate::Database`] implements them over `sqlx`, and
//! tests plug in an in-memory recorder.

use crate::error::Result;
use crate::result::{ExecResult, QueryResult};
use crate::value::Value;
use std::future::Future;

/// A compiled statement handle.
///
/// Executing a statement goes through the [`Connection`] or [`Transaction`]
/// that should run it. Closing consumes the handle, so it cannot be closed
/// twice.
pub trait Statement: Send + Sync {
    /// The SQL text the statement was compiled from.
    fn sql(&self) -> &str;

    /// Release the handle. Errors are reported but the handle is gone either way.
    fn close(self) -> Result<()>;
}

/// An open transaction.
///
/// Statements run in the order the caller awaits them; a transaction is never
/// used from two places at once because every method takes `&mut self`.
pub trait Transaction: Send {
    type Statement: Statement;

    /// Execute SQL text directly and return the mutation summary.
    fn exec(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<ExecResult>> + Send;

    /// Execute SQL text directly and decode all rows.
    fn query(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<QueryResult>> + Send;

    /// Compile a statement scoped to this transaction.
    fn prepare(&mut self, sql: &str) -> impl Future<Output = Result<Self::Statement>> + Send;

    fn exec_prepared(
        &mut self,
        stmt: &Self::Statement,
        args: &[Value],
    ) -> impl Future<Output = Result<ExecResult>> + Send;

    fn query_prepared(
        &mut self,
        stmt: &Self::Statement,
        args: &[Value],
    ) -> impl Future<Output = Result<QueryResult>> + Send;

    fn commit(self) -> impl Future<Output = Result<()>> + Send;

    fn rollback(self) -> impl Future<Output = Result<()>> + Send;
}

/// A database connection (or pool) that can run statements and open transactions.
pub trait Connection: Send + Sync {
    type Statement: Statement;
    type Transaction: Transaction<Statement = Self::Statement>;

    /// Execute SQL text and return the mutation summary.
    fn exec(&self, sql: &str, args: &[Value]) -> impl Future<Output = Result<ExecResult>> + Send;

    /// Execute SQL text and decode all rows.
    fn query(&self, sql: &str, args: &[Value])
    -> impl Future<Output = Result<QueryResult>> + Send;

    /// Compile a statement on this connection.
    fn prepare(&self, sql: &str) -> impl Future<Output = Result<Self::Statement>> + Send;

    fn exec_prepared(
        &self,
        stmt: &Self::Statement,
        args: &[Value],
    ) -> impl Future<Output = Result<ExecResult>> + Send;

    fn query_prepared(
        &self,
        stmt: &Self::Statement,
        args: &[Value],
    ) -> impl Future<Output = Result<QueryResult>> + Send;

    /// Open a transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Transaction>> + Send;
}
