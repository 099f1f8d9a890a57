//! Prepared statement and transaction lifecycle bound to one composer.
//!
//! A [`Lifecycle`] owns a [`Composer`] together with at most one compiled
//! statement and at most one transaction. The handles live inside an explicit
//! state enum, so a statement can only be closed by moving it out of the
//! state; closing twice is impossible and "close when nothing is held" is a
//! no-op.
//!
//! ```text
//! Idle ──prepare_once──▶ Prepared ──tx_begin──▶ PreparedInTransaction
//!  │  ◀──prepare_close──                          ▲        │
//!  │                                    tx_prepare │        │ tx_prepare_close
//!  └──tx_begin──▶ InTransaction ───────────────────┘ ◀──────┘
//!
//! tx_commit / tx_rollback: any transaction state ──▶ Idle
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sqlfluent::{Database, Lifecycle, args};
//!
//! let db = Database::open("sqlite3", "sqlite::memory:").await?;
//! let mut stmt = Lifecycle::<Database>::new();
//!
//! stmt.tx_begin(&db).await?;
//! stmt.insert_table("foo").insert_fields("name").insert_values("(?)");
//! stmt.tx_prepare().await?;
//! for i in 0..100 {
//!     stmt.tx_stmt_exec(&args![format!("name_{i}")]).await?;
//! }
//! stmt.tx_commit().await?;
//!
//! stmt.clear().select("*").from("foo");
//! let rst = stmt.query(&db, &[]).await?;
//! # Ok::<(), sqlfluent::Error>(())
//! ```

use crate::client::{Connection, Statement, Transaction};
use crate::composer::Composer;
use crate::error::{Error, Result, UsageError};
use crate::monitor::{ExecKind, log_close_failure, log_sql, log_transition};
use crate::result::{ExecResult, QueryResult, RowColumns};
use crate::value::Value;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// No handle held.
    Idle,
    /// A statement compiled on the connection is held.
    Prepared,
    /// A transaction is open, no statement is held.
    InTransaction,
    /// A transaction is open and a statement scoped to it is held.
    PreparedInTransaction,
}

impl StateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StateKind::Idle => "idle",
            StateKind::Prepared => "prepared",
            StateKind::InTransaction => "in_transaction",
            StateKind::PreparedInTransaction => "prepared_in_transaction",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum State<T, S> {
    Idle,
    Prepared(S),
    InTransaction(T),
    PreparedInTransaction { tx: T, stmt: S },
}

impl<T, S> State<T, S> {
    fn kind(&self) -> StateKind {
        match self {
            State::Idle => StateKind::Idle,
            State::Prepared(_) => StateKind::Prepared,
            State::InTransaction(_) => StateKind::InTransaction,
            State::PreparedInTransaction { .. } => StateKind::PreparedInTransaction,
        }
    }
}

fn require_args(args: &[Value]) -> Result<()> {
    if args.is_empty() {
        return Err(UsageError::NoArguments.into());
    }
    Ok(())
}

fn first_row(rst: QueryResult) -> Result<RowColumns> {
    rst.into_first()
        .ok_or_else(|| Error::not_found("Expected one row, got none"))
}

/// A composer plus the statement and transaction handles compiled from it.
///
/// Derefs to [`Composer`], so clause methods can be called on it directly.
/// Not meant for concurrent use: every state-changing method takes `&mut self`.
pub struct Lifecycle<C: Connection> {
    composer: Composer,
    state: State<C::Transaction, C::Statement>,
}

impl<C: Connection> Default for Lifecycle<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> fmt::Debug for Lifecycle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("composer", &self.composer)
            .field("state", &self.state())
            .finish()
    }
}

impl<C: Connection> Deref for Lifecycle<C> {
    type Target = Composer;

    fn deref(&self) -> &Composer {
        &self.composer
    }
}

impl<C: Connection> DerefMut for Lifecycle<C> {
    fn deref_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }
}

impl<C: Connection> Lifecycle<C> {
    pub fn new() -> Self {
        Self::with_composer(Composer::new())
    }

    pub fn with_composer(composer: Composer) -> Self {
        Self {
            composer,
            state: State::Idle,
        }
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Mutable access to the composer.
    ///
    /// Changing clauses does not recompile an already prepared statement; call
    /// [`Lifecycle::clear`] or [`Lifecycle::prepare_close`] first.
    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Release handles and return the composer.
    pub fn into_composer(mut self) -> Composer {
        std::mem::take(&mut self.composer)
    }

    pub fn state(&self) -> StateKind {
        self.state.kind()
    }

    pub fn is_prepared(&self) -> bool {
        matches!(
            self.state,
            State::Prepared(_) | State::PreparedInTransaction { .. }
        )
    }

    pub fn in_transaction(&self) -> bool {
        matches!(
            self.state,
            State::InTransaction(_) | State::PreparedInTransaction { .. }
        )
    }

    /// SQL text of the held statement, if any.
    pub fn statement_sql(&self) -> Option<&str> {
        match &self.state {
            State::Prepared(stmt) | State::PreparedInTransaction { stmt, .. } => Some(stmt.sql()),
            _ => None,
        }
    }

    /// Close the held statement (if any) and reset the composer.
    ///
    /// An open transaction stays open, so the composer can be reused for the
    /// next statement inside it. Returns the composer for chaining.
    pub fn clear(&mut self) -> &mut Composer {
        if let Err(err) = self.prepare_close() {
            log_close_failure("clear", &err);
        }
        self.composer.clear()
    }

    fn ensure_no_transaction(&self) -> Result<()> {
        if self.in_transaction() {
            return Err(UsageError::TransactionOpen.into());
        }
        Ok(())
    }

    fn ensure_transaction(&self) -> Result<()> {
        if !self.in_transaction() {
            return Err(UsageError::NoTransaction.into());
        }
        Ok(())
    }

    /// Store a freshly compiled statement, moving to the matching prepared state.
    fn attach(&mut self, stmt: C::Statement, op: &'static str) {
        let from = self.state();
        self.state = match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => State::Prepared(stmt),
            State::InTransaction(tx) => State::PreparedInTransaction { tx, stmt },
            // A handle is already held; keep it and release the new one.
            held @ (State::Prepared(_) | State::PreparedInTransaction { .. }) => {
                if let Err(err) = stmt.close() {
                    log_close_failure(op, &err);
                }
                held
            }
        };
        log_transition(from.as_str(), self.state().as_str(), op);
    }

    // ==================== Direct execution ====================

    /// Render for direct execution and run it on `conn`.
    pub async fn exec(&self, conn: &C, args: &[Value]) -> Result<ExecResult> {
        self.ensure_no_transaction()?;
        let sql = self.composer.render(false);
        log_sql(ExecKind::Direct, &sql, args.len());
        conn.exec(&sql, args).await
    }

    /// Render for direct execution, run it on `conn` and decode all rows.
    pub async fn query(&self, conn: &C, args: &[Value]) -> Result<QueryResult> {
        self.ensure_no_transaction()?;
        let sql = self.composer.render(false);
        log_sql(ExecKind::Direct, &sql, args.len());
        conn.query(&sql, args).await
    }

    /// Like [`Lifecycle::query`] but returns only the first row.
    ///
    /// Returns [`Error::NotFound`] when the result is empty.
    pub async fn query_row(&self, conn: &C, args: &[Value]) -> Result<RowColumns> {
        first_row(self.query(conn, args).await?)
    }

    // ==================== Prepared execution ====================

    /// Compile the composer on `conn` unless a statement is already held.
    pub async fn prepare_once(&mut self, conn: &C) -> Result<()> {
        match self.state {
            State::Idle => {}
            State::Prepared(_) => return Ok(()),
            State::InTransaction(_) | State::PreparedInTransaction { .. } => {
                return Err(UsageError::TransactionOpen.into());
            }
        }

        let sql = self.composer.render(true);
        log_sql(ExecKind::Prepare, &sql, 0);
        let stmt = conn.prepare(&sql).await?;
        self.attach(stmt, "prepare_once");
        Ok(())
    }

    async fn prepared_statement(&mut self, conn: &C) -> Result<&C::Statement> {
        self.prepare_once(conn).await?;
        match &self.state {
            State::Prepared(stmt) => Ok(stmt),
            _ => Err(UsageError::TransactionOpen.into()),
        }
    }

    /// Execute the held statement, compiling it first if needed.
    ///
    /// At least one argument is required.
    pub async fn prepared_exec(&mut self, conn: &C, args: &[Value]) -> Result<ExecResult> {
        require_args(args)?;
        let stmt = self.prepared_statement(conn).await?;
        log_sql(ExecKind::Prepared, stmt.sql(), args.len());
        conn.exec_prepared(stmt, args).await
    }

    /// Query with the held statement, compiling it first if needed.
    ///
    /// At least one argument is required.
    pub async fn prepared_query(&mut self, conn: &C, args: &[Value]) -> Result<QueryResult> {
        require_args(args)?;
        let stmt = self.prepared_statement(conn).await?;
        log_sql(ExecKind::Prepared, stmt.sql(), args.len());
        conn.query_prepared(stmt, args).await
    }

    /// Like [`Lifecycle::prepared_query`] but returns only the first row.
    pub async fn prepared_query_row(&mut self, conn: &C, args: &[Value]) -> Result<RowColumns> {
        first_row(self.prepared_query(conn, args).await?)
    }

    /// Close the held statement. No-op when none is held.
    ///
    /// Inside a transaction this returns to `InTransaction`; otherwise to `Idle`.
    pub fn prepare_close(&mut self) -> Result<()> {
        let from = self.state();
        let (stmt, next) = match std::mem::replace(&mut self.state, State::Idle) {
            State::Prepared(stmt) => (Some(stmt), State::Idle),
            State::PreparedInTransaction { tx, stmt } => (Some(stmt), State::InTransaction(tx)),
            other => (None, other),
        };
        self.state = next;

        match stmt {
            Some(stmt) => {
                log_transition(from.as_str(), self.state().as_str(), "prepare_close");
                stmt.close()
            }
            None => Ok(()),
        }
    }

    // ==================== Transactions ====================

    /// Open a transaction on `conn`.
    ///
    /// A statement prepared beforehand is carried into the transaction and
    /// runs on it from then on.
    pub async fn tx_begin(&mut self, conn: &C) -> Result<()> {
        self.ensure_no_transaction()?;
        let tx = conn.begin().await?;

        let from = self.state();
        self.state = match std::mem::replace(&mut self.state, State::Idle) {
            State::Prepared(stmt) => State::PreparedInTransaction { tx, stmt },
            _ => State::InTransaction(tx),
        };
        log_transition(from.as_str(), self.state().as_str(), "tx_begin");
        Ok(())
    }

    /// Compile the composer on the open transaction unless a statement is held.
    pub async fn tx_prepare(&mut self) -> Result<()> {
        let sql = match &self.state {
            State::InTransaction(_) => self.composer.render(true),
            State::PreparedInTransaction { .. } => return Ok(()),
            State::Idle | State::Prepared(_) => return Err(UsageError::NoTransaction.into()),
        };

        let State::InTransaction(tx) = &mut self.state else {
            return Err(UsageError::NoTransaction.into());
        };
        log_sql(ExecKind::TxPrepare, &sql, 0);
        let stmt = tx.prepare(&sql).await?;
        self.attach(stmt, "tx_prepare");
        Ok(())
    }

    async fn tx_statement(&mut self) -> Result<(&mut C::Transaction, &C::Statement)> {
        self.tx_prepare().await?;
        match &mut self.state {
            State::PreparedInTransaction { tx, stmt } => Ok((tx, &*stmt)),
            _ => Err(UsageError::NoTransaction.into()),
        }
    }

    /// Execute the transaction-scoped statement, compiling it first if needed.
    ///
    /// At least one argument is required.
    pub async fn tx_stmt_exec(&mut self, args: &[Value]) -> Result<ExecResult> {
        self.ensure_transaction()?;
        require_args(args)?;
        let (tx, stmt) = self.tx_statement().await?;
        log_sql(ExecKind::TxPrepared, stmt.sql(), args.len());
        tx.exec_prepared(stmt, args).await
    }

    /// Query with the transaction-scoped statement, compiling it first if needed.
    ///
    /// At least one argument is required.
    pub async fn tx_stmt_query(&mut self, args: &[Value]) -> Result<QueryResult> {
        self.ensure_transaction()?;
        require_args(args)?;
        let (tx, stmt) = self.tx_statement().await?;
        log_sql(ExecKind::TxPrepared, stmt.sql(), args.len());
        tx.query_prepared(stmt, args).await
    }

    fn transaction_mut(&mut self) -> Result<&mut C::Transaction> {
        match &mut self.state {
            State::InTransaction(tx) | State::PreparedInTransaction { tx, .. } => Ok(tx),
            State::Idle | State::Prepared(_) => Err(UsageError::NoTransaction.into()),
        }
    }

    /// Render for direct execution and run it on the open transaction.
    pub async fn tx_exec(&mut self, args: &[Value]) -> Result<ExecResult> {
        let sql = self.composer.render(false);
        let tx = self.transaction_mut()?;
        log_sql(ExecKind::TxDirect, &sql, args.len());
        tx.exec(&sql, args).await
    }

    /// Render for direct execution, run it on the open transaction and decode all rows.
    pub async fn tx_query(&mut self, args: &[Value]) -> Result<QueryResult> {
        let sql = self.composer.render(false);
        let tx = self.transaction_mut()?;
        log_sql(ExecKind::TxDirect, &sql, args.len());
        tx.query(&sql, args).await
    }

    /// Close the transaction-scoped statement. No-op when none is held.
    pub fn tx_prepare_close(&mut self) -> Result<()> {
        self.ensure_transaction()?;
        self.prepare_close()
    }

    /// Move the transaction out of the state, closing a scoped statement first.
    fn take_transaction(&mut self, op: &'static str) -> Result<C::Transaction> {
        let from = self.state();
        let tx = match std::mem::replace(&mut self.state, State::Idle) {
            State::InTransaction(tx) => tx,
            State::PreparedInTransaction { tx, stmt } => {
                if let Err(err) = stmt.close() {
                    log_close_failure(op, &err);
                }
                tx
            }
            other => {
                self.state = other;
                return Err(UsageError::NoTransaction.into());
            }
        };
        log_transition(from.as_str(), StateKind::Idle.as_str(), op);
        Ok(tx)
    }

    /// Commit the open transaction.
    ///
    /// The lifecycle is `Idle` afterwards even if the commit itself fails.
    pub async fn tx_commit(&mut self) -> Result<()> {
        let tx = self.take_transaction("tx_commit")?;
        tx.commit().await
    }

    /// Roll back the open transaction.
    ///
    /// The lifecycle is `Idle` afterwards even if the rollback itself fails.
    pub async fn tx_rollback(&mut self) -> Result<()> {
        let tx = self.take_transaction("tx_rollback")?;
        tx.rollback().await
    }
}

impl<C: Connection> Drop for Lifecycle<C> {
    fn drop(&mut self) {
        if let Err(err) = self.prepare_close() {
            log_close_failure("drop", &err);
        }
        if self.in_transaction() {
            tracing::warn!(
                target: "sqlfluent::lifecycle",
                "lifecycle dropped with an open transaction; the driver will roll it back"
            );
        }
    }
}
