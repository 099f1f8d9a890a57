//! `sqlx`-backed implementation of the driver traits.
//!
//! [`Database`] holds a driver-specific [`Pool`], so SQLite and MySQL each
//! report their own last insert id and hand back raw column values. Statements
//! compiled on the pool are plain SQL handles; `sqlx` caches the compiled form
//! per connection and recompiles transparently when a statement runs on a
//! connection that has not seen it yet.

use crate::client::{Connection, Statement, Transaction};
use crate::config::{Config, Driver};
use crate::error::{Error, Result};
use crate::pool::{Pool, create_pool_with_config, scheme_driver};
use crate::result::{ExecResult, QueryResult};
use crate::row::{decode_mysql_rows, decode_sqlite_rows};
use crate::value::Value;
use sqlx::Statement as _;
use sqlx::mysql::{MySql, MySqlStatement};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteStatement};
use sqlx::{Encode, Type};
use std::fmt;

type DbQuery<'q, DB> = Query<'q, DB, <DB as sqlx::Database>::Arguments<'q>>;

fn bind_value<'q, DB>(query: DbQuery<'q, DB>, value: &Value) -> DbQuery<'q, DB>
where
    DB: sqlx::Database,
    Option<String>: Encode<'q, DB> + Type<DB>,
    bool: Encode<'q, DB> + Type<DB>,
    i64: Encode<'q, DB> + Type<DB>,
    f64: Encode<'q, DB> + Type<DB>,
    String: Encode<'q, DB> + Type<DB>,
    Vec<u8>: Encode<'q, DB> + Type<DB>,
{
    match value {
        Value::Null => query.bind(Option::<String>::None),
        Value::Bool(v) => query.bind(*v),
        Value::Int(v) => query.bind(*v),
        Value::Float(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Bytes(v) => query.bind(v.clone()),
    }
}

fn bind_sqlite<'q>(query: DbQuery<'q, Sqlite>, args: &[Value]) -> DbQuery<'q, Sqlite> {
    args.iter().fold(query, bind_value)
}

fn bind_mysql<'q>(query: DbQuery<'q, MySql>, args: &[Value]) -> DbQuery<'q, MySql> {
    args.iter().fold(query, bind_value)
}

fn foreign_statement(stmt: &SqlxStatement) -> Error {
    Error::connection(format!(
        "statement was prepared for another driver: {}",
        stmt.sql().trim()
    ))
}

/// A pooled database handle.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Open a database by driver name (`"sqlite3"`, `"sqlite"` or `"mysql"`)
    /// and connection URL.
    ///
    /// The URL scheme must name the same driver. An in-memory SQLite URL gets
    /// a single connection, since every connection would otherwise see its own
    /// empty database.
    pub async fn open(driver: &str, dsn: &str) -> Result<Self> {
        let driver: Driver = driver.parse()?;
        let scheme = scheme_driver(dsn)?;
        if scheme != driver {
            return Err(Error::connection(format!(
                "driver {driver} cannot open a {scheme} url"
            )));
        }
        let max_connections = match driver {
            Driver::Sqlite if dsn.contains(":memory:") => 1,
            _ => crate::config::DEFAULT_MAX_CONNECTIONS,
        };
        Self::open_with(dsn, max_connections).await
    }

    /// Open a database described by `config`.
    pub async fn connect(config: &Config) -> Result<Self> {
        let driver = config.driver()?;
        let dsn = config.dsn()?;
        let max_connections = match driver {
            Driver::Sqlite if dsn.contains(":memory:") => 1,
            _ => config.max_connections,
        };
        Self::open_with(&dsn, max_connections).await
    }

    async fn open_with(dsn: &str, max_connections: u32) -> Result<Self> {
        let pool = create_pool_with_config(dsn, max_connections).await?;
        tracing::debug!(
            target: "sqlfluent::lifecycle",
            driver = pool.driver().as_str(),
            max_connections,
            "database opened"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: impl Into<Pool>) -> Self {
        Self { pool: pool.into() }
    }

    pub fn driver(&self) -> Driver {
        self.pool.driver()
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Close every pooled connection and wait for them to shut down.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// A statement compiled through `sqlx`.
pub enum SqlxStatement {
    Sqlite(SqliteStatement<'static>),
    Mysql(MySqlStatement<'static>),
}

impl fmt::Debug for SqlxStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SqlxStatement::Sqlite(_) => "Sqlite",
            SqlxStatement::Mysql(_) => "Mysql",
        };
        f.debug_tuple(name).field(&self.sql()).finish()
    }
}

impl Statement for SqlxStatement {
    fn sql(&self) -> &str {
        match self {
            SqlxStatement::Sqlite(stmt) => stmt.sql(),
            SqlxStatement::Mysql(stmt) => stmt.sql(),
        }
    }

    fn close(self) -> Result<()> {
        // sqlx keeps compiled statements in the connection cache; releasing
        // the handle is all that is needed here.
        drop(self);
        Ok(())
    }
}

/// An open `sqlx` transaction.
///
/// Dropping it without commit rolls back.
#[derive(Debug)]
pub enum SqlxTransaction {
    Sqlite(sqlx::Transaction<'static, Sqlite>),
    Mysql(sqlx::Transaction<'static, MySql>),
}

impl Connection for Database {
    type Statement = SqlxStatement;
    type Transaction = SqlxTransaction;

    async fn exec(&self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        let done = match &self.pool {
            Pool::Sqlite(pool) => bind_sqlite(sqlx::query(sql), args).execute(pool).await?.into(),
            Pool::Mysql(pool) => bind_mysql(sqlx::query(sql), args).execute(pool).await?.into(),
        };
        Ok(done)
    }

    async fn query(&self, sql: &str, args: &[Value]) -> Result<QueryResult> {
        match &self.pool {
            Pool::Sqlite(pool) => {
                let rows = bind_sqlite(sqlx::query(sql), args).fetch_all(pool).await?;
                decode_sqlite_rows(&rows)
            }
            Pool::Mysql(pool) => {
                let rows = bind_mysql(sqlx::query(sql), args).fetch_all(pool).await?;
                decode_mysql_rows(&rows)
            }
        }
    }

    async fn prepare(&self, sql: &str) -> Result<SqlxStatement> {
        let stmt = match &self.pool {
            Pool::Sqlite(pool) => {
                let stmt = sqlx::Executor::prepare(pool, sql).await?;
                SqlxStatement::Sqlite(sqlx::Statement::to_owned(&stmt))
            }
            Pool::Mysql(pool) => {
                let stmt = sqlx::Executor::prepare(pool, sql).await?;
                SqlxStatement::Mysql(sqlx::Statement::to_owned(&stmt))
            }
        };
        Ok(stmt)
    }

    async fn exec_prepared(&self, stmt: &SqlxStatement, args: &[Value]) -> Result<ExecResult> {
        let done = match (&self.pool, stmt) {
            (Pool::Sqlite(pool), SqlxStatement::Sqlite(s)) => {
                bind_sqlite(s.query(), args).execute(pool).await?.into()
            }
            (Pool::Mysql(pool), SqlxStatement::Mysql(s)) => {
                bind_mysql(s.query(), args).execute(pool).await?.into()
            }
            _ => return Err(foreign_statement(stmt)),
        };
        Ok(done)
    }

    async fn query_prepared(&self, stmt: &SqlxStatement, args: &[Value]) -> Result<QueryResult> {
        match (&self.pool, stmt) {
            (Pool::Sqlite(pool), SqlxStatement::Sqlite(s)) => {
                let rows = bind_sqlite(s.query(), args).fetch_all(pool).await?;
                decode_sqlite_rows(&rows)
            }
            (Pool::Mysql(pool), SqlxStatement::Mysql(s)) => {
                let rows = bind_mysql(s.query(), args).fetch_all(pool).await?;
                decode_mysql_rows(&rows)
            }
            _ => Err(foreign_statement(stmt)),
        }
    }

    async fn begin(&self) -> Result<SqlxTransaction> {
        let tx = match &self.pool {
            Pool::Sqlite(pool) => SqlxTransaction::Sqlite(pool.begin().await?),
            Pool::Mysql(pool) => SqlxTransaction::Mysql(pool.begin().await?),
        };
        Ok(tx)
    }
}

impl Transaction for SqlxTransaction {
    type Statement = SqlxStatement;

    async fn exec(&mut self, sql: &str, args: &[Value]) -> Result<ExecResult> {
        let done = match self {
            SqlxTransaction::Sqlite(tx) => {
                bind_sqlite(sqlx::query(sql), args).execute(&mut **tx).await?.into()
            }
            SqlxTransaction::Mysql(tx) => {
                bind_mysql(sqlx::query(sql), args).execute(&mut **tx).await?.into()
            }
        };
        Ok(done)
    }

    async fn query(&mut self, sql: &str, args: &[Value]) -> Result<QueryResult> {
        match self {
            SqlxTransaction::Sqlite(tx) => {
                let rows = bind_sqlite(sqlx::query(sql), args).fetch_all(&mut **tx).await?;
                decode_sqlite_rows(&rows)
            }
            SqlxTransaction::Mysql(tx) => {
                let rows = bind_mysql(sqlx::query(sql), args).fetch_all(&mut **tx).await?;
                decode_mysql_rows(&rows)
            }
        }
    }

    async fn prepare(&mut self, sql: &str) -> Result<SqlxStatement> {
        let stmt = match self {
            SqlxTransaction::Sqlite(tx) => {
                let stmt = sqlx::Executor::prepare(&mut **tx, sql).await?;
                SqlxStatement::Sqlite(sqlx::Statement::to_owned(&stmt))
            }
            SqlxTransaction::Mysql(tx) => {
                let stmt = sqlx::Executor::prepare(&mut **tx, sql).await?;
                SqlxStatement::Mysql(sqlx::Statement::to_owned(&stmt))
            }
        };
        Ok(stmt)
    }

    async fn exec_prepared(&mut self, stmt: &SqlxStatement, args: &[Value]) -> Result<ExecResult> {
        let done = match (self, stmt) {
            (SqlxTransaction::Sqlite(tx), SqlxStatement::Sqlite(s)) => {
                bind_sqlite(s.query(), args).execute(&mut **tx).await?.into()
            }
            (SqlxTransaction::Mysql(tx), SqlxStatement::Mysql(s)) => {
                bind_mysql(s.query(), args).execute(&mut **tx).await?.into()
            }
            _ => return Err(foreign_statement(stmt)),
        };
        Ok(done)
    }

    async fn query_prepared(&mut self, stmt: &SqlxStatement, args: &[Value]) -> Result<QueryResult> {
        match (self, stmt) {
            (SqlxTransaction::Sqlite(tx), SqlxStatement::Sqlite(s)) => {
                let rows = bind_sqlite(s.query(), args).fetch_all(&mut **tx).await?;
                decode_sqlite_rows(&rows)
            }
            (SqlxTransaction::Mysql(tx), SqlxStatement::Mysql(s)) => {
                let rows = bind_mysql(s.query(), args).fetch_all(&mut **tx).await?;
                decode_mysql_rows(&rows)
            }
            _ => Err(foreign_statement(stmt)),
        }
    }

    async fn commit(self) -> Result<()> {
        match self {
            SqlxTransaction::Sqlite(tx) => tx.commit().await,
            SqlxTransaction::Mysql(tx) => tx.commit().await,
        }
        .map_err(Error::from)
    }

    async fn rollback(self) -> Result<()> {
        match self {
            SqlxTransaction::Sqlite(tx) => tx.rollback().await,
            SqlxTransaction::Mysql(tx) => tx.rollback().await,
        }
        .map_err(Error::from)
    }
}
