//! Connection pool utilities

use crate::config::{DEFAULT_MAX_CONNECTIONS, Driver};
use crate::error::{Error, Result};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// A driver-specific `sqlx` pool.
#[derive(Debug, Clone)]
pub enum Pool {
    Sqlite(SqlitePool),
    Mysql(MySqlPool),
}

impl Pool {
    pub fn driver(&self) -> Driver {
        match self {
            Pool::Sqlite(_) => Driver::Sqlite,
            Pool::Mysql(_) => Driver::Mysql,
        }
    }

    pub fn max_connections(&self) -> u32 {
        match self {
            Pool::Sqlite(pool) => pool.options().get_max_connections(),
            Pool::Mysql(pool) => pool.options().get_max_connections(),
        }
    }

    /// Close every pooled connection and wait for them to shut down.
    pub async fn close(&self) {
        match self {
            Pool::Sqlite(pool) => pool.close().await,
            Pool::Mysql(pool) => pool.close().await,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Pool::Sqlite(pool) => pool.is_closed(),
            Pool::Mysql(pool) => pool.is_closed(),
        }
    }
}

impl From<SqlitePool> for Pool {
    fn from(pool: SqlitePool) -> Self {
        Pool::Sqlite(pool)
    }
}

impl From<MySqlPool> for Pool {
    fn from(pool: MySqlPool) -> Self {
        Pool::Mysql(pool)
    }
}

/// Create a connection pool from a database URL.
///
/// The URL scheme picks the driver (`sqlite:` or `mysql:`). One connection is
/// opened up front so an unreachable database fails here rather than on the
/// first statement.
///
/// # Example
///
/// ```ignore
/// let pool = sqlfluent::create_pool("sqlite:///tmp/foo.db?mode=rwc").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<Pool> {
    create_pool_with_config(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a connection pool with a custom connection limit
pub async fn create_pool_with_config(database_url: &str, max_connections: u32) -> Result<Pool> {
    if max_connections == 0 {
        return Err(Error::config("max_connections must be at least 1"));
    }

    let pool = match scheme_driver(database_url)? {
        Driver::Sqlite => SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?
            .into(),
        Driver::Mysql => MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?
            .into(),
    };
    Ok(pool)
}

/// The driver named by the URL scheme.
pub(crate) fn scheme_driver(database_url: &str) -> Result<Driver> {
    match database_url.split_once(':') {
        Some(("sqlite", _)) => Ok(Driver::Sqlite),
        Some(("mysql", _)) => Ok(Driver::Mysql),
        Some((scheme, _)) => Err(Error::connection(format!("unknown db driver: {scheme}"))),
        None => Err(Error::connection(format!(
            "database url has no scheme: {database_url}"
        ))),
    }
}
