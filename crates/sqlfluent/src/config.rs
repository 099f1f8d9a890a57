//! Connection configuration.
//!
//! ```ignore
//! use sqlfluent::{Config, Database};
//!
//! let config = Config::new()
//!     .with_driver("mysql")
//!     .with_addr("127.0.0.1:3306")
//!     .with_user("root")
//!     .with_pass("secret")
//!     .with_db_name("test")
//!     .with_params("charset=utf8mb4");
//!
//! let db = Database::connect(&config).await?;
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Default pool size used by [`crate::create_pool`] and [`Config`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 16;

const DEFAULT_MYSQL_ADDR: &str = "127.0.0.1:3306";

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Sqlite,
    Mysql,
}

impl Driver {
    pub fn as_str(self) -> &'static str {
        match self {
            Driver::Sqlite => "sqlite3",
            Driver::Mysql => "mysql",
        }
    }
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "sqlite3" | "sqlite" => Ok(Driver::Sqlite),
            "mysql" => Ok(Driver::Mysql),
            other => Err(Error::connection(format!("unknown db driver: {other}"))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings needed to open a [`crate::Database`].
///
/// `addr` means `host:port` (or a socket path with protocol `unix`) for
/// MySQL, and a file path or `:memory:` for SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub driver: String,
    pub addr: String,
    pub user: String,
    pub pass: String,
    pub db_name: String,
    /// `tcp` (default) or `unix`; MySQL only.
    pub protocol: String,
    /// Extra `key=value&...` connection parameters; MySQL only.
    pub params: String,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: Driver::Sqlite.as_str().to_string(),
            addr: ":memory:".to_string(),
            user: String::new(),
            pass: String::new(),
            db_name: String::new(),
            protocol: String::new(),
            params: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `SQLFLUENT_*` environment variables on top of the defaults.
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let fields: [(&str, &mut String); 7] = [
            ("SQLFLUENT_DRIVER", &mut config.driver),
            ("SQLFLUENT_ADDR", &mut config.addr),
            ("SQLFLUENT_USER", &mut config.user),
            ("SQLFLUENT_PASS", &mut config.pass),
            ("SQLFLUENT_DB_NAME", &mut config.db_name),
            ("SQLFLUENT_PROTOCOL", &mut config.protocol),
            ("SQLFLUENT_PARAMS", &mut config.params),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(raw) = lookup("SQLFLUENT_MAX_CONNECTIONS") {
            config.max_connections = raw.trim().parse().map_err(|_| {
                Error::config(format!("SQLFLUENT_MAX_CONNECTIONS is not a number: {raw}"))
            })?;
        }
        Ok(config)
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_pass(mut self, pass: impl Into<String>) -> Self {
        self.pass = pass.into();
        self
    }

    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_params(mut self, params: impl Into<String>) -> Self {
        self.params = params.into();
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Parse the driver name.
    pub fn driver(&self) -> Result<Driver> {
        self.driver.parse()
    }

    /// Build the connection URL understood by the `sqlx` driver.
    pub fn dsn(&self) -> Result<String> {
        if self.max_connections == 0 {
            return Err(Error::config("max_connections must be at least 1"));
        }
        match self.driver()? {
            Driver::Sqlite => Ok(sqlite_dsn(&self.addr)),
            Driver::Mysql => self.mysql_dsn(),
        }
    }

    fn mysql_dsn(&self) -> Result<String> {
        let protocol = match self.protocol.trim() {
            "" | "tcp" => "tcp",
            "unix" => "unix",
            other => return Err(Error::config(format!("unsupported protocol: {other}"))),
        };

        let host = match protocol {
            "unix" => "localhost",
            _ if self.addr.is_empty() || self.addr == ":memory:" => DEFAULT_MYSQL_ADDR,
            _ => self.addr.as_str(),
        };

        let mut url = Url::parse(&format!("mysql://{host}/"))
            .map_err(|e| Error::config(format!("invalid mysql address {host:?}: {e}")))?;
        url.set_path(&self.db_name);

        if !self.user.is_empty() {
            url.set_username(&self.user)
                .map_err(|_| Error::config("cannot set user on mysql url"))?;
        }
        if !self.pass.is_empty() {
            url.set_password(Some(&self.pass))
                .map_err(|_| Error::config("cannot set password on mysql url"))?;
        }

        let mut query = String::new();
        if protocol == "unix" {
            query.push_str("socket=");
            query.extend(url::form_urlencoded::byte_serialize(self.addr.as_bytes()));
        }
        let params = self.params.trim_start_matches('?');
        if !params.is_empty() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(params);
        }
        if !query.is_empty() {
            url.set_query(Some(query.as_str()));
        }

        Ok(url.to_string())
    }
}

fn sqlite_dsn(addr: &str) -> String {
    match addr {
        "" | ":memory:" => "sqlite::memory:".to_string(),
        a if a.starts_with("sqlite:") => a.to_string(),
        path => format!("sqlite://{path}?mode=rwc"),
    }
}
