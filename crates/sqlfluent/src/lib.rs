//! # sqlfluent
//!
//! An order-independent fluent SQL composer with a prepared statement and
//! transaction lifecycle on top.
//!
//! ## Features
//!
//! - **Order-independent composition**: set clauses in any order; they always
//!   render in SQL order (action, target, values, join, filters, grouping,
//!   having, ordering, pagination)
//! - **Ordered filters**: `where_`/`and`/`or` terms keep their call order
//! - **Explicit lifecycle**: at most one prepared statement and one
//!   transaction per [`Lifecycle`], tracked in a state enum
//! - **Uniform results**: rows come back as column-name → text maps, with
//!   `"NULL"` for SQL `NULL`
//! - **SQLite and MySQL** through `sqlx`
//!
//! ## Composer
//!
//! ```ignore
//! use sqlfluent::Composer;
//!
//! let mut q = Composer::new();
//! q.select("*")
//!     .from("test_temp")
//!     .where_("id").eq("30000")
//!     .and("id").gt("40000")
//!     .or("title").neq("title_01")
//!     .limit(100, 20);
//!
//! // SELECT *  FROM `test_temp`  WHERE id   = "30000"   AND id   > "40000"   OR title   != "title_01"  LIMIT 100,20
//! println!("{}", q.sql());
//! ```
//!
//! ## Lifecycle
//!
//! ```ignore
//! use sqlfluent::{Database, Lifecycle, args};
//!
//! let db = Database::open("sqlite3", "sqlite:///tmp/foo.db?mode=rwc").await?;
//! let mut stmt = Lifecycle::<Database>::new();
//!
//! stmt.select("*").from("foo").where_("id").gt("?").limit_raw("?,?");
//! let page = stmt.prepared_query(&db, &args![0, 0, 10]).await?;
//! for row in &page.data {
//!     println!("{} {}", row["id"], row["name"]);
//! }
//! stmt.prepare_close()?;
//! ```

pub mod client;
pub mod composer;
pub mod config;
pub mod database;
pub mod error;
pub mod lifecycle;
pub mod monitor;
pub mod pool;
pub mod result;
mod row;
pub mod value;

pub use client::{Connection, Statement, Transaction};
pub use composer::{Category, Clause, Composer, Connector, FilterTerm, Op};
pub use config::{Config, Driver};
pub use database::{Database, SqlxStatement, SqlxTransaction};
pub use error::{Error, Result, UsageError};
pub use lifecycle::{Lifecycle, StateKind};
pub use monitor::QueryType;
pub use pool::{Pool, create_pool, create_pool_with_config};
pub use result::{ExecResult, NULL_TEXT, QueryResult, RowColumns};
pub use value::Value;
