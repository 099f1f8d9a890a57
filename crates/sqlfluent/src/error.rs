//! Error types for sqlfluent

use thiserror::Error;

/// Result type alias for sqlfluent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for composing and executing statements
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was invoked outside the lifecycle state it requires
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// Error reported by the database driver, passed through unchanged
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unknown driver or unusable connection string
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),
}

/// Client-side misuse of the statement lifecycle.
///
/// These are reported before anything is sent to the database, so a usage
/// error never leaves a partially applied operation behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    /// A `tx_*` operation was called without an open transaction.
    #[error("no transaction in progress")]
    NoTransaction,

    /// A transaction is already open on this statement.
    #[error("a transaction is already in progress")]
    TransactionOpen,

    /// A prepared execution was called with zero bound arguments.
    #[error("no arguments supplied")]
    NoArguments,
}

impl Error {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a lifecycle usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// The usage error kind, if this is one
    pub fn usage_kind(&self) -> Option<UsageError> {
        match self {
            Self::Usage(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
