//! Database abstraction layer for dockside.
//!
//! Provides a trait-based interface for query execution, allowing the MySQL
//! backend and the in-memory mock to be used interchangeably.

mod mock;
mod mysql;
mod types;

pub use mock::MockDatabaseClient;
pub use mysql::MySqlClient;
pub use types::{ColumnInfo, QueryOutcome, Row, Table, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// `execute_query` returns `Err` for database-level failures; the executor in
/// [`crate::query`] is the boundary that folds errors into a tagged outcome.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a SQL statement and materializes the full result set.
    ///
    /// Opens a fresh connection for the call and closes it before returning on
    /// the success path. No pooling, no transactions.
    async fn execute_query(&self, sql: &str) -> Result<Table>;
}

/// Creates the MySQL database client for the given configuration.
pub fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    Ok(Box::new(MySqlClient::new(config.clone())?))
}
