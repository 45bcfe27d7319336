//! Query execution boundary.
//!
//! Wraps a database client and folds every execution into the tagged
//! three-way [`QueryOutcome`], so no database error ever propagates past this
//! point. Isolated here so it can be tested independently of the orchestrator.

use std::time::Instant;

use tracing::debug;

use crate::db::{DatabaseClient, QueryOutcome};

/// Executes candidate SQL statements against a database client.
pub struct Executor<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> Executor<'a> {
    /// Creates a new executor.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Runs one candidate statement and classifies the result.
    pub async fn execute(&self, sql: &str) -> QueryOutcome {
        let start = Instant::now();
        let result = self.db.execute_query(sql).await;
        let elapsed = start.elapsed();

        match result {
            Ok(table) => {
                debug!(
                    rows = table.row_count(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Query succeeded"
                );
                QueryOutcome::from_table(table)
            }
            Err(e) => {
                debug!(
                    cause = %e,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Query failed"
                );
                QueryOutcome::Failed {
                    cause: e.to_string(),
                }
            }
        }
    }
}
