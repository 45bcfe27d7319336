//! Mock database client for testing.
//!
//! Serves canned results for a seeded `armada` telemetry table so the chat
//! pipeline can be exercised without a MySQL server.

use async_trait::async_trait;

use super::{ColumnInfo, DatabaseClient, Table, Value};
use crate::error::{DocksideError, Result};

/// A mock database client with a small seeded telemetry dataset.
pub struct MockDatabaseClient {
    /// Custom results (uppercased SQL pattern -> result), checked first.
    canned: Vec<(String, Result<Table>)>,
}

impl MockDatabaseClient {
    /// Creates a new mock client over the seeded dataset.
    pub fn new() -> Self {
        Self { canned: Vec::new() }
    }

    /// Returns `table` for statements containing `pattern` (case-insensitive).
    pub fn with_result(mut self, pattern: impl Into<String>, table: Table) -> Self {
        self.canned
            .push((pattern.into().to_uppercase(), Ok(table)));
        self
    }

    /// Fails statements containing `pattern` with the given error text.
    pub fn with_failure(mut self, pattern: impl Into<String>, cause: impl Into<String>) -> Self {
        self.canned
            .push((pattern.into().to_uppercase(), Err(DocksideError::query(cause.into()))));
        self
    }

    /// The seeded telemetry table, in insertion order.
    pub fn seed_table() -> Table {
        let columns = vec![
            ColumnInfo::new("tiempo", "DATETIME"),
            ColumnInfo::new("tiemposuministro", "TIME"),
            ColumnInfo::new("caudal", "DOUBLE"),
            ColumnInfo::new("presion", "DOUBLE"),
            ColumnInfo::new("muellenum", "INT"),
        ];

        let rows = vec![
            seed_row("2024-12-01 08:00:00", "01:30:00", 48.0, 148.0, 1),
            seed_row("2024-12-01 11:00:00", "02:00:00", 52.0, 151.0, 2),
            seed_row("2024-12-02 07:30:00", "01:45:00", 50.0, 149.5, 1),
            seed_row("2024-12-02 13:00:00", "02:15:00", 55.0, 152.0, 3),
            seed_row("2024-12-03 09:00:00", "01:20:00", 47.5, 147.0, 2),
            seed_row("2024-12-03 16:00:00", "02:05:00", 53.0, 150.0, 3),
            seed_row("2024-12-04 08:15:00", "01:50:00", 49.0, 148.5, 1),
            seed_row("2024-12-04 14:30:00", "02:10:00", 54.0, 151.5, 2),
            seed_row("2024-12-05 07:45:00", "01:40:00", 51.0, 149.0, 3),
            seed_row("2024-12-05 12:00:00", "01:55:00", 50.5, 150.5, 1),
        ];

        Table::new(columns, rows)
    }

    /// Mean caudal per dock over the seed, sorted by dock.
    fn average_flow_per_dock() -> Table {
        let seed = Self::seed_table();
        let mut sums: std::collections::BTreeMap<i64, (f64, usize)> =
            std::collections::BTreeMap::new();

        for row in &seed.rows {
            let dock = match row[4] {
                Value::Int(d) => d,
                _ => continue,
            };
            let caudal = row[2].as_f64().unwrap_or(0.0);
            let entry = sums.entry(dock).or_insert((0.0, 0));
            entry.0 += caudal;
            entry.1 += 1;
        }

        let columns = vec![
            ColumnInfo::new("muellenum", "INT"),
            ColumnInfo::new("caudal_promedio", "DECIMAL"),
        ];
        let rows = sums
            .into_iter()
            .map(|(dock, (sum, n))| vec![Value::Int(dock), Value::Float(sum / n as f64)])
            .collect();

        Table::new(columns, rows)
    }

    /// Projects (tiempo, caudal, presion) from the seed.
    fn flow_and_pressure_over_time() -> Table {
        let seed = Self::seed_table();
        let columns = vec![
            ColumnInfo::new("tiempo", "DATETIME"),
            ColumnInfo::new("caudal", "DOUBLE"),
            ColumnInfo::new("presion", "DOUBLE"),
        ];
        let rows = seed
            .rows
            .iter()
            .map(|row| vec![row[0].clone(), row[2].clone(), row[3].clone()])
            .collect();

        Table::new(columns, rows)
    }
}

fn seed_row(tiempo: &str, suministro: &str, caudal: f64, presion: f64, dock: i64) -> Vec<Value> {
    vec![
        Value::String(tiempo.to_string()),
        Value::String(suministro.to_string()),
        Value::Float(caudal),
        Value::Float(presion),
        Value::Int(dock),
    ]
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<Table> {
        let sql_upper = sql.to_uppercase();

        for (pattern, result) in &self.canned {
            if sql_upper.contains(pattern) {
                return match result {
                    Ok(table) => Ok(table.clone()),
                    Err(e) => Err(DocksideError::query(e.to_string())),
                };
            }
        }

        if !sql_upper.trim_start().starts_with("SELECT") {
            return Err(DocksideError::query(format!(
                "You have an error in your SQL syntax near '{}'",
                sql.chars().take(32).collect::<String>()
            )));
        }

        if sql_upper.contains("WHERE 1 = 0") || sql_upper.contains("MUELLENUM = 99") {
            let mut empty = Self::seed_table();
            empty.rows.clear();
            return Ok(empty);
        }

        if sql_upper.contains("AVG(CAUDAL)") {
            return Ok(Self::average_flow_per_dock());
        }

        if sql_upper.contains("TIEMPO, CAUDAL, PRESION") {
            return Ok(Self::flow_and_pressure_over_time());
        }

        let mut table = Self::seed_table();
        if let Some(limit) = parse_limit(&sql_upper) {
            table.rows.truncate(limit);
        }
        Ok(table)
    }
}

/// Extracts a trailing `LIMIT n` from an uppercased statement.
fn parse_limit(sql_upper: &str) -> Option<usize> {
    let idx = sql_upper.rfind("LIMIT")?;
    sql_upper[idx + "LIMIT".len()..]
        .trim()
        .trim_end_matches(';')
        .trim()
        .parse()
        .ok()
}
