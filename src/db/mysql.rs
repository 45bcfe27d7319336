//! MySQL database client.
//!
//! Executes candidate SQL against the telemetry database. Every call opens a
//! fresh connection and closes it before returning; the chat loop is
//! request-at-a-time, so pooling buys nothing here.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Executor, Row as _, Statement, TypeInfo};
use tracing::debug;

use super::{ColumnInfo, DatabaseClient, Row, Table, Value};
use crate::config::ConnectionConfig;
use crate::error::{DocksideError, Result};

/// MySQL client that connects per query.
#[derive(Debug)]
pub struct MySqlClient {
    options: MySqlConnectOptions,
    display: String,
}

impl MySqlClient {
    /// Creates a client for the given connection configuration.
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let database = config
            .database
            .as_deref()
            .ok_or_else(|| DocksideError::config("Database name is required"))?;

        let mut options = MySqlConnectOptions::new()
            .host(config.host.as_deref().unwrap_or("localhost"))
            .port(config.port)
            .database(database);

        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        Ok(Self {
            options,
            display: config.display_string(),
        })
    }

    /// Opens a fresh connection.
    async fn open(&self) -> Result<MySqlConnection> {
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| {
                DocksideError::connection(format!("Cannot connect to {}: {e}", self.display))
            })
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
    async fn execute_query(&self, sql: &str) -> Result<Table> {
        let mut conn = self.open().await?;
        debug!(sql, "Executing query");

        let rows = sqlx::query(sql)
            .fetch_all(&mut conn)
            .await
            .map_err(|e| DocksideError::query(e.to_string()))?;

        let columns = match rows.first() {
            Some(row) => row
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            // No rows: recover column metadata from the prepared statement so
            // an empty result still carries its shape.
            None => fetch_column_metadata(&mut conn, sql).await.unwrap_or_default(),
        };

        let converted: Vec<Row> = rows.iter().map(convert_row).collect();
        let row_count = converted.len();

        conn.close()
            .await
            .map_err(|e| DocksideError::connection(format!("Failed to close connection: {e}")))?;

        debug!(row_count, column_count = columns.len(), "Query finished");
        Ok(Table::new(columns, converted))
    }
}

/// Fetches column metadata for a statement that returned no rows.
async fn fetch_column_metadata(conn: &mut MySqlConnection, sql: &str) -> Result<Vec<ColumnInfo>> {
    let statement = conn
        .prepare(sql)
        .await
        .map_err(|e| DocksideError::query(e.to_string()))?;

    Ok(statement
        .columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
        .collect())
}

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" | "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "YEAR" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row
            .try_get::<Option<u64>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        // AVG() and friends come back as DECIMAL.
        "DECIMAL" | "NEWDECIMAL" => row
            .try_get::<Option<Decimal>, _>(index)
            .ok()
            .flatten()
            .and_then(|d| d.to_f64())
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "DATETIME" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),

        "TIMESTAMP" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|dt| Value::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
            .unwrap_or(Value::Null),

        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),

        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)
            .ok()
            .flatten()
            .map(|t| Value::String(t.format("%H:%M:%S").to_string()))
            .unwrap_or(Value::Null),

        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // CHAR, VARCHAR, TEXT, ENUM and anything else textual.
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
