//! Query result types for dockside.
//!
//! Defines the structures used to represent query results, including the
//! tagged three-way outcome that keeps "no rows" and "query failed" apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A materialized, non-streaming result table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Column metadata for the result set.
    pub columns: Vec<ColumnInfo>,

    /// Rows of data, in result order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates a table with the given columns and rows.
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Returns true if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Serializes the table as aligned plain text.
    ///
    /// Used when a result is embedded into a model-facing prompt and as the
    /// fallback textual form of a table transcript turn.
    pub fn format_plain(&self) -> String {
        if self.columns.is_empty() {
            return String::from("(no columns)");
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.name.len()).collect();
        let rendered_rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let text = value.to_display_string();
                        if i < widths.len() && text.len() > widths[i] {
                            widths[i] = text.len();
                        }
                        text
                    })
                    .collect()
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c.name, width = widths[i]))
            .collect();
        out.push_str(&header.join(" | "));
        out.push('\n');
        out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-"));

        for row in rendered_rows {
            out.push('\n');
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, text)| format!("{:<width$}", text, width = widths.get(i).copied().unwrap_or(0)))
                .collect();
            out.push_str(cells.join(" | ").trim_end());
        }

        out
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A row of data from a query result.
pub type Row = Vec<Value>;

/// Represents a single value from a database query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),

    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as f64 when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Converts the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }

    /// Total ordering used when sorting chart inputs.
    ///
    /// Numeric values compare numerically; everything else falls back to its
    /// display form. NULL sorts first.
    pub fn sort_cmp(&self, other: &Value) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => match (self.is_null(), other.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => self.to_display_string().cmp(&other.to_display_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// The outcome of executing one candidate SQL statement.
///
/// The three cases stay distinguishable by construction; an empty result is
/// never a failure and a failure is never a table.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The query succeeded and returned at least one row.
    Rows(Table),

    /// The query succeeded but returned no rows.
    Empty {
        /// Column names from the statement metadata, when available.
        columns: Vec<String>,
    },

    /// The query raised a database error.
    Failed {
        /// The database error text, surfaced for logging and retry context.
        cause: String,
    },
}

impl QueryOutcome {
    /// Classifies a successful result table into `Rows` or `Empty`.
    pub fn from_table(table: Table) -> Self {
        if table.is_empty() {
            Self::Empty {
                columns: table.column_names(),
            }
        } else {
            Self::Rows(table)
        }
    }

    /// Returns true if the query returned at least one row.
    pub fn has_rows(&self) -> bool {
        matches!(self, Self::Rows(_))
    }
}
