//! Chart selection.
//!
//! Picks a chart for a result table based on its column count: two columns
//! become a bar chart of per-group means, three columns become a pair of line
//! series over the sorted first column. Any other shape is a user-visible
//! error. Selection is pure; drawing lives in [`crate::ui::render`].

use crate::db::{Table, Value};
use crate::error::{DocksideError, Result};

/// A selected chart, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Bar chart of the mean of column 2 per distinct value of column 1,
    /// groups sorted ascending by key.
    Bar {
        /// Name of the grouping column (x axis).
        x_label: String,
        /// Name of the aggregated column (y axis).
        y_label: String,
        /// (group key, mean) pairs in ascending key order.
        bars: Vec<(String, f64)>,
    },

    /// Two line series over the sorted first column.
    Lines {
        /// Name of the x column.
        x_label: String,
        /// The two series, in column order.
        series: [LineSeries; 2],
    },
}

/// One line series for a three-column table.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Name of the y column.
    pub name: String,
    /// (x, y) points in ascending x order.
    pub points: Vec<(f64, f64)>,
    /// Display labels for the first and last x values.
    pub x_bounds_labels: (String, String),
}

impl ChartSpec {
    /// Selects a chart for the given table.
    ///
    /// Fails with a chart error when the table is empty, has a column count
    /// outside {2, 3}, or its value columns are not numeric.
    pub fn from_table(table: &Table) -> Result<Self> {
        if table.is_empty() {
            return Err(DocksideError::chart("The result table is empty."));
        }

        match table.columns.len() {
            2 => Self::bar_from(table),
            3 => Self::lines_from(table),
            n => Err(DocksideError::chart(format!(
                "The result must have 2 or 3 columns to chart, got {n}."
            ))),
        }
    }

    fn bar_from(table: &Table) -> Result<Self> {
        let x_label = table.columns[0].name.clone();
        let y_label = table.columns[1].name.clone();

        // Accumulate per distinct group key, keeping the key Value for sorting.
        let mut groups: Vec<(Value, Vec<f64>)> = Vec::new();
        for row in &table.rows {
            let key = &row[0];
            let value = match &row[1] {
                Value::Null => continue,
                v => v.as_f64().ok_or_else(|| {
                    DocksideError::chart(format!(
                        "Column `{y_label}` is not numeric; cannot chart it."
                    ))
                })?,
            };

            match groups.iter_mut().find(|(k, _)| k == key) {
                Some((_, values)) => values.push(value),
                None => groups.push((key.clone(), vec![value])),
            }
        }

        if groups.is_empty() {
            return Err(DocksideError::chart(format!(
                "Column `{y_label}` has no numeric values to chart."
            )));
        }

        groups.sort_by(|(a, _), (b, _)| a.sort_cmp(b));

        let bars = groups
            .into_iter()
            .map(|(key, values)| {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (key.to_display_string(), mean)
            })
            .collect();

        Ok(Self::Bar {
            x_label,
            y_label,
            bars,
        })
    }

    fn lines_from(table: &Table) -> Result<Self> {
        let x_label = table.columns[0].name.clone();

        let mut rows: Vec<&Vec<Value>> = table.rows.iter().collect();
        rows.sort_by(|a, b| a[0].sort_cmp(&b[0]));

        // Use the x column numerically when it is numeric throughout;
        // otherwise fall back to the sorted row index (timestamps chart as an
        // evenly-spaced axis labeled with their display values).
        let numeric_x = rows.iter().all(|row| row[0].as_f64().is_some());

        let first_label = rows.first().map(|r| r[0].to_display_string()).unwrap_or_default();
        let last_label = rows.last().map(|r| r[0].to_display_string()).unwrap_or_default();

        let mut series = Vec::with_capacity(2);
        for column in [1usize, 2] {
            let name = table.columns[column].name.clone();
            let mut points = Vec::with_capacity(rows.len());

            for (index, row) in rows.iter().enumerate() {
                let y = match &row[column] {
                    Value::Null => continue,
                    v => v.as_f64().ok_or_else(|| {
                        DocksideError::chart(format!(
                            "Column `{name}` is not numeric; cannot chart it."
                        ))
                    })?,
                };
                let x = if numeric_x {
                    row[0].as_f64().unwrap_or(index as f64)
                } else {
                    index as f64
                };
                points.push((x, y));
            }

            series.push(LineSeries {
                name,
                points,
                x_bounds_labels: (first_label.clone(), last_label.clone()),
            });
        }

        let [first, second]: [LineSeries; 2] = series
            .try_into()
            .map_err(|_| DocksideError::internal("expected exactly two line series"))?;

        Ok(Self::Lines {
            x_label,
            series: [first, second],
        })
    }
}
