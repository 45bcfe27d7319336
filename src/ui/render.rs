//! Widget rendering for the scrolling console.
//!
//! Result tables and charts are drawn with ratatui widgets into an offscreen
//! buffer, then flattened to plain text lines the console can print. Keeps the
//! drawing ecosystem-native without taking over the whole terminal.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Cell, Chart, Dataset, GraphType, Row as TableRow,
    Table as TableWidget, Widget,
};

use crate::chart::{ChartSpec, LineSeries};
use crate::db::Table;

/// Maximum rows printed for one result table.
const MAX_TABLE_ROWS: usize = 30;

/// Height of one chart panel, in terminal rows.
const CHART_HEIGHT: u16 = 16;

/// Renders a result table as text.
pub fn render_table(table: &Table, max_width: u16) -> String {
    let shown_rows = table.rows.len().min(MAX_TABLE_ROWS);

    let widths: Vec<u16> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let cell_max = table
                .rows
                .iter()
                .take(shown_rows)
                .map(|row| row.get(i).map(|v| v.to_display_string().len()).unwrap_or(0))
                .max()
                .unwrap_or(0);
            cell_max.max(col.name.len()).min(32) as u16
        })
        .collect();

    let spacing = 1u16;
    let total_width: u16 = widths.iter().sum::<u16>()
        + spacing * widths.len().saturating_sub(1) as u16
        + 2; // borders
    let width = total_width.min(max_width.max(20));
    let height = shown_rows as u16 + 3; // borders + header

    let header = TableRow::new(
        table
            .columns
            .iter()
            .map(|col| Cell::from(col.name.clone()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<TableRow> = table
        .rows
        .iter()
        .take(shown_rows)
        .map(|row| {
            TableRow::new(
                row.iter()
                    .map(|value| Cell::from(value.to_display_string()))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let constraints: Vec<Constraint> = widths.iter().map(|w| Constraint::Length(*w)).collect();
    let widget = TableWidget::new(rows, constraints)
        .header(header)
        .column_spacing(spacing)
        .block(Block::bordered());

    let mut out = render_to_text(widget, width, height);
    if table.rows.len() > shown_rows {
        out.push_str(&format!("… {} more rows\n", table.rows.len() - shown_rows));
    }
    out
}

/// Renders a selected chart as text.
pub fn render_chart(spec: &ChartSpec, max_width: u16) -> String {
    match spec {
        ChartSpec::Bar {
            x_label,
            y_label,
            bars,
        } => render_bar_chart(x_label, y_label, bars, max_width),
        ChartSpec::Lines { x_label, series } => {
            let mut out = render_line_chart(x_label, &series[0], Color::Cyan, max_width);
            out.push_str(&render_line_chart(x_label, &series[1], Color::Yellow, max_width));
            out
        }
    }
}

fn render_bar_chart(x_label: &str, y_label: &str, bars: &[(String, f64)], max_width: u16) -> String {
    let max_value = bars.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let scale = if max_value > 0.0 { 100.0 / max_value } else { 1.0 };

    let bar_width = bars
        .iter()
        .map(|(label, value)| label.len().max(format!("{value:.1}").len()))
        .max()
        .unwrap_or(1)
        .max(5) as u16;

    let widget_bars: Vec<Bar> = bars
        .iter()
        .map(|(label, value)| {
            Bar::default()
                .label(Line::from(label.clone()))
                .value((value.max(0.0) * scale).round() as u64)
                .text_value(format!("{value:.1}"))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::bordered().title(format!("{y_label} por {x_label}")))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .data(BarGroup::default().bars(&widget_bars));

    let needed = bars.len() as u16 * (bar_width + 1) + 2;
    let width = needed.clamp(24, max_width.max(24));
    render_to_text(chart, width, CHART_HEIGHT)
}

fn render_line_chart(x_label: &str, series: &LineSeries, color: Color, max_width: u16) -> String {
    let (x_bounds, y_bounds) = bounds(&series.points);

    let dataset = Dataset::default()
        .name(series.name.clone())
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&series.points);

    let x_axis = Axis::default()
        .title(x_label.to_string())
        .bounds(x_bounds)
        .labels(vec![
            Span::raw(series.x_bounds_labels.0.clone()),
            Span::raw(series.x_bounds_labels.1.clone()),
        ]);

    let y_axis = Axis::default()
        .title(series.name.clone())
        .bounds(y_bounds)
        .labels(vec![
            Span::raw(format!("{:.1}", y_bounds[0])),
            Span::raw(format!("{:.1}", y_bounds[1])),
        ]);

    let chart = Chart::new(vec![dataset])
        .block(Block::bordered().title(format!("{} vs {}", series.name, x_label)))
        .x_axis(x_axis)
        .y_axis(y_axis);

    render_to_text(chart, max_width.clamp(40, 100), CHART_HEIGHT)
}

/// Axis bounds with a little padding; degenerate ranges get widened so the
/// chart never divides by zero.
fn bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for (x, y) in points {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_min = y_min.min(*y);
        y_max = y_max.max(*y);
    }

    if points.is_empty() {
        return ([0.0, 1.0], [0.0, 1.0]);
    }
    if x_min == x_max {
        x_max = x_min + 1.0;
    }
    if y_min == y_max {
        y_min -= 1.0;
        y_max += 1.0;
    } else {
        let pad = (y_max - y_min) * 0.05;
        y_min -= pad;
        y_max += pad;
    }

    ([x_min, x_max], [y_min, y_max])
}

/// Draws a widget into an offscreen buffer and flattens it to text.
fn render_to_text<W: Widget>(widget: W, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);
    buffer_to_text(&buffer)
}

/// Flattens a buffer to trimmed text lines.
fn buffer_to_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    if area.height == 0 {
        return String::new();
    }

    let lines = (0..area.height)
        .map(|y| {
            let line = (0..area.width)
                .map(|x| buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "))
                .collect::<Vec<_>>()
                .join("");
            line.trim_end_matches(' ').to_string()
        })
        .collect::<Vec<_>>();

    let trimmed = lines
        .into_iter()
        .rev()
        .skip_while(|line| line.is_empty())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>();

    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}\n", trimmed.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnInfo, Value};

    fn flow_table() -> Table {
        Table::new(
            vec![
                ColumnInfo::new("muellenum", "INT"),
                ColumnInfo::new("caudal", "DOUBLE"),
            ],
            vec![
                vec![Value::Int(1), Value::Float(49.0)],
                vec![Value::Int(2), Value::Float(52.0)],
            ],
        )
    }

    #[test]
    fn test_render_table_contains_headers_and_values() {
        let text = render_table(&flow_table(), 80);
        assert!(text.contains("muellenum"));
        assert!(text.contains("caudal"));
        assert!(text.contains("49"));
        assert!(text.contains("52"));
    }

    #[test]
    fn test_render_table_truncates_long_results() {
        let rows = (0..100)
            .map(|i| vec![Value::Int(i), Value::Float(i as f64)])
            .collect();
        let table = Table::new(
            vec![
                ColumnInfo::new("muellenum", "INT"),
                ColumnInfo::new("caudal", "DOUBLE"),
            ],
            rows,
        );

        let text = render_table(&table, 80);
        assert!(text.contains("… 70 more rows"));
    }

    #[test]
    fn test_render_bar_chart_has_title_and_labels() {
        let spec = ChartSpec::from_table(&flow_table()).unwrap();
        let text = render_chart(&spec, 80);

        assert!(text.contains("caudal por muellenum"));
        assert!(text.contains("49.0"));
        assert!(text.contains("52.0"));
    }

    #[test]
    fn test_render_line_charts_renders_two_panels() {
        let table = Table::new(
            vec![
                ColumnInfo::new("tiempo", "DATETIME"),
                ColumnInfo::new("caudal", "DOUBLE"),
                ColumnInfo::new("presion", "DOUBLE"),
            ],
            vec![
                vec![
                    Value::String("2024-12-01".into()),
                    Value::Float(48.0),
                    Value::Float(148.0),
                ],
                vec![
                    Value::String("2024-12-02".into()),
                    Value::Float(50.0),
                    Value::Float(149.0),
                ],
            ],
        );

        let spec = ChartSpec::from_table(&table).unwrap();
        let text = render_chart(&spec, 80);

        assert!(text.contains("caudal vs tiempo"));
        assert!(text.contains("presion vs tiempo"));
        assert!(text.contains("2024-12-01"));
    }

    #[test]
    fn test_bounds_degenerate_ranges_are_widened() {
        let (x, y) = bounds(&[(1.0, 5.0)]);
        assert!(x[0] < x[1]);
        assert!(y[0] < y[1]);
    }
}
