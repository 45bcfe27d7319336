//! Chart selection and rendering scenarios.

use dockside::chart::ChartSpec;
use dockside::config::SchemaConfig;
use dockside::db::{ColumnInfo, MockDatabaseClient, Table, Value};
use dockside::llm::{MockLlmClient, PromptBuilder};
use dockside::orchestrator::Orchestrator;
use dockside::session::SessionContext;
use dockside::ui::render;
use dockside::ui::CaptureSurface;

fn mock_orchestrator() -> Orchestrator {
    Orchestrator::new(
        Box::new(MockLlmClient::new()),
        Box::new(MockDatabaseClient::new()),
        PromptBuilder::new(SchemaConfig::default()),
    )
}

/// Scenario: A two-column aggregate charts as per-dock bars.
/// Given a chart request whose SQL yields (muellenum, caudal_promedio)
/// When the input is handled
/// Then one bar per distinct dock is produced, sorted by dock number, with
/// the bar value equal to the mean caudal of that dock.
#[tokio::test]
async fn test_two_columns_become_sorted_bars() {
    let orchestrator = mock_orchestrator();
    let mut session = SessionContext::new("mock:latest", 1);
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(
            &mut session,
            &mut surface,
            "consulta el caudal promedio por muelle y grafica",
        )
        .await;

    let charts = surface.charts();
    assert_eq!(charts.len(), 1);
    let ChartSpec::Bar {
        x_label,
        y_label,
        bars,
    } = charts[0]
    else {
        panic!("expected a bar chart, got {:?}", charts[0]);
    };

    assert_eq!(x_label, "muellenum");
    assert_eq!(y_label, "caudal_promedio");

    let labels: Vec<&str> = bars.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, vec!["1", "2", "3"]);

    // Means of the seeded caudal values per dock.
    assert!((bars[0].1 - 49.375).abs() < 1e-9);
    assert!((bars[1].1 - 153.5 / 3.0).abs() < 1e-9);
    assert!((bars[2].1 - 53.0).abs() < 1e-9);
}

/// Scenario: A three-column result charts as two line series over time.
#[tokio::test]
async fn test_three_columns_become_two_line_series() {
    let orchestrator = mock_orchestrator();
    let mut session = SessionContext::new("mock:latest", 1);
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(
            &mut session,
            &mut surface,
            "consulta la presion en el tiempo y grafica",
        )
        .await;

    let charts = surface.charts();
    assert_eq!(charts.len(), 1);
    let ChartSpec::Lines { x_label, series } = charts[0] else {
        panic!("expected line charts, got {:?}", charts[0]);
    };

    assert_eq!(x_label, "tiempo");
    assert_eq!(series[0].name, "caudal");
    assert_eq!(series[1].name, "presion");
    assert_eq!(series[0].points.len(), 10);
    assert_eq!(series[1].points.len(), 10);

    // Points are in ascending x order.
    for window in series[0].points.windows(2) {
        assert!(window[0].0 <= window[1].0);
    }

    // The x bounds carry the first and last timestamps of the sorted data.
    assert!(series[0].x_bounds_labels.0.starts_with("2024-12-01"));
    assert!(series[0].x_bounds_labels.1.starts_with("2024-12-05"));
}

/// Scenario: An unchartable shape is a user-visible error, not a crash.
/// Given a chart request whose SQL yields five columns
/// When the input is handled
/// Then the table still renders, no chart is drawn, and the error names the
/// accepted shapes.
#[tokio::test]
async fn test_wrong_shape_fails_visibly() {
    let llm = MockLlmClient::new().with_response("todo", "SELECT * FROM armada LIMIT 6;");
    let orchestrator = Orchestrator::new(
        Box::new(llm),
        Box::new(MockDatabaseClient::new()),
        PromptBuilder::new(SchemaConfig::default()),
    );
    let mut session = SessionContext::new("mock:latest", 1);
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(&mut session, &mut surface, "consulta todo y grafica")
        .await;

    assert_eq!(surface.tables().len(), 1);
    assert!(surface.charts().is_empty());
    assert_eq!(surface.errors().len(), 1);
    assert!(surface.errors()[0].contains("2 or 3 columns"));
    // No retry is spent on a chart-shape problem.
    assert_eq!(session.attempts.used(), 0);
}

/// Scenario: A bar chart renders to text with its labels and values.
#[tokio::test]
async fn test_bar_chart_renders_to_text() {
    let table = Table::new(
        vec![
            ColumnInfo::new("muellenum", "INT"),
            ColumnInfo::new("caudal_promedio", "DECIMAL"),
        ],
        vec![
            vec![Value::Int(1), Value::Float(49.4)],
            vec![Value::Int(2), Value::Float(51.2)],
        ],
    );
    let spec = ChartSpec::from_table(&table).unwrap();

    let text = render::render_chart(&spec, 80);

    assert!(text.contains("caudal_promedio"));
    assert!(text.contains('1'));
    assert!(text.contains('2'));
    assert!(text.contains("49.4"));
    assert!(text.contains("51.2"));
}

/// Scenario: A wide table renders with a truncation note.
#[tokio::test]
async fn test_long_table_renders_truncated() {
    let rows: Vec<Vec<Value>> = (0..40)
        .map(|i| vec![Value::Int(i), Value::Float(i as f64 * 1.5)])
        .collect();
    let table = Table::new(
        vec![
            ColumnInfo::new("muellenum", "INT"),
            ColumnInfo::new("caudal", "DOUBLE"),
        ],
        rows,
    );

    let text = render::render_table(&table, 80);

    assert!(text.contains("muellenum"));
    assert!(text.contains("more rows"));
}
