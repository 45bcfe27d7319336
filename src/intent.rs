//! Keyword intent sniffing.
//!
//! The operator's free text is checked for three intents: talk to the
//! database, ask for a narrative report, and ask for a chart. Substring
//! sniffing is a deliberate simplification; it lives in this one module so a
//! structured intent source can replace it without touching the orchestrator.

/// Keywords that mark a request as database-directed.
const DATABASE_KEYWORDS: &[&str] = &["consulta", "base de datos", "query", "database"];

/// Keywords that ask for a narrative report.
const REPORT_KEYWORDS: &[&str] = &["reporte", "report"];

/// Keywords that ask for a chart.
const CHART_KEYWORDS: &[&str] = &["grafica", "gráfica", "chart", "plot"];

/// The intents detected in one user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestIntent {
    /// The request references the database and should be translated to SQL.
    pub database: bool,
    /// The request asks for a narrative report.
    pub report: bool,
    /// The request asks for a chart.
    pub chart: bool,
}

/// Detects intents in the given request text.
pub fn detect(text: &str) -> RequestIntent {
    let lower = text.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    RequestIntent {
        database: contains_any(DATABASE_KEYWORDS),
        report: contains_any(REPORT_KEYWORDS),
        chart: contains_any(CHART_KEYWORDS),
    }
}
