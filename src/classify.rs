//! Outcome classification.
//!
//! Pure decision step between query execution and rendering: given the user's
//! detected intent and the tagged query outcome, pick the next action. Side
//! effects belong to the orchestrator.

use crate::db::QueryOutcome;
use crate::intent::RequestIntent;

/// The next action after executing a candidate statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The query failed: ask the model again with a corrective instruction.
    RetryWithCorrection,
    /// Render the result table and stop.
    ShowTable,
    /// Render the table, then ask the model for a narrative report.
    ShowTableThenReport,
    /// Render the table, then select and render a chart.
    ShowTableThenChart,
    /// The query succeeded but returned nothing.
    NoResult,
}

/// Decides the next action for one execute cycle.
///
/// Rules, in order: failure wins, then report intent, then chart intent, then
/// a plain table; an explicitly-empty result is its own terminal case.
pub fn decide(intent: RequestIntent, outcome: &QueryOutcome) -> Decision {
    match outcome {
        QueryOutcome::Failed { .. } => Decision::RetryWithCorrection,
        QueryOutcome::Rows(_) if intent.report => Decision::ShowTableThenReport,
        QueryOutcome::Rows(_) if intent.chart => Decision::ShowTableThenChart,
        QueryOutcome::Rows(_) => Decision::ShowTable,
        QueryOutcome::Empty { .. } => Decision::NoResult,
    }
}
