//! Chat surface for dockside.
//!
//! The orchestrator talks to an abstract [`Surface`]: an append-only
//! transcript with incremental assistant fragments, table rendering and
//! figure rendering. The console implementation prints styled text; the
//! capturing implementation records events for tests.

pub mod console;
pub mod render;

pub use console::ConsoleSurface;

use crate::chart::ChartSpec;
use crate::db::Table;

/// Output surface for one chat session.
pub trait Surface {
    /// Records the user's literal input.
    fn user(&mut self, text: &str);

    /// Starts an assistant reply.
    fn assistant_start(&mut self);

    /// Appends one streamed fragment of the assistant reply.
    fn assistant_fragment(&mut self, fragment: &str);

    /// Finishes the assistant reply.
    fn assistant_done(&mut self);

    /// Prints a status line (progress, row counts, no-result notes).
    fn status(&mut self, text: &str);

    /// Prints a non-fatal user-visible error.
    fn error(&mut self, text: &str);

    /// Renders a result table.
    fn table(&mut self, table: &Table);

    /// Renders a selected chart.
    fn chart(&mut self, spec: &ChartSpec);
}

/// One recorded surface event.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// User input.
    User(String),
    /// A complete assistant reply (fragments reassembled).
    Assistant(String),
    /// A status line.
    Status(String),
    /// A user-visible error.
    Error(String),
    /// A rendered table.
    Table(Table),
    /// A rendered chart.
    Chart(ChartSpec),
}

/// Surface that records events instead of printing, for tests.
#[derive(Debug, Default)]
pub struct CaptureSurface {
    events: Vec<SurfaceEvent>,
    pending_reply: Option<String>,
}

impl CaptureSurface {
    /// Creates an empty capturing surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in order.
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Returns the recorded assistant replies in order.
    pub fn assistant_replies(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Assistant(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Returns the recorded tables in order.
    pub fn tables(&self) -> Vec<&Table> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    /// Returns the recorded charts in order.
    pub fn charts(&self) -> Vec<&ChartSpec> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Chart(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }

    /// Returns the recorded error lines in order.
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Error(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CaptureSurface {
    fn user(&mut self, text: &str) {
        self.events.push(SurfaceEvent::User(text.to_string()));
    }

    fn assistant_start(&mut self) {
        self.pending_reply = Some(String::new());
    }

    fn assistant_fragment(&mut self, fragment: &str) {
        if let Some(reply) = self.pending_reply.as_mut() {
            reply.push_str(fragment);
        }
    }

    fn assistant_done(&mut self) {
        if let Some(reply) = self.pending_reply.take() {
            self.events.push(SurfaceEvent::Assistant(reply));
        }
    }

    fn status(&mut self, text: &str) {
        self.events.push(SurfaceEvent::Status(text.to_string()));
    }

    fn error(&mut self, text: &str) {
        self.events.push(SurfaceEvent::Error(text.to_string()));
    }

    fn table(&mut self, table: &Table) {
        self.events.push(SurfaceEvent::Table(table.clone()));
    }

    fn chart(&mut self, spec: &ChartSpec) {
        self.events.push(SurfaceEvent::Chart(spec.clone()));
    }
}
