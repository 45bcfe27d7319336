//! Session state for one interactive chat.
//!
//! Holds the two parallel transcripts (the exact sequence sent to the model
//! and the user-visible one), the selected model name, and the bounded retry
//! counter. No process-wide state: the context is passed to every component
//! that needs it.

use crate::db::Table;
use crate::llm::{Message, Role};

/// Content of one conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnContent {
    /// Plain text.
    Text(String),
    /// A tabular query result.
    Table(Table),
}

impl TurnContent {
    /// Returns the content as text, serializing tables to plain text.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Table(table) => table.format_plain(),
        }
    }
}

/// One turn in a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Who produced the turn.
    pub role: Role,
    /// What it contains.
    pub content: TurnContent,
}

impl Turn {
    /// Creates a text turn.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: TurnContent::Text(content.into()),
        }
    }

    /// Creates a tabular turn.
    pub fn table(role: Role, table: Table) -> Self {
        Self {
            role,
            content: TurnContent::Table(table),
        }
    }
}

/// An append-only ordered sequence of turns.
///
/// Turns accumulate for the life of the session and are never pruned or
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Appends a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns all turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if the transcript has no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Converts the transcript into LLM request messages.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .map(|turn| Message::new(turn.role, turn.content.as_text()))
            .collect()
    }
}

/// Bounded counter of automatic correction attempts.
///
/// Starts at zero for each new user request; the ceiling is the configured
/// number of retries (one in the default configuration).
#[derive(Debug, Clone, Copy)]
pub struct AttemptCounter {
    used: u32,
    ceiling: u32,
}

impl AttemptCounter {
    /// Creates a counter with the given ceiling.
    pub fn new(ceiling: u32) -> Self {
        Self { used: 0, ceiling }
    }

    /// Resets the counter for a new request.
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// Records one attempt. Returns false when the ceiling was already reached.
    pub fn try_consume(&mut self) -> bool {
        if self.used >= self.ceiling {
            return false;
        }
        self.used += 1;
        true
    }

    /// Returns the number of attempts consumed.
    pub fn used(&self) -> u32 {
        self.used
    }
}

/// Mutable state for one interactive session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The exact transcript sent to the model. May contain synthetic
    /// instruction turns the user never sees.
    pub model_transcript: Transcript,
    /// The transcript shown to the user.
    pub user_transcript: Transcript,
    /// The model backing generation, chosen once per session.
    pub model: String,
    /// Bounded correction attempts for the current request.
    pub attempts: AttemptCounter,
}

impl SessionContext {
    /// Creates a session for the given model and retry ceiling.
    pub fn new(model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            model_transcript: Transcript::default(),
            user_transcript: Transcript::default(),
            model: model.into(),
            attempts: AttemptCounter::new(max_retries),
        }
    }

    /// Starts a new user request: resets the attempt counter.
    pub fn begin_request(&mut self) {
        self.attempts.reset();
    }

    /// Appends a user turn where the model sees `model_text` but the visible
    /// transcript records the user's literal text.
    pub fn push_user_pair(&mut self, model_text: impl Into<String>, visible_text: impl Into<String>) {
        self.model_transcript.push(Turn::text(Role::User, model_text));
        self.user_transcript.push(Turn::text(Role::User, visible_text));
    }

    /// Appends the same assistant text to both transcripts.
    pub fn push_assistant_both(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.model_transcript
            .push(Turn::text(Role::Assistant, text.clone()));
        self.user_transcript.push(Turn::text(Role::Assistant, text));
    }

    /// Appends a synthetic turn to the model transcript only.
    pub fn push_model_only(&mut self, turn: Turn) {
        self.model_transcript.push(turn);
    }
}
