//! Conversation orchestration.
//!
//! Drives one user submission through the whole pipeline: intent sniffing,
//! prompt templating, streamed model reply, SQL execution, outcome
//! classification and rendering, with a bounded corrective retry. Every
//! failure is folded into a user-visible message; control always returns to
//! the prompt.

use futures::StreamExt;
use tracing::{debug, warn};

use crate::classify::{self, Decision};
use crate::db::{DatabaseClient, QueryOutcome, Table};
use crate::error::Result;
use crate::intent::{self, RequestIntent};
use crate::llm::{LlmClient, PromptBuilder, Role};
use crate::query::Executor;
use crate::session::{SessionContext, Turn};
use crate::ui::Surface;

/// The top-level conversation loop body.
pub struct Orchestrator {
    llm: Box<dyn LlmClient>,
    db: Box<dyn DatabaseClient>,
    prompts: PromptBuilder,
}

impl Orchestrator {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(llm: Box<dyn LlmClient>, db: Box<dyn DatabaseClient>, prompts: PromptBuilder) -> Self {
        Self { llm, db, prompts }
    }

    /// Handles one user submission end to end.
    pub async fn handle_input(
        &self,
        session: &mut SessionContext,
        surface: &mut dyn Surface,
        input: &str,
    ) {
        let intent = intent::detect(input);
        session.begin_request();
        surface.user(input);

        debug!(
            database = intent.database,
            report = intent.report,
            chart = intent.chart,
            "Handling user input"
        );

        // The model sees the translation template for database requests; the
        // visible transcript always records the user's literal text.
        let model_text = if intent.database {
            self.prompts.sql_translation(input)
        } else {
            input.to_string()
        };
        session.push_user_pair(model_text, input);

        let reply = match self.stream_reply(session, surface).await {
            Ok(reply) => reply,
            Err(e) => {
                surface.error(&e.to_string());
                return;
            }
        };
        session.push_assistant_both(&reply);

        if !reply.to_uppercase().contains("SELECT") {
            return;
        }

        self.run_query_cycle(session, surface, intent, input, reply)
            .await;
    }

    /// Executes a candidate statement and dispatches on the classified
    /// outcome, looping for at most the configured number of corrections.
    async fn run_query_cycle(
        &self,
        session: &mut SessionContext,
        surface: &mut dyn Surface,
        intent: RequestIntent,
        request: &str,
        mut candidate: String,
    ) {
        surface.status("Generando consulta SQL…");
        let executor = Executor::new(self.db.as_ref());

        loop {
            let outcome = executor.execute(&candidate).await;
            let decision = classify::decide(intent, &outcome);
            debug!(?decision, attempts = session.attempts.used(), "Classified outcome");

            match decision {
                Decision::ShowTable => {
                    if let QueryOutcome::Rows(table) = outcome {
                        self.show_table(session, surface, table);
                    }
                    break;
                }

                Decision::ShowTableThenReport => {
                    if let QueryOutcome::Rows(table) = outcome {
                        let data = table.format_plain();
                        self.show_table(session, surface, table);
                        self.stream_report(session, surface, request, &data).await;
                    }
                    break;
                }

                Decision::ShowTableThenChart => {
                    if let QueryOutcome::Rows(table) = outcome {
                        let chart = crate::chart::ChartSpec::from_table(&table);
                        self.show_table(session, surface, table);
                        match chart {
                            Ok(spec) => surface.chart(&spec),
                            Err(e) => surface.error(&e.to_string()),
                        }
                    }
                    break;
                }

                Decision::NoResult => {
                    surface.status("No se obtuvo respuesta alguna.");
                    break;
                }

                Decision::RetryWithCorrection => {
                    if let QueryOutcome::Failed { cause } = &outcome {
                        warn!(cause = %cause, "Candidate SQL failed");
                    }

                    if !session.attempts.try_consume() {
                        surface.error("No se pudo obtener un resultado para esa consulta.");
                        break;
                    }

                    // The corrective instruction is model-facing only.
                    session.push_model_only(Turn::text(Role::User, self.prompts.correction()));
                    surface.status("Intentando de nuevo…");

                    match self.stream_reply(session, surface).await {
                        Ok(reply) => {
                            session.push_assistant_both(&reply);
                            candidate = reply;
                        }
                        Err(e) => {
                            surface.error(&e.to_string());
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Renders a result table and appends it to the model transcript.
    fn show_table(&self, session: &mut SessionContext, surface: &mut dyn Surface, table: Table) {
        surface.status("Resultados de la consulta:");
        surface.table(&table);
        session.push_model_only(Turn::table(Role::Assistant, table));
    }

    /// Streams the narrative report for a successful query.
    async fn stream_report(
        &self,
        session: &mut SessionContext,
        surface: &mut dyn Surface,
        request: &str,
        data: &str,
    ) {
        let prompt = self.prompts.report(request, data);
        session.push_model_only(Turn::text(Role::User, prompt));

        match self.stream_reply(session, surface).await {
            Ok(report) => session.push_assistant_both(&report),
            Err(e) => surface.error(&e.to_string()),
        }
    }

    /// Streams one model reply to the surface, returning the full text.
    ///
    /// The reply arrives as a lazy sequence of fragments; each one is shown
    /// as it arrives and the concatenation is returned.
    async fn stream_reply(
        &self,
        session: &SessionContext,
        surface: &mut dyn Surface,
    ) -> Result<String> {
        let messages = session.model_transcript.to_messages();
        let mut stream = self.llm.complete_stream(&session.model, &messages).await?;

        surface.assistant_start();
        let mut reply = String::new();
        let mut failure = None;

        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(fragment) => {
                    surface.assistant_fragment(&fragment);
                    reply.push_str(&fragment);
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        surface.assistant_done();

        match failure {
            Some(e) => Err(e),
            None => Ok(reply),
        }
    }
}
