//! Full conversation scenarios against the mock LLM and mock database.

use dockside::config::SchemaConfig;
use dockside::db::MockDatabaseClient;
use dockside::llm::{MockLlmClient, PromptBuilder, Role};
use dockside::orchestrator::Orchestrator;
use dockside::session::SessionContext;
use dockside::ui::{CaptureSurface, SurfaceEvent};

fn mock_orchestrator() -> Orchestrator {
    Orchestrator::new(
        Box::new(MockLlmClient::new()),
        Box::new(MockDatabaseClient::new()),
        PromptBuilder::new(SchemaConfig::default()),
    )
}

fn new_session() -> SessionContext {
    SessionContext::new("mock:latest", 1)
}

/// Scenario: A database request flows request -> SQL -> table.
/// Given the operator asks for the first 10 records with a database keyword
/// When the input is handled
/// Then the model receives the translation template, the generated SQL runs,
/// and a 10-row table is rendered without consuming any retry.
#[tokio::test]
async fn test_database_request_renders_table_without_retry() {
    let orchestrator = mock_orchestrator();
    let mut session = new_session();
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(
            &mut session,
            &mut surface,
            "consulta: dame los primeros 10 registros de suministro",
        )
        .await;

    let tables = surface.tables();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].row_count(), 10);
    assert_eq!(tables[0].column_names().len(), 5);
    assert!(surface.errors().is_empty());
    assert_eq!(session.attempts.used(), 0);
}

/// Scenario: The two transcripts diverge exactly where they should.
/// Given a database request
/// When the input is handled
/// Then the model transcript opens with the synthetic translation prompt and
/// gains a table turn, while the user transcript keeps the literal text and
/// never sees a synthetic turn.
#[tokio::test]
async fn test_transcripts_stay_parallel_but_distinct() {
    let orchestrator = mock_orchestrator();
    let mut session = new_session();
    let mut surface = CaptureSurface::new();
    let literal = "consulta los primeros 10 registros";

    orchestrator
        .handle_input(&mut session, &mut surface, literal)
        .await;

    let model_turns = session.model_transcript.turns();
    let user_turns = session.user_transcript.turns();

    assert_eq!(user_turns[0].content.as_text(), literal);
    assert_ne!(model_turns[0].content.as_text(), literal);
    assert!(model_turns[0]
        .content
        .as_text()
        .contains("single SQL statement"));

    // user: request + reply; model: request + reply + table turn
    assert_eq!(user_turns.len(), 2);
    assert_eq!(model_turns.len(), 3);
    assert_eq!(model_turns[2].role, Role::Assistant);
    assert!(model_turns[2].content.as_text().contains("muellenum"));
}

/// Scenario: A non-database question never touches the database.
#[tokio::test]
async fn test_small_talk_stays_conversational() {
    let llm = MockLlmClient::new().with_response("buenos días", "Buenos días, ¿qué consultamos?");
    let orchestrator = Orchestrator::new(
        Box::new(llm),
        Box::new(MockDatabaseClient::new()),
        PromptBuilder::new(SchemaConfig::default()),
    );
    let mut session = new_session();
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(&mut session, &mut surface, "buenos días")
        .await;

    assert!(surface.tables().is_empty());
    assert!(surface.charts().is_empty());
    assert_eq!(
        surface.assistant_replies(),
        vec!["Buenos días, ¿qué consultamos?"]
    );
    // Literal text went to the model, not a template
    assert_eq!(
        session.model_transcript.turns()[0].content.as_text(),
        "buenos días"
    );
}

/// Scenario: A failing statement gets exactly one correction before giving up.
/// Given a model that keeps producing invalid SQL
/// When the input is handled with a retry ceiling of one
/// Then one corrective instruction goes to the model, then a user-visible
/// message reports the failure, and no exception escapes.
#[tokio::test]
async fn test_failure_correction_is_bounded() {
    let llm = MockLlmClient::new()
        .with_response("inventario", "SELECT inventario FROM bodega;")
        .with_response("raw SQL command", "SELECT inventario FROM bodega;");
    let db = MockDatabaseClient::new()
        .with_failure("BODEGA", "Table 'armada_database.bodega' doesn't exist");
    let orchestrator = Orchestrator::new(
        Box::new(llm),
        Box::new(db),
        PromptBuilder::new(SchemaConfig::default()),
    );
    let mut session = new_session();
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(&mut session, &mut surface, "consulta el inventario")
        .await;

    assert_eq!(session.attempts.used(), 1);
    assert_eq!(surface.errors().len(), 1);
    assert!(surface.errors()[0].contains("No se pudo obtener"));

    let corrections = session
        .model_transcript
        .turns()
        .iter()
        .filter(|t| t.role == Role::User && t.content.as_text().contains("raw SQL command"))
        .count();
    assert_eq!(corrections, 1);

    // The correction never reached the visible transcript.
    assert!(!session
        .user_transcript
        .turns()
        .iter()
        .any(|t| t.content.as_text().contains("raw SQL command")));
}

/// Scenario: The session survives an exhausted request.
#[tokio::test]
async fn test_next_request_gets_a_fresh_retry_budget() {
    let llm = MockLlmClient::new().with_response("inventario", "SELECT inventario FROM bodega;");
    let db = MockDatabaseClient::new()
        .with_failure("BODEGA", "Table 'armada_database.bodega' doesn't exist");
    let orchestrator = Orchestrator::new(
        Box::new(llm),
        Box::new(db),
        PromptBuilder::new(SchemaConfig::default()),
    );
    let mut session = new_session();

    let mut surface = CaptureSurface::new();
    orchestrator
        .handle_input(&mut session, &mut surface, "consulta el inventario")
        .await;
    assert_eq!(surface.errors().len(), 1);

    let mut surface = CaptureSurface::new();
    orchestrator
        .handle_input(&mut session, &mut surface, "consulta los primeros 10")
        .await;
    assert!(surface.errors().is_empty());
    assert_eq!(surface.tables().len(), 1);
    assert_eq!(session.attempts.used(), 0);
}

/// Scenario: An empty result is reported distinctly from a failure.
#[tokio::test]
async fn test_empty_result_is_not_a_failure() {
    let llm = MockLlmClient::new()
        .with_response("muelle 99", "SELECT * FROM armada WHERE muellenum = 99;");
    let orchestrator = Orchestrator::new(
        Box::new(llm),
        Box::new(MockDatabaseClient::new()),
        PromptBuilder::new(SchemaConfig::default()),
    );
    let mut session = new_session();
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(&mut session, &mut surface, "consulta el muelle 99")
        .await;

    assert!(surface.errors().is_empty());
    assert!(surface.tables().is_empty());
    assert!(surface
        .events()
        .iter()
        .any(|e| matches!(e, SurfaceEvent::Status(s) if s.contains("No se obtuvo"))));
    // No retry was spent on an empty-but-valid result.
    assert_eq!(session.attempts.used(), 0);
}

/// Scenario: A report request streams a narrative after the table.
#[tokio::test]
async fn test_report_follows_the_table() {
    let llm = MockLlmClient::new()
        .with_response(
            "Report summary",
            "1. Resumen: el caudal se mantuvo estable en los tres muelles.",
        )
        .with_response("reporte", "SELECT * FROM armada LIMIT 5;");
    let orchestrator = Orchestrator::new(
        Box::new(llm),
        Box::new(MockDatabaseClient::new()),
        PromptBuilder::new(SchemaConfig::default()),
    );
    let mut session = new_session();
    let mut surface = CaptureSurface::new();

    orchestrator
        .handle_input(
            &mut session,
            &mut surface,
            "consulta los suministros y dame un reporte",
        )
        .await;

    assert_eq!(surface.tables().len(), 1);
    let replies = surface.assistant_replies();
    assert_eq!(replies.len(), 2);
    assert!(replies[1].contains("Resumen"));

    // Table event precedes the report reply.
    let table_pos = surface
        .events()
        .iter()
        .position(|e| matches!(e, SurfaceEvent::Table(_)))
        .unwrap();
    let report_pos = surface
        .events()
        .iter()
        .position(|e| matches!(e, SurfaceEvent::Assistant(t) if t.contains("Resumen")))
        .unwrap();
    assert!(table_pos < report_pos);
}
