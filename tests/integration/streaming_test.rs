//! Streaming reply scenarios.
//!
//! The reply surface receives fragments as they arrive; the concatenation of
//! fragments equals the full reply.

use futures::StreamExt;

use dockside::llm::{LlmClient, Message, MockLlmClient};
use dockside::llm::select_model;

/// Scenario: A reply arrives as a finite sequence of fragments.
#[tokio::test]
async fn test_fragments_concatenate_to_full_reply() {
    let client = MockLlmClient::new()
        .with_response("muelles", "SELECT muellenum FROM armada GROUP BY muellenum;");
    let messages = vec![Message::user("consulta los muelles")];

    let mut stream = client
        .complete_stream("mock:latest", &messages)
        .await
        .unwrap();

    let mut fragments = Vec::new();
    while let Some(chunk) = stream.next().await {
        fragments.push(chunk.unwrap());
    }

    assert!(fragments.len() > 1, "expected incremental fragments");
    assert_eq!(
        fragments.concat(),
        "SELECT muellenum FROM armada GROUP BY muellenum;"
    );
}

/// Scenario: The stream ends after the reply; it is finite.
#[tokio::test]
async fn test_stream_is_finite() {
    let client = MockLlmClient::new();
    let messages = vec![Message::user("hola")];

    let mut stream = client
        .complete_stream("mock:latest", &messages)
        .await
        .unwrap();

    let mut count = 0;
    while stream.next().await.is_some() {
        count += 1;
        assert!(count < 10_000, "stream did not terminate");
    }
}

/// Scenario: The session model comes from the discovered list.
#[tokio::test]
async fn test_model_selection_against_discovered_list() {
    let client = MockLlmClient::new().with_models(vec![
        "llama3.2:3b".to_string(),
        "qwen2.5:7b".to_string(),
    ]);
    let available = client.list_models().await.unwrap();

    // Preference wins when present.
    let model = select_model(&available, None, "llama3.2:3b").unwrap();
    assert_eq!(model, "llama3.2:3b");

    // An explicit request must exist.
    let model = select_model(&available, Some("qwen2.5:7b"), "llama3.2:3b").unwrap();
    assert_eq!(model, "qwen2.5:7b");
    assert!(select_model(&available, Some("missing:1b"), "llama3.2:3b").is_err());

    // Absent preference falls back to the first discovered model.
    let model = select_model(&available, None, "nonexistent").unwrap();
    assert_eq!(model, "llama3.2:3b");
}

/// Scenario: No discovered models is an error, not a panic.
#[tokio::test]
async fn test_empty_model_list_is_an_error() {
    let client = MockLlmClient::new().with_models(vec![]);
    let available = client.list_models().await.unwrap();

    let err = select_model(&available, None, "llama3.2:3b").unwrap_err();
    assert!(err.to_string().contains("No models available"));
}
