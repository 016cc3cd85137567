use gherkin_editor::lang::CompletionRange;
use gherkin_editor::{DEFAULT_READ_FIELD, EditorSession, MemoryHost, SessionConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let host = Arc::new(MemoryHost::new().with_field(DEFAULT_READ_FIELD, "Feature: login"));
    let config = SessionConfig::from_json(r#"{"FieldName": "Steps"}"#).unwrap();
    let mut session = EditorSession::new(host.clone(), host.clone(), config);

    session.start().await.unwrap();

    // Simulate typing a scenario one line at a time.
    let mut text = session.text().unwrap_or_default().to_string();
    for line in [
        "  Scenario: valid password",
        "    Given a user named 'alice'",
        "    When she logs in # happy path",
        "    Then she sees the dashboard",
    ] {
        text.push('\n');
        text.push_str(line);
        session.on_content_change(text.clone()).unwrap();
    }
    session.flush().await.unwrap();

    for (line, tokens) in text.lines().zip(session.tokens().unwrap_or_default()) {
        let spans: Vec<String> = tokens
            .iter()
            .map(|t| format!("{}({:?})", t.tag.as_str(), t.text(line)))
            .collect();
        println!("{}", spans.join(" "));
    }

    let labels: Vec<String> = session
        .completions(CompletionRange::word(1, 1, 1))
        .into_iter()
        .map(|item| item.entry.label)
        .collect();
    println!("completions: {}", labels.join(", "));
    println!("stats: {:?}", session.sync_stats());

    session.shutdown().await;
    assert_eq!(host.field("Steps").as_deref(), Some(text.as_str()));
}
