//! Integration tests for outreach email drafting.

use lead_engine::{
    draft_outreach_email, AcquireConfig, MockProvider, OutreachError, ParseError, ProviderError,
    ScriptedReply,
};

#[tokio::test]
async fn test_fenced_reply_becomes_draft() {
    let provider = MockProvider::new().with_text(
        "```json\n{\"subject\": \"  Quick idea for Joe's Diner \", \"body\": \"Hi there,\\nLoved the menu.\"}\n```",
    );

    let draft = draft_outreach_email(
        &provider,
        "Joe's Diner",
        "restaurant",
        "Duluth, MN",
        &AcquireConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(draft.subject, "Quick idea for Joe's Diner");
    assert!(draft.body.starts_with("Hi there"));

    let messages = provider.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("\"Joe's Diner\""));
    assert!(messages[0].contains("restaurant"));
    assert!(messages[0].contains("Duluth, MN"));
}

#[tokio::test]
async fn test_session_has_no_grounding_tool() {
    let provider =
        MockProvider::new().with_text(r#"{"subject": "Hello", "body": "A short note."}"#);
    let config = AcquireConfig {
        model: "gemini-test".to_string(),
        ..AcquireConfig::default()
    };

    draft_outreach_email(&provider, "Acme", "plumbing", "Austin, TX", &config)
        .await
        .unwrap();

    let sessions = provider.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].model, "gemini-test");
    assert!(sessions[0].tools.is_empty());
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let provider = MockProvider::new().with_reply(ScriptedReply::RateLimited);

    let err = draft_outreach_email(
        &provider,
        "Acme",
        "plumbing",
        "Austin, TX",
        &AcquireConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OutreachError::RateLimited(_)), "got {err:?}");
}

#[tokio::test]
async fn test_malformed_reply_is_parse_error() {
    let provider = MockProvider::new().with_text("Dear Acme, I would love to help.");

    let err = draft_outreach_email(
        &provider,
        "Acme",
        "plumbing",
        "Austin, TX",
        &AcquireConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, OutreachError::Parse(ParseError::InvalidJson(_))),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_missing_body_is_parse_error() {
    let provider = MockProvider::new().with_text(r#"{"subject": "Hello"}"#);

    let err = draft_outreach_email(
        &provider,
        "Acme",
        "plumbing",
        "Austin, TX",
        &AcquireConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        OutreachError::Parse(ParseError::MissingField("body"))
    ));
}

#[tokio::test]
async fn test_missing_credential_is_config_error() {
    let provider = MockProvider::new()
        .with_session_error(ProviderError::Config("GEMINI_API_KEY is not set".into()));

    let err = draft_outreach_email(
        &provider,
        "Acme",
        "plumbing",
        "Austin, TX",
        &AcquireConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OutreachError::Config(_)));
    assert_eq!(provider.query_count(), 0);
}
