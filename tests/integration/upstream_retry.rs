//! Retry and classification behavior of the upstream client

use crate::mock_server::{chat_answer, MockServerFixture, CHAT_PATH, TEST_BASE_DELAY};
use ai_voice_proxy::client::{RetryPolicy, UpstreamClient, UpstreamOutcome};
use ai_voice_proxy::{Error, ProxyConfig};
use serde_json::json;

#[tokio::test]
async fn test_server_errors_use_the_whole_budget() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(CHAT_PATH, 500, r#"{"error":{"message":"internal"}}"#, 3)
        .await;

    let (outcome, stats) = fixture
        .client()
        .send_with_stats(&fixture.url(CHAT_PATH), json!({}))
        .await;

    mock.assert_async().await;
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.delays, vec![TEST_BASE_DELAY * 2, TEST_BASE_DELAY * 4]);
    assert!(stats.delays.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(stats.last_status, Some(500));
    match outcome {
        UpstreamOutcome::TerminalFailure(Error::RetriesExhausted { attempts, .. }) => {
            assert_eq!(attempts, 3)
        }
        other => panic!("expected exhausted budget, got {:?}", other),
    }
}

#[tokio::test]
async fn test_terminal_status_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(CHAT_PATH, 404, r#"{"error":{"message":"model not found"}}"#, 1)
        .await;

    let (outcome, stats) = fixture
        .client()
        .send_with_stats(&fixture.url(CHAT_PATH), json!({}))
        .await;

    mock.assert_async().await;
    assert_eq!(stats.attempts, 1);
    assert!(stats.delays.is_empty());
    match outcome {
        UpstreamOutcome::TerminalFailure(Error::Remote {
            status,
            message,
            retryable,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "model not found");
            assert!(!retryable);
        }
        other => panic!("expected terminal 404, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let fixture = MockServerFixture::new().await;
    let throttled = fixture
        .mock_json(CHAT_PATH, 429, r#"{"error":{"message":"slow down"}}"#, 1)
        .await;
    let ok = fixture
        .mock_json(CHAT_PATH, 200, &chat_answer("[EMOTION: JOY] hi"), 1)
        .await;

    let (outcome, stats) = fixture
        .client()
        .send_with_stats(&fixture.url(CHAT_PATH), json!({}))
        .await;

    throttled.assert_async().await;
    ok.assert_async().await;
    assert_eq!(stats.attempts, 2);
    assert_eq!(stats.delays, vec![TEST_BASE_DELAY * 2]);
    let body = outcome.into_result().unwrap();
    assert_eq!(body["candidates"][0]["content"]["parts"][0]["text"], "[EMOTION: JOY] hi");
}

#[tokio::test]
async fn test_malformed_success_is_not_retried() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json(CHAT_PATH, 200, "<html>oops</html>", 1).await;

    let (outcome, stats) = fixture
        .client()
        .send_with_stats(&fixture.url(CHAT_PATH), json!({}))
        .await;

    mock.assert_async().await;
    assert_eq!(stats.attempts, 1);
    assert!(matches!(
        outcome,
        UpstreamOutcome::TerminalFailure(Error::Shape { .. })
    ));
}

#[tokio::test]
async fn test_success_with_unexpected_json_is_passed_on() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_json(CHAT_PATH, 200, r#"{"candidates":[]}"#, 1).await;

    let outcome = fixture
        .client()
        .send(&fixture.url(CHAT_PATH), json!({}))
        .await;

    mock.assert_async().await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_connection_failures_are_retried() {
    // Port 9 (discard) is closed on test machines; every connect is refused.
    let cfg = ProxyConfig::new().with_base_url("http://127.0.0.1:9");
    let client = UpstreamClient::new(&cfg)
        .unwrap()
        .with_policy(RetryPolicy::new(2, TEST_BASE_DELAY));

    let (outcome, stats) = client
        .send_with_stats(&cfg.generate_url(&cfg.chat_model), json!({}))
        .await;

    assert_eq!(stats.attempts, 2);
    assert_eq!(stats.delays, vec![TEST_BASE_DELAY * 2]);
    assert_eq!(stats.last_status, None);
    assert!(matches!(
        outcome,
        UpstreamOutcome::TerminalFailure(Error::RetriesExhausted { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_each_call_has_its_own_budget() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json(CHAT_PATH, 503, r#"{"error":{"message":"overloaded"}}"#, 6)
        .await;
    let client = fixture.client();
    let url = fixture.url(CHAT_PATH);

    let (a, b) = tokio::join!(
        client.send_with_stats(&url, json!({ "n": 1 })),
        client.send_with_stats(&url, json!({ "n": 2 }))
    );

    mock.assert_async().await;
    assert_eq!(a.1.attempts, 3);
    assert_eq!(b.1.attempts, 3);
    assert_ne!(a.1.client_request_id, b.1.client_request_id);
}
