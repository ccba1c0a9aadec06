//! Mock upstream server setup for integration tests

use ai_voice_proxy::client::{RetryPolicy, UpstreamClient};
use ai_voice_proxy::{AssistantService, ProxyConfig};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const CHAT_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
pub const TTS_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-tts:generateContent";
pub const API_KEY: &str = "test-key";

/// Backoff base used in tests so retries stay fast but measurable.
pub const TEST_BASE_DELAY: Duration = Duration::from_millis(5);

/// Test fixture that manages a mock upstream server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Configuration pointing at the mock server, with a credential.
    pub fn config(&self) -> ProxyConfig {
        ProxyConfig::new()
            .with_base_url(&self.base_url)
            .with_api_key(API_KEY)
            .with_retry_base_delay(TEST_BASE_DELAY)
    }

    pub fn client(&self) -> UpstreamClient {
        UpstreamClient::new(&self.config())
            .unwrap()
            .with_policy(RetryPolicy::new(3, TEST_BASE_DELAY))
    }

    pub fn service(&self) -> AssistantService {
        AssistantService::new(Arc::new(self.config())).unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a mock for a JSON response; `hits` is the exact number of calls expected.
    pub async fn mock_json(&self, path: &str, status: usize, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .match_header("x-goog-api-key", API_KEY)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Create a mock that also checks part of the request body.
    pub async fn mock_json_matching(
        &self,
        path: &str,
        body_subset: serde_json::Value,
        status: usize,
        body: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", path)
            .match_body(Matcher::PartialJson(body_subset))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(1)
            .create_async()
            .await
    }
}

/// A successful text answer.
pub fn chat_answer(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// A successful audio answer.
pub fn audio_answer(data: &str, mime: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "inlineData": { "mimeType": mime, "data": data } }] }
        }]
    })
    .to_string()
}
