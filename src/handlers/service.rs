use super::payload::{build_chat_payload, build_speech_payload, ImageInput};
use super::types::{ChatRequest, ChatResponse, HealthResponse, SpeechRequest, SpeechResponse};
use crate::client::UpstreamClient;
use crate::config::ProxyConfig;
use crate::normalize::{normalize_chat, normalize_speech};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::info;

/// Chat / speech / health operations over one shared, read-only configuration.
///
/// Requests never share mutable state; N identical concurrent calls produce
/// N upstream calls.
#[derive(Clone)]
pub struct AssistantService {
    config: Arc<ProxyConfig>,
    client: UpstreamClient,
}

impl AssistantService {
    pub fn new(config: Arc<ProxyConfig>) -> Result<Self> {
        let client = UpstreamClient::new(&config)?;
        Ok(Self { config, client })
    }

    pub fn with_client(config: Arc<ProxyConfig>, client: UpstreamClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let message = required(req.message.as_deref(), "message", "Message is required")?;
        let image = match req.image_data.as_deref() {
            Some(raw) => ImageInput::parse(raw, req.image_mime_type.as_deref())?,
            None => None,
        };

        info!(
            has_image = image.is_some(),
            is_command = req.is_command,
            "chat request"
        );
        let payload = build_chat_payload(message, image.as_ref(), req.is_command);
        let url = self.config.generate_url(&self.config.chat_model);
        let raw = self.client.send(&url, payload).await.into_result()?;

        let mut result = normalize_chat(&raw)?;
        result.has_image = image.is_some();
        Ok(result.into())
    }

    pub async fn speech(&self, req: SpeechRequest) -> Result<SpeechResponse> {
        let text = required(req.text.as_deref(), "text", "Text is required")?;

        info!(chars = text.chars().count(), "speech request");
        let payload = build_speech_payload(text);
        let url = self.config.generate_url(&self.config.tts_model);
        let raw = self.client.send(&url, payload).await.into_result()?;

        Ok(normalize_speech(&raw)?.into())
    }

    /// Never touches the upstream.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "OK",
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            has_api_key: self.config.has_api_key(),
        }
    }
}

/// Reject absent, empty, or whitespace-only input.
fn required<'a>(value: Option<&'a str>, field: &str, msg: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::validation_with_context(
            msg,
            ErrorContext::new()
                .with_field_path(format!("request.{}", field))
                .with_source("handler"),
        )),
    }
}
