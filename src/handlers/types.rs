//! Inbound and outbound JSON bodies.

use crate::normalize::{Emotion, NormalizedChatResult, NormalizedSpeechResult, Source};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    /// Base64 image, optionally as a `data:<mime>;base64,` URL.
    pub image_data: Option<String>,
    /// Overrides the MIME type of `image_data`; defaults to `image/jpeg`.
    pub image_mime_type: Option<String>,
    #[serde(default)]
    pub is_command: bool,
}

impl ChatRequest {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, data: impl Into<String>) -> Self {
        self.image_data = Some(data.into());
        self
    }

    pub fn as_command(mut self) -> Self {
        self.is_command = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub text: String,
    pub emotion: Emotion,
    pub sources: Vec<Source>,
    pub has_image: bool,
}

impl From<NormalizedChatResult> for ChatResponse {
    fn from(r: NormalizedChatResult) -> Self {
        Self {
            success: true,
            text: r.clean_text,
            emotion: r.emotion,
            sources: r.sources,
            has_image: r.has_image,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeechRequest {
    pub text: Option<String>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechResponse {
    pub success: bool,
    pub audio_data: String,
    pub mime_type: String,
}

impl From<NormalizedSpeechResult> for SpeechResponse {
    fn from(r: NormalizedSpeechResult) -> Self {
        Self {
            success: true,
            audio_data: r.audio_data,
            mime_type: r.mime_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub has_api_key: bool,
}

/// Uniform failure body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl From<&crate::Error> for ErrorBody {
    fn from(e: &crate::Error) -> Self {
        Self {
            success: false,
            error: e.public_message(),
        }
    }
}
