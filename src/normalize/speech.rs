use super::response::GenerateContentResponse;
use crate::{Error, ErrorContext, Result};
use serde::Serialize;

/// Inline audio returned by the upstream, still base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSpeechResult {
    pub audio_data: String,
    pub mime_type: String,
}

/// Pull the audio payload out of `candidates[0].content.parts[0].inlineData`.
pub fn normalize_speech(raw: &serde_json::Value) -> Result<NormalizedSpeechResult> {
    let response = GenerateContentResponse::from_value(raw)?;
    let candidate = response.first_candidate()?;

    let inline = candidate
        .parts()
        .first()
        .and_then(|p| p.inline_data.as_ref());

    match inline {
        Some(d) => match (d.data.as_deref(), d.mime_type.as_deref()) {
            (Some(data), Some(mime)) if !data.is_empty() && !mime.is_empty() => {
                Ok(NormalizedSpeechResult {
                    audio_data: data.to_string(),
                    mime_type: mime.to_string(),
                })
            }
            _ => Err(missing_audio("inline audio is missing data or MIME type")),
        },
        None => Err(missing_audio("no inline audio in upstream response")),
    }
}

fn missing_audio(msg: &str) -> Error {
    Error::shape_with_context(
        msg,
        ErrorContext::new()
            .with_field_path("candidates[0].content.parts[0].inlineData")
            .with_source("normalizer"),
    )
}
