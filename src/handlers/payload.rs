//! Upstream request bodies for chat and speech.

use crate::{Error, ErrorContext, Result};
use base64::Engine;
use serde_json::{json, Value};

/// Instruction attached to every chat call so answers start with an emotion tag.
pub const SYSTEM_INSTRUCTION: &str = "You are a friendly voice assistant. \
Begin every reply with exactly one emotion tag chosen from \
[EMOTION: NEUTRAL], [EMOTION: JOY], [EMOTION: INTEREST] or [EMOTION: CONFUSION], \
followed by your answer. Keep answers short and conversational because they are read aloud.";

/// Prebuilt voice used for every TTS call.
pub const VOICE_PRESET: &str = "Kore";

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A validated inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub mime_type: String,
    /// Base64 without any `data:` prefix.
    pub data: String,
}

impl ImageInput {
    /// Parse raw base64 or a `data:<mime>;base64,<data>` URL.
    ///
    /// Returns `Ok(None)` for an empty string. `mime_override` wins over the
    /// data URL's MIME type; without either the image is taken to be JPEG.
    pub fn parse(raw: &str, mime_override: Option<&str>) -> Result<Option<Self>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let (url_mime, data) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest.split_once(',').ok_or_else(|| {
                    invalid_image("image data URL has no ',' separator")
                })?;
                let mime = header.strip_suffix(";base64").ok_or_else(|| {
                    invalid_image("image data URL must be base64 encoded")
                })?;
                (Some(mime), data)
            }
            None => (None, raw),
        };

        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| invalid_image(&format!("image data is not valid base64: {}", e)))?;

        let mime_type = mime_override
            .filter(|m| !m.trim().is_empty())
            .or(url_mime.filter(|m| !m.is_empty()))
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_string();
        if !mime_type.starts_with("image/") {
            return Err(invalid_image(&format!("unsupported image MIME type: {}", mime_type)));
        }

        Ok(Some(Self {
            mime_type,
            data: data.to_string(),
        }))
    }
}

fn invalid_image(msg: &str) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new()
            .with_field_path("request.imageData")
            .with_source("chat_handler"),
    )
}

/// Multi-part chat body: text, optional inline image, system instruction,
/// and search grounding unless this is a command.
pub fn build_chat_payload(message: &str, image: Option<&ImageInput>, is_command: bool) -> Value {
    let mut parts = vec![json!({ "text": message })];
    if let Some(img) = image {
        parts.push(json!({
            "inlineData": { "mimeType": img.mime_type, "data": img.data }
        }));
    }

    let mut body = json!({
        "contents": [{ "role": "user", "parts": parts }],
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
    });
    if !is_command {
        body["tools"] = json!([{ "google_search": {} }]);
    }
    body
}

/// Audio-only generation request with the fixed voice preset.
pub fn build_speech_payload(text: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": text }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": VOICE_PRESET }
                }
            }
        }
    })
}
