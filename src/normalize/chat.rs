use super::response::{Candidate, GenerateContentResponse, WebSource};
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Leading `[EMOTION: TAG]` marker, case-insensitive.
static EMOTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\[\s*EMOTION\s*:\s*(NEUTRAL|JOY|INTEREST|CONFUSION)\s*\]")
        .unwrap_or_else(|e| panic!("invalid emotion pattern: {e}"))
});

/// Emotion the assistant's answer is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Emotion {
    #[default]
    Neutral,
    Joy,
    Interest,
    Confusion,
}

impl Emotion {
    pub const ALL: [Emotion; 4] = [
        Emotion::Neutral,
        Emotion::Joy,
        Emotion::Interest,
        Emotion::Confusion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "NEUTRAL",
            Emotion::Joy => "JOY",
            Emotion::Interest => "INTEREST",
            Emotion::Confusion => "CONFUSION",
        }
    }

    /// Case-insensitive lookup of one of the four tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(tag.trim()))
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web citation attached to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChatResult {
    pub clean_text: String,
    pub emotion: Emotion,
    pub sources: Vec<Source>,
    pub has_image: bool,
}

/// Split a leading emotion marker off `text`.
///
/// Without a marker the text comes back untouched and the emotion is NEUTRAL,
/// so running this on already-cleaned text is a no-op.
pub fn extract_emotion(text: &str) -> (Emotion, String) {
    let Some(caps) = EMOTION_MARKER.captures(text) else {
        return (Emotion::Neutral, text.to_string());
    };
    let emotion = caps
        .get(1)
        .and_then(|m| Emotion::from_tag(m.as_str()))
        .unwrap_or_default();
    let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
    (emotion, text[end..].trim().to_string())
}

/// Normalize a chat answer.
///
/// `has_image` is always `false` here; the chat handler sets it from the
/// inbound request.
pub fn normalize_chat(raw: &serde_json::Value) -> Result<NormalizedChatResult> {
    let response = GenerateContentResponse::from_value(raw)?;
    let candidate = response.first_candidate()?;

    let texts: Vec<&str> = candidate
        .parts()
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    let text = texts.concat();
    if text.trim().is_empty() {
        return Err(Error::shape_with_context(
            "upstream candidate carries no text",
            ErrorContext::new()
                .with_field_path("candidates[0].content.parts[].text")
                .with_source("normalizer"),
        ));
    }

    let (emotion, clean_text) = extract_emotion(&text);
    Ok(NormalizedChatResult {
        clean_text,
        emotion,
        sources: extract_sources(candidate),
        has_image: false,
    })
}

/// Citations in upstream order; entries missing a URI or title are skipped.
/// Repeated URIs are kept, one entry per attribution.
fn extract_sources(candidate: &Candidate) -> Vec<Source> {
    let webs: Vec<&WebSource> = match &candidate.grounding_attributions {
        Some(attrs) => attrs.iter().filter_map(|a| a.web.as_ref()).collect(),
        None => candidate
            .grounding_metadata
            .iter()
            .flat_map(|m| m.grounding_chunks.iter())
            .filter_map(|c| c.web.as_ref())
            .collect(),
    };

    webs.into_iter()
        .filter_map(|w| match (w.uri.as_deref(), w.title.as_deref()) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => Some(Source {
                uri: uri.to_string(),
                title: title.to_string(),
            }),
            _ => None,
        })
        .collect()
}
