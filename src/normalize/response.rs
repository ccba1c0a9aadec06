//! Typed view of a `generateContent` response.
//!
//! Everything is optional or defaulted so that parsing itself never fails on
//! a partial body; the normalizers decide what is required.

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    pub grounding_attributions: Option<Vec<GroundingAttribution>>,
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub text: Option<String>,
    #[serde(alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(alias = "mime_type")]
    pub mime_type: Option<String>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingAttribution {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebSource {
    pub uri: Option<String>,
    pub title: Option<String>,
}

impl GenerateContentResponse {
    pub fn from_value(raw: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(raw.clone()).map_err(|e| {
            Error::shape_with_context(
                "upstream body does not look like a generateContent response",
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("normalizer"),
            )
        })
    }

    /// The first candidate, or a shape error.
    pub fn first_candidate(&self) -> Result<&Candidate> {
        self.candidates.first().ok_or_else(|| {
            Error::shape_with_context(
                "upstream response has no candidates",
                ErrorContext::new()
                    .with_field_path("candidates[0]")
                    .with_source("normalizer"),
            )
        })
    }
}

impl Candidate {
    pub fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }
}
