//! 响应规整：从上游自由格式 JSON 中提取文本、情绪标签、引用与音频。
//!
//! # Response Normalizer
//!
//! The upstream answers with a loosely specified JSON tree. This module
//! parses it into [`GenerateContentResponse`] (every field optional) and
//! then demands exactly the fields each operation needs, failing with
//! [`crate::Error::Shape`] when they are missing instead of passing nulls along.
//!
//! | Operation | Output |
//! |-----------|--------|
//! | [`normalize_chat`] | [`NormalizedChatResult`]: clean text, [`Emotion`], ordered [`Source`]s |
//! | [`normalize_speech`] | [`NormalizedSpeechResult`]: inline audio + MIME type |

mod chat;
mod response;
mod speech;

pub use chat::{extract_emotion, normalize_chat, Emotion, NormalizedChatResult, Source};
pub use response::{
    Candidate, Content, GenerateContentResponse, GroundingAttribution, GroundingChunk,
    GroundingMetadata, InlineData, Part, WebSource,
};
pub use speech::{normalize_speech, NormalizedSpeechResult};
