//! 请求处理：校验输入、构造上游负载、调用上游并规整结果。
//!
//! Request handlers for chat, text-to-speech and health.
//!
//! Handlers return `Result`; the HTTP layer in [`crate::server`] turns every
//! `Err` into a `{success:false, error}` body so nothing escapes as a crash.

pub mod payload;
mod service;
pub mod types;

pub use service::AssistantService;
pub use types::{
    ChatRequest, ChatResponse, ErrorBody, HealthResponse, SpeechRequest, SpeechResponse,
};
