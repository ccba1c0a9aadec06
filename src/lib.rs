//! # ai-voice-proxy
//!
//! 语音助手后端代理：带指数退避重试的上游调用、响应规整，以及浏览器端的两级离线缓存。
//!
//! Thin backend proxy for a chat/voice assistant web app, plus the
//! browser-side offline cache that fronts it.
//!
//! ## Overview
//!
//! The backend forwards chat and text-to-speech requests to a hosted
//! generative-language API, retrying transient failures with exponential
//! backoff, and reshapes the answers (emotion tag, citations, inline audio)
//! into small JSON bodies. The offline cache serves static assets and API
//! responses when the network is gone.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_voice_proxy::{handlers::AssistantService, server, ProxyConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ai_voice_proxy::Result<()> {
//!     let config = Arc::new(ProxyConfig::from_env());
//!     let service = AssistantService::new(config.clone())?;
//!     let app = server::router(service);
//!     let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Immutable process configuration |
//! | [`transport`] | Single-attempt HTTP transport |
//! | [`client`] | Upstream client with retry/backoff |
//! | [`normalize`] | Upstream response shaping |
//! | [`handlers`] | Chat, speech and health operations |
//! | [`server`] | axum routes |
//! | [`offline`] | Two-tier offline cache manager |

pub mod client;
pub mod config;
pub mod handlers;
pub mod normalize;
pub mod offline;
pub mod server;
pub mod transport;

pub use client::{UpstreamClient, UpstreamOutcome};
pub use config::ProxyConfig;
pub use handlers::AssistantService;
pub use normalize::{Emotion, NormalizedChatResult, NormalizedSpeechResult};
pub use offline::OfflineCacheManager;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
