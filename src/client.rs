//! 上游客户端：带指数退避重试的单请求代理。
//!
//! Upstream client with a per-request retry budget.
//!
//! Each call to [`UpstreamClient::send`] owns its own budget; nothing is
//! shared between calls (no circuit breaker, no pooled budget).

pub mod core;
mod error_classification;
pub mod policy;
pub mod types;

pub use self::core::UpstreamClient;
pub use error_classification::{classify_status, StatusClass};
pub use policy::{Decision, RetryPolicy};
pub use types::{CallStats, UpstreamOutcome, UpstreamRequest};
