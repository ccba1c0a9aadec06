//! 重试循环：单次尝试 + 分类 + 退避。
//!
//! Retry loop over single attempts.

use crate::client::error_classification::{classify_status, StatusClass};
use crate::client::policy::{Decision, RetryPolicy};
use crate::client::types::{CallStats, UpstreamOutcome, UpstreamRequest};
use crate::config::ProxyConfig;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Client for the upstream generative-content endpoint.
///
/// Cheap to clone; clones share the HTTP connection pool but never a retry budget.
#[derive(Clone)]
pub struct UpstreamClient {
    transport: Arc<HttpTransport>,
    policy: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(config)?),
            policy: RetryPolicy::from_config(config),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `payload` to `url`, retrying transient failures.
    pub async fn send(&self, url: &str, payload: serde_json::Value) -> UpstreamOutcome {
        self.send_with_stats(url, payload).await.0
    }

    /// Same as [`send`](Self::send) but also reports attempts and backoff waits.
    pub async fn send_with_stats(
        &self,
        url: &str,
        payload: serde_json::Value,
    ) -> (UpstreamOutcome, CallStats) {
        let mut request = UpstreamRequest::new(url, payload);
        let mut stats = CallStats {
            client_request_id: Uuid::new_v4().to_string(),
            ..CallStats::default()
        };

        loop {
            stats.attempts = request.attempt;
            let err = match self.attempt_once(&request, &mut stats).await {
                UpstreamOutcome::Success(body) => return (UpstreamOutcome::Success(body), stats),
                UpstreamOutcome::TerminalFailure(e) => {
                    warn!(
                        client_request_id = %stats.client_request_id,
                        attempt = request.attempt,
                        error = %e,
                        "upstream call failed (terminal)"
                    );
                    return (UpstreamOutcome::TerminalFailure(e), stats);
                }
                UpstreamOutcome::RetryableFailure(e) => e,
            };

            match self.policy.decide(&err, request.attempt) {
                Decision::Retry { delay } => {
                    info!(
                        client_request_id = %stats.client_request_id,
                        attempt = request.attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying upstream call"
                    );
                    stats.delays.push(delay);
                    tokio::time::sleep(delay).await;
                    request.attempt += 1;
                }
                Decision::Fail => {
                    warn!(
                        client_request_id = %stats.client_request_id,
                        attempts = request.attempt,
                        error = %err,
                        "upstream retry budget exhausted"
                    );
                    let exhausted = Error::RetriesExhausted {
                        attempts: request.attempt,
                        last: err.to_string(),
                    };
                    return (UpstreamOutcome::TerminalFailure(exhausted), stats);
                }
            }
        }
    }

    /// Issue a single attempt and classify what came back.
    async fn attempt_once(&self, request: &UpstreamRequest, stats: &mut CallStats) -> UpstreamOutcome {
        let resp = match self
            .transport
            .post_json(&request.url, &request.payload, Some(&stats.client_request_id))
            .await
        {
            Ok(resp) => resp,
            Err(e) => return UpstreamOutcome::RetryableFailure(e),
        };

        let status = resp.status().as_u16();
        stats.last_status = Some(status);
        info!(
            client_request_id = %stats.client_request_id,
            attempt = request.attempt,
            http_status = status,
            "upstream responded"
        );

        let body = match resp.text().await {
            Ok(b) => b,
            // The connection dropped mid-body: same as never getting a response.
            Err(e) => {
                return UpstreamOutcome::RetryableFailure(Error::Transport(
                    crate::transport::TransportError::Http(e),
                ))
            }
        };

        match classify_status(status) {
            StatusClass::Success => match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(json) => UpstreamOutcome::Success(json),
                Err(e) => UpstreamOutcome::TerminalFailure(Error::shape_with_context(
                    "upstream returned a non-JSON success body",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("upstream_client"),
                )),
            },
            StatusClass::Retryable => UpstreamOutcome::RetryableFailure(Error::Remote {
                status,
                message: upstream_error_message(&body),
                retryable: true,
            }),
            StatusClass::Terminal => UpstreamOutcome::TerminalFailure(Error::Remote {
                status,
                message: upstream_error_message(&body),
                retryable: false,
            }),
        }
    }
}

/// Pull `error.message` out of an upstream error body, falling back to the raw text.
fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        })
}
