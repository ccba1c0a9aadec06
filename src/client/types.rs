use crate::Error;
use std::time::Duration;

/// One upstream call: where it goes, what it carries, how many tries so far.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub url: String,
    pub payload: serde_json::Value,
    /// 1-based number of the attempt about to be (or last) issued.
    pub attempt: u32,
}

impl UpstreamRequest {
    pub fn new(url: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            payload,
            attempt: 1,
        }
    }
}

/// Result of an upstream attempt or of a whole call.
///
/// A single attempt may yield any variant; [`super::UpstreamClient::send`]
/// only ever returns `Success` or `TerminalFailure`.
#[derive(Debug)]
pub enum UpstreamOutcome {
    Success(serde_json::Value),
    RetryableFailure(Error),
    TerminalFailure(Error),
}

impl UpstreamOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpstreamOutcome::Success(_))
    }

    pub fn into_result(self) -> crate::Result<serde_json::Value> {
        match self {
            UpstreamOutcome::Success(body) => Ok(body),
            UpstreamOutcome::RetryableFailure(e) | UpstreamOutcome::TerminalFailure(e) => Err(e),
        }
    }
}

/// What happened during one `send`, for logging and tests.
#[derive(Debug, Clone, Default)]
pub struct CallStats {
    pub client_request_id: String,
    pub attempts: u32,
    /// Backoff waits actually taken, in order.
    pub delays: Vec<Duration>,
    pub last_status: Option<u16>,
}
