//! Error classification logic

/// How the retry loop treats an upstream HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Throttling or server-side trouble; worth another attempt.
    Retryable,
    /// Client-side problem; another attempt would fail the same way.
    Terminal,
}

/// Classify an upstream status code.
///
/// - 2xx is success
/// - 429 and every 5xx are retryable
/// - everything else (including 1xx/3xx that reach us) is terminal
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        429 => StatusClass::Retryable,
        s if s >= 500 => StatusClass::Retryable,
        _ => StatusClass::Terminal,
    }
}
