//! 网络传输层：对上游生成式 API 的单次 HTTP 调用。
//!
//! Single-attempt HTTP transport to the upstream service. Retry policy lives
//! in [`crate::client`]; this layer only sends and reports what happened.

mod http;

pub use http::{HttpTransport, TransportError};
