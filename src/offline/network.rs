//! Network access used by the offline cache.

use super::request::{FetchRequest, FetchResponse, ResponseType};
use crate::transport::TransportError;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Performs a fetch on behalf of the cache manager.
///
/// `Err` means no response at all (offline, DNS, reset); HTTP error
/// statuses are ordinary `Ok` responses.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

/// `reqwest`-backed network for a page served from `origin`.
pub struct HttpNetwork {
    client: reqwest::Client,
    origin: Url,
}

impl HttpNetwork {
    pub fn new(origin: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
        Ok(Self { client, origin })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;
        let mut builder = self.client.request(method, request.url.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let final_url = resp.url().clone();
        let redirected = final_url != request.url;
        let response_type = if final_url.origin() == self.origin.origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        };
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        Ok(FetchResponse {
            status,
            response_type,
            redirected,
            headers,
            body,
        })
    }
}
