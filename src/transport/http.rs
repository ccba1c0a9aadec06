use crate::config::ProxyConfig;
use crate::Result;
use reqwest::Proxy;
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the upstream credential.
const API_KEY_HEADER: &str = "x-goog-api-key";
/// Our own correlation id. The upstream may ignore it.
const REQUEST_ID_HEADER: &str = "x-request-id";

pub struct HttpTransport {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.outbound_proxy {
            match Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => warn!(proxy = %proxy_url, error = %e, "ignoring invalid outbound proxy URL"),
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// POST a JSON body and hand back the raw response, whatever its status.
    ///
    /// Only connection-level failures become `Err`; status handling is the
    /// caller's job.
    pub async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        client_request_id: Option<&str>,
    ) -> Result<reqwest::Response> {
        let mut req = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body);

        if let Some(key) = &self.api_key {
            req = req.header(API_KEY_HEADER, key);
        }
        if let Some(id) = client_request_id {
            req = req.header(REQUEST_ID_HEADER, id);
        }

        debug!(url, client_request_id, "sending upstream request");
        req.send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
