//! Fixed offline-cache configuration.

use crate::{Error, ErrorContext, Result};
use url::Url;

/// Assets precached into the static generation at install time.
pub const STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/manifest.json",
    "/icons/icon-192x192.png",
    "/icons/icon-512x512.png",
];

/// Sync tag the manager responds to.
pub const SYNC_TAG: &str = "background-sync";

#[derive(Debug, Clone)]
pub struct OfflineConfig {
    /// Origin the pages are served from; manifest paths resolve against it.
    pub origin: Url,
    pub api_prefix: String,
    pub assets: Vec<String>,
}

impl OfflineConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            api_prefix: crate::server::API_PREFIX.to_string(),
            assets: STATIC_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.origin.join(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot resolve {} against {}", path, self.origin),
                ErrorContext::new()
                    .with_details(e.to_string())
                    .with_source("offline_cache"),
            )
        })
    }
}
