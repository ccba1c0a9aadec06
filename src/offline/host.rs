//! The environment the cache manager runs in: open pages and notifications.

use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_NOTIFICATION_TITLE: &str = "AI Voice Assistant";
pub const DEFAULT_NOTIFICATION_BODY: &str = "You have a new message";
pub const DEFAULT_NOTIFICATION_ICON: &str = "/icons/icon-192x192.png";

pub const ACTION_OPEN: &str = "open";
pub const ACTION_DISMISS: &str = "dismiss";

/// An open page controlled (or controllable) by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    /// Path opened when the notification is activated.
    pub url: String,
    pub actions: Vec<NotificationAction>,
}

#[derive(Debug, Default, Deserialize)]
struct PushPayload {
    title: Option<String>,
    body: Option<String>,
    icon: Option<String>,
    url: Option<String>,
}

impl Notification {
    /// Build from a push payload; missing or unparseable fields use defaults.
    pub fn from_push(payload: Option<&[u8]>) -> Self {
        let parsed: PushPayload = payload
            .and_then(|p| serde_json::from_slice(p).ok())
            .unwrap_or_default();
        Self {
            title: parsed
                .title
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_TITLE.to_string()),
            body: parsed
                .body
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_BODY.to_string()),
            icon: parsed
                .icon
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_ICON.to_string()),
            url: parsed.url.unwrap_or_else(|| "/".to_string()),
            actions: vec![
                NotificationAction {
                    action: ACTION_OPEN.to_string(),
                    title: "Open".to_string(),
                },
                NotificationAction {
                    action: ACTION_DISMISS.to_string(),
                    title: "Dismiss".to_string(),
                },
            ],
        }
    }
}

/// Lifecycle and client operations of the hosting runtime.
#[async_trait]
pub trait WorkerHost: Send + Sync {
    /// Replace any waiting installation without waiting for old pages to close.
    async fn skip_waiting(&self) -> Result<()>;
    /// Take control of all open pages without a reload.
    async fn claim_clients(&self) -> Result<()>;
    async fn window_clients(&self) -> Result<Vec<WindowClient>>;
    async fn focus(&self, client_id: &str) -> Result<()>;
    async fn open_window(&self, url: &str) -> Result<()>;
    async fn show_notification(&self, notification: &Notification) -> Result<()>;
    async fn close_notification(&self, notification: &Notification) -> Result<()>;
}
