//! In-memory network and host doubles for the offline cache

use ai_voice_proxy::offline::{
    FetchRequest, FetchResponse, Network, Notification, RequestKey, WindowClient, WorkerHost,
};
use ai_voice_proxy::transport::TransportError;
use ai_voice_proxy::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use url::Url;

pub const ORIGIN: &str = "https://app.example";

pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

/// Routes keyed by request identity; unknown routes answer 404.
#[derive(Default)]
pub struct FakeNetwork {
    routes: Mutex<HashMap<RequestKey, FetchResponse>>,
    offline: AtomicBool,
    calls: Mutex<Vec<RequestKey>>,
}

impl FakeNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, request: &FetchRequest, response: FetchResponse) {
        self.routes.lock().unwrap().insert(request.key(), response);
    }

    pub fn route_get(&self, path: &str, body: &str) {
        self.route(&FetchRequest::get(url(path)), FetchResponse::ok(body.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RequestKey> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for FakeNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(request.key());
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Transport(TransportError::Other("offline".into())));
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(&request.key())
            .cloned()
            .unwrap_or_else(|| FetchResponse::new(404, "not found")))
    }
}

/// Records every host call.
#[derive(Default)]
pub struct RecordingHost {
    pub clients: Mutex<Vec<WindowClient>>,
    pub events: Mutex<Vec<String>>,
    pub shown: Mutex<Vec<Notification>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(self, id: &str, path: &str) -> Self {
        self.clients.lock().unwrap().push(WindowClient {
            id: id.to_string(),
            url: url(path),
        });
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl WorkerHost for RecordingHost {
    async fn skip_waiting(&self) -> Result<()> {
        self.record("skip_waiting".into());
        Ok(())
    }

    async fn claim_clients(&self) -> Result<()> {
        self.record("claim".into());
        Ok(())
    }

    async fn window_clients(&self) -> Result<Vec<WindowClient>> {
        Ok(self.clients.lock().unwrap().clone())
    }

    async fn focus(&self, client_id: &str) -> Result<()> {
        self.record(format!("focus:{}", client_id));
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        self.record(format!("open:{}", url));
        Ok(())
    }

    async fn show_notification(&self, notification: &Notification) -> Result<()> {
        self.shown.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn close_notification(&self, _notification: &Notification) -> Result<()> {
        self.record("close".into());
        Ok(())
    }
}
