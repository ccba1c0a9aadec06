//! 离线缓存管理器：安装、激活与请求拦截状态机。
//!
//! Offline cache manager state machine.

use super::generation::CacheGeneration;
use super::host::{Notification, WorkerHost, ACTION_DISMISS, ACTION_OPEN};
use super::manifest::{OfflineConfig, SYNC_TAG};
use super::network::Network;
use super::request::{FetchRequest, FetchResponse};
use super::storage::CacheStore;
use crate::{Error, ErrorContext, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Uninstalled,
    Installing,
    /// Installed and idle, waiting for activation.
    Installed,
    Activating,
    Active,
}

/// Which strategy a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Under the API prefix: network-first.
    Api,
    /// GET for a page, stylesheet, script or image: cache-first.
    StaticAsset,
    /// Left to the default network path.
    Unhandled,
}

/// What the manager does with an intercepted fetch.
#[derive(Debug)]
pub enum FetchDisposition {
    Respond(FetchResponse),
    /// Intercepted, but neither network nor cache produced a response.
    Failed(Error),
    /// Not intercepted.
    Passthrough,
}

impl FetchDisposition {
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            FetchDisposition::Respond(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationReport {
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Focused(String),
    Opened(String),
    Dismissed,
}

#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub network_failures: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    network_failures: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
        }
    }
}

/// Browser-side offline cache: precache on install, purge stale generations
/// on activate, then serve API calls network-first and static assets
/// cache-first with background revalidation.
pub struct OfflineCacheManager {
    config: OfflineConfig,
    store: Arc<dyn CacheStore>,
    network: Arc<dyn Network>,
    host: Arc<dyn WorkerHost>,
    state: Mutex<WorkerState>,
    stats: Arc<AtomicStats>,
    revalidations: Mutex<Vec<JoinHandle<()>>>,
}

impl OfflineCacheManager {
    pub fn new(
        config: OfflineConfig,
        store: Arc<dyn CacheStore>,
        network: Arc<dyn Network>,
        host: Arc<dyn WorkerHost>,
    ) -> Self {
        Self {
            config,
            store,
            network,
            host,
            state: Mutex::new(WorkerState::Uninstalled),
            stats: Arc::new(AtomicStats::default()),
            revalidations: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> WorkerState {
        *lock(&self.state)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }

    fn set_state(&self, state: WorkerState) {
        debug!(?state, "offline cache state change");
        *lock(&self.state) = state;
    }

    /// Move `from` -> `to`, or fail if the manager is elsewhere.
    fn transition(&self, from: &[WorkerState], to: WorkerState) -> Result<WorkerState> {
        let mut st = lock(&self.state);
        let current = *st;
        if !from.contains(&current) {
            return Err(Error::cache_with_context(
                format!("cannot move from {:?} to {:?}", current, to),
                ErrorContext::new().with_source("offline_cache"),
            ));
        }
        *st = to;
        Ok(current)
    }

    /// Precache every manifest asset into the static generation.
    ///
    /// All-or-nothing: if any asset cannot be fetched (or is not a 2xx),
    /// nothing is stored and the manager returns to its previous state.
    pub async fn install(&self) -> Result<()> {
        let previous = self.transition(
            &[WorkerState::Uninstalled, WorkerState::Installed],
            WorkerState::Installing,
        )?;

        match self.precache().await {
            Ok(count) => {
                info!(assets = count, cache = CacheGeneration::Static.name(), "precache complete");
                self.set_state(WorkerState::Installed);
                if let Err(e) = self.host.skip_waiting().await {
                    warn!(error = %e, "skip_waiting failed");
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "install failed");
                self.set_state(previous);
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<usize> {
        let static_name = CacheGeneration::Static.name();
        self.store.open(static_name, true).await?;

        let fetches = self.config.assets.iter().map(|path| async move {
            let request = FetchRequest::get(self.config.resolve(path)?);
            let response = self.network.fetch(&request).await.map_err(|e| Error::CacheInstall {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            if !response.is_ok() {
                return Err(Error::CacheInstall {
                    path: path.clone(),
                    reason: format!("HTTP {}", response.status),
                });
            }
            Ok((request.key(), response))
        });
        let fetched = futures::future::try_join_all(fetches).await?;

        let count = fetched.len();
        for (key, response) in fetched {
            self.store.put(static_name, &key, response).await?;
        }
        Ok(count)
    }

    /// Delete every generation not in [`CacheGeneration::ALL`], then claim open pages.
    ///
    /// A failed deletion is logged and does not stop activation.
    pub async fn activate(&self) -> Result<ActivationReport> {
        self.transition(&[WorkerState::Installed], WorkerState::Activating)?;

        let names = match self.store.generation_names().await {
            Ok(names) => names,
            Err(e) => {
                self.set_state(WorkerState::Installed);
                return Err(e);
            }
        };
        let stale: Vec<String> = names
            .into_iter()
            .filter(|n| !CacheGeneration::is_current(n))
            .collect();

        let deletions = stale.iter().map(|name| async move {
            match self.store.delete_generation(name).await {
                Ok(_) => {
                    info!(cache = %name, "deleted stale cache");
                    Some(name.clone())
                }
                Err(e) => {
                    warn!(cache = %name, error = %e, "failed to delete stale cache");
                    None
                }
            }
        });
        let deleted: Vec<String> = futures::future::join_all(deletions)
            .await
            .into_iter()
            .flatten()
            .collect();

        if let Err(e) = self.host.claim_clients().await {
            warn!(error = %e, "claiming clients failed");
        }
        self.set_state(WorkerState::Active);
        Ok(ActivationReport { deleted })
    }

    pub fn classify(&self, request: &FetchRequest) -> RequestClass {
        if request.path().starts_with(&self.config.api_prefix) {
            RequestClass::Api
        } else if request.is_read() && request.destination.is_static_asset() {
            RequestClass::StaticAsset
        } else {
            RequestClass::Unhandled
        }
    }

    /// Route a fetch. Only an active manager intercepts.
    pub async fn handle_fetch(&self, request: FetchRequest) -> FetchDisposition {
        if self.state() != WorkerState::Active {
            return FetchDisposition::Passthrough;
        }
        match self.classify(&request) {
            RequestClass::Api => self.network_first(request).await,
            RequestClass::StaticAsset => self.cache_first(request).await,
            RequestClass::Unhandled => FetchDisposition::Passthrough,
        }
    }

    async fn network_first(&self, request: FetchRequest) -> FetchDisposition {
        match self.network.fetch(&request).await {
            Ok(response) => {
                if response.status == 200 && request.is_read() {
                    self.store_dynamic(&request, response.clone()).await;
                }
                FetchDisposition::Respond(response)
            }
            Err(e) => {
                self.stats.network_failures.fetch_add(1, Ordering::Relaxed);
                debug!(key = %request.key(), error = %e, "network failed, trying cache");
                match self.lookup(&request).await {
                    Some(cached) => FetchDisposition::Respond(cached),
                    None => FetchDisposition::Failed(e),
                }
            }
        }
    }

    /// Cache hit first, with a background refresh into the dynamic generation.
    ///
    /// Lookups search generations in creation order, as `caches.match` does, so
    /// a precached asset keeps being served from the static generation and the
    /// refreshed copy is only seen once that generation is gone.
    async fn cache_first(&self, request: FetchRequest) -> FetchDisposition {
        if let Some(cached) = self.lookup(&request).await {
            self.spawn_revalidation(request);
            return FetchDisposition::Respond(cached);
        }

        match self.network.fetch(&request).await {
            Ok(response) => {
                if response.is_direct_ok() {
                    self.store_dynamic(&request, response.clone()).await;
                }
                FetchDisposition::Respond(response)
            }
            Err(e) => {
                self.stats.network_failures.fetch_add(1, Ordering::Relaxed);
                if request.is_navigation() {
                    if let Some(root) = self.root_document().await {
                        return FetchDisposition::Respond(root);
                    }
                }
                FetchDisposition::Failed(e)
            }
        }
    }

    /// Refresh the dynamic entry for `request` without blocking the caller.
    /// Races with later reads of the same key; last writer wins.
    fn spawn_revalidation(&self, request: FetchRequest) {
        let network = Arc::clone(&self.network);
        let store = Arc::clone(&self.store);
        let stats = Arc::clone(&self.stats);
        let handle = tokio::spawn(async move {
            match network.fetch(&request).await {
                Ok(response) if response.is_direct_ok() => {
                    let key = request.key();
                    match store.put(CacheGeneration::Dynamic.name(), &key, response).await {
                        Ok(()) => {
                            stats.puts.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => warn!(key = %key, error = %e, "revalidation store failed"),
                    }
                }
                Ok(response) => {
                    debug!(status = response.status, "revalidation response not cacheable")
                }
                Err(e) => {
                    stats.network_failures.fetch_add(1, Ordering::Relaxed);
                    debug!(error = %e, "revalidation fetch failed");
                }
            }
        });
        let mut pending = lock(&self.revalidations);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Wait for background revalidations started so far.
    pub async fn wait_until_idle(&self) {
        let pending: Vec<JoinHandle<()>> = std::mem::take(&mut *lock(&self.revalidations));
        for handle in pending {
            if let Err(e) = handle.await {
                warn!(error = %e, "revalidation task panicked");
            }
        }
    }

    async fn lookup(&self, request: &FetchRequest) -> Option<FetchResponse> {
        match self.store.match_any(&request.key()).await {
            Ok(Some(entry)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.response)
            }
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(e) => {
                warn!(error = %e, "cache lookup failed");
                None
            }
        }
    }

    async fn root_document(&self) -> Option<FetchResponse> {
        let url = self.config.resolve("/").ok()?;
        self.lookup(&FetchRequest::get(url)).await
    }

    async fn store_dynamic(&self, request: &FetchRequest, response: FetchResponse) {
        let key = request.key();
        match self
            .store
            .put(CacheGeneration::Dynamic.name(), &key, response)
            .await
        {
            Ok(()) => {
                self.stats.puts.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => warn!(key = %key, error = %e, "dynamic cache store failed"),
        }
    }

    pub async fn handle_sync(&self, tag: &str) -> SyncOutcome {
        if tag == SYNC_TAG {
            info!(tag, "background sync");
            SyncOutcome::Completed
        } else {
            debug!(tag, "ignoring unknown sync tag");
            SyncOutcome::Ignored
        }
    }

    pub async fn handle_push(&self, payload: Option<&[u8]>) -> Result<Notification> {
        let notification = Notification::from_push(payload);
        self.host.show_notification(&notification).await?;
        Ok(notification)
    }

    /// `open` (or a click on the body) focuses a page showing the root path
    /// or opens one; `dismiss` just closes the notification.
    pub async fn handle_notification_click(
        &self,
        notification: &Notification,
        action: Option<&str>,
    ) -> Result<ClickOutcome> {
        self.host.close_notification(notification).await?;

        match action {
            Some(ACTION_DISMISS) => Ok(ClickOutcome::Dismissed),
            None | Some(ACTION_OPEN) => {
                let clients = self.host.window_clients().await?;
                if let Some(client) = clients.iter().find(|c| c.url.path() == "/") {
                    self.host.focus(&client.id).await?;
                    return Ok(ClickOutcome::Focused(client.id.clone()));
                }
                self.host.open_window(&notification.url).await?;
                Ok(ClickOutcome::Opened(notification.url.clone()))
            }
            Some(other) => {
                debug!(action = other, "unknown notification action");
                Ok(ClickOutcome::Dismissed)
            }
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
