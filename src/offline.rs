//! 离线缓存：静态资源预缓存 + 运行时动态缓存的两级缓存管理。
//!
//! # Offline Cache Manager
//!
//! A two-tier cache that sits between the browser UI and the network,
//! modelled on the service-worker lifecycle.
//!
//! ## Lifecycle
//!
//! `Uninstalled -> Installing -> Installed -> Activating -> Active`
//!
//! - **install**: fetch every asset in [`STATIC_ASSETS`] into the static
//!   generation; one failure aborts the whole install.
//! - **activate**: delete every generation whose name is not one of
//!   [`CacheGeneration::ALL`], then claim open pages.
//!
//! ## Fetch strategies
//!
//! | Request | Strategy | Stored into dynamic generation when |
//! |---------|----------|-------------------------------------|
//! | path under `/api/` | network-first, cache on failure | GET and status 200 |
//! | GET page/style/script/image | cache-first + background refresh | status 200, same-origin, not redirected |
//! | anything else | not intercepted | never |
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`OfflineCacheManager`] | State machine and fetch routing |
//! | [`CacheStore`] / [`MemoryCacheStore`] | Named generations of request/response snapshots |
//! | [`Network`] / [`HttpNetwork`] | Outbound fetches |
//! | [`WorkerHost`] | Open pages, claiming, notifications |

mod generation;
mod host;
mod manifest;
mod network;
mod request;
mod storage;
mod worker;

pub use generation::{CacheGeneration, CACHE_VERSION};
pub use host::{
    Notification, NotificationAction, WindowClient, WorkerHost, ACTION_DISMISS, ACTION_OPEN,
    DEFAULT_NOTIFICATION_BODY, DEFAULT_NOTIFICATION_ICON, DEFAULT_NOTIFICATION_TITLE,
};
pub use manifest::{OfflineConfig, STATIC_ASSETS, SYNC_TAG};
pub use network::{HttpNetwork, Network};
pub use request::{FetchRequest, FetchResponse, RequestDestination, RequestKey, ResponseType};
pub use storage::{CacheEntry, CacheStore, GenerationInfo, MemoryCacheStore};
pub use worker::{
    ActivationReport, CacheStats, ClickOutcome, FetchDisposition, OfflineCacheManager,
    RequestClass, SyncOutcome, WorkerState,
};
