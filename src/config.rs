//! 运行配置：进程启动时读取一次，之后只读共享。
//!
//! Process configuration, read once at startup.
//!
//! The upstream credential is optional: a missing key does not stop the
//! server from starting, it only makes every chat/TTS call fail upstream.

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Immutable configuration passed into the upstream client and handlers.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub api_key: Option<String>,
    pub port: u16,
    pub base_url: String,
    pub chat_model: String,
    pub tts_model: String,
    pub max_retries: u32,
    pub retry_base_delay: Duration,
    pub request_timeout: Duration,
    pub outbound_proxy: Option<String>,
    pub static_dir: PathBuf,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_MS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            outbound_proxy: None,
            static_dir: PathBuf::from("public"),
        }
    }
}

impl ProxyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let defaults = Self::default();
        Self {
            api_key,
            port: parse_env("PORT", DEFAULT_PORT),
            base_url: env::var("AI_PROXY_BASE_URL").unwrap_or(defaults.base_url),
            chat_model: env::var("AI_PROXY_CHAT_MODEL").unwrap_or(defaults.chat_model),
            tts_model: env::var("AI_PROXY_TTS_MODEL").unwrap_or(defaults.tts_model),
            max_retries: parse_env("AI_PROXY_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            retry_base_delay: Duration::from_millis(parse_env(
                "AI_PROXY_RETRY_BASE_MS",
                DEFAULT_RETRY_BASE_MS,
            )),
            request_timeout: Duration::from_secs(parse_env(
                "AI_HTTP_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )),
            outbound_proxy: env::var("AI_PROXY_URL").ok(),
            static_dir: env::var("AI_PROXY_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `generateContent` endpoint for the given model.
    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                warn!(var = name, value = %raw, "ignoring unparseable environment value");
                default
            }
        },
        Err(_) => default,
    }
}
