//! ai-voice-proxy: 语音助手后端代理服务
//!
//! Usage:
//!   ai-voice-proxy
//!
//! Configuration is read from the environment once at startup
//! (`GEMINI_API_KEY`, `PORT`, see `ProxyConfig::from_env`).

use ai_voice_proxy::{server, AssistantService, ProxyConfig};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(ProxyConfig::from_env());
    if !config.has_api_key() {
        warn!("GEMINI_API_KEY is not set; chat and TTS calls will fail upstream");
    }

    let service = AssistantService::new(Arc::clone(&config))
        .context("failed to build upstream client")?;
    let app = server::router(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!(
        port = config.port,
        static_dir = %config.static_dir.display(),
        chat_model = %config.chat_model,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
