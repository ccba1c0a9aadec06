//! HTTP 接口：将处理器挂载为 axum 路由。
//!
//! HTTP surface.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `POST /api/chat` | [`AssistantService::chat`] |
//! | `POST /api/tts` | [`AssistantService::speech`] |
//! | `GET /api/health` | [`AssistantService::health`] |
//! | `GET /` and other paths | static frontend files |

use crate::handlers::{AssistantService, ChatRequest, ErrorBody, SpeechRequest};
use crate::{Error, ErrorContext};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Reserved path prefix of the JSON API.
pub const API_PREFIX: &str = "/api/";

/// Handler error rendered as `{success:false, error}`.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self(Error::validation_with_context(
            format!("Invalid JSON body: {}", r.body_text()),
            ErrorContext::new().with_source("http"),
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        (status, Json(ErrorBody::from(&self.0))).into_response()
    }
}

pub fn router(service: AssistantService) -> Router {
    let static_dir = service.config().static_dir.clone();
    let index = static_dir.join("index.html");

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/tts", post(tts))
        .route("/api/health", get(health))
        .route_service("/", ServeFile::new(index))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(service)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn chat(
    State(service): State<AssistantService>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    Ok(Json(service.chat(req).await?))
}

async fn tts(
    State(service): State<AssistantService>,
    body: Result<Json<SpeechRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    Ok(Json(service.speech(req).await?))
}

async fn health(State(service): State<AssistantService>) -> impl IntoResponse {
    Json(service.health())
}
