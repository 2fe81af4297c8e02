//! HTTP surface of the gateway.
//!
//! Thin layer over the registry and the streaming pipeline: route handlers
//! resolve targets, kick off the aggregator, and wrap its event stream into
//! a Server-Sent-Events response with the required stream headers.

pub mod handlers;
pub mod schemas;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, CONTENT_TYPE,
};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::error;

use crate::config::Settings;
use crate::pipeline::emit;
use crate::registry::TargetRegistry;
use crate::types::events::WireEvent;
use crate::{BoxStream, Error};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<RwLock<TargetRegistry>>,
}

impl AppState {
    pub fn new(settings: Settings, registry: TargetRegistry) -> Self {
        Self {
            settings: Arc::new(settings),
            registry: Arc::new(RwLock::new(registry)),
        }
    }
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .route("/agents/{key}/query", post(handlers::agent_query))
        .route("/agents/create", post(handlers::create_agent))
        .route("/agents/available", get(handlers::available_agent_types))
        .route("/teams/query", post(handlers::team_query))
        .route("/teams/modes", get(handlers::team_modes))
        .route("/teams/available", get(handlers::available_teams))
        .route("/teams/create", post(handlers::create_team))
        .route("/teams/{key}/query", post(handlers::keyed_team_query))
        .route("/teams/{key}", delete(handlers::delete_team))
        .route("/tools", get(handlers::available_tools))
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

/// Error surfaced by a route handler before streaming begins.
#[derive(Debug)]
pub enum ApiError {
    NotInitialized,
    NotFound(String),
    Validation(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotInitialized => ApiError::NotInitialized,
            Error::TargetNotFound { key } => ApiError::NotFound(format!("{} not found", key)),
            Error::Validation { message } => ApiError::Validation(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotInitialized => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Agent system not initialized".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Validation(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Wrap an aggregator event stream into an SSE response.
///
/// Frames are rendered one at a time and flushed before the next chunk is
/// pulled; a trailing `Err` item from a failed run terminates the body.
pub fn stream_response(events: BoxStream<'static, WireEvent>) -> Result<Response, ApiError> {
    let frames = events.map(|item| match item {
        Ok(event) => Ok(emit::frame(&event)),
        Err(err) => {
            error!(error = %err, "stream aborted by producer failure");
            Err(std::io::Error::other(err.to_string()))
        }
    });

    Response::builder()
        .header(CONTENT_TYPE, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .header(CONNECTION, "keep-alive")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(ACCESS_CONTROL_ALLOW_HEADERS, "*")
        .body(Body::from_stream(frames))
        .map_err(|err| ApiError::Internal(err.to_string()))
}

/// Permissive CORS for every route, honoring a configured origin list.
async fn cors(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = allowed_origin(&state.settings);
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors(response.headers_mut(), &origin);
        return response;
    }
    let mut response = next.run(request).await;
    apply_cors(response.headers_mut(), &origin);
    response
}

fn allowed_origin(settings: &Settings) -> HeaderValue {
    let origins = &settings.server.cors_origins;
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return HeaderValue::from_static("*");
    }
    HeaderValue::from_str(&origins[0]).unwrap_or_else(|_| HeaderValue::from_static("*"))
}

fn apply_cors(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
}
