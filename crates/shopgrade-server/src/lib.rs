//! HTTP adapter for the preview and publish endpoints
//!
//! Turns requests into [`EngineCommand`]s and runs them on the blocking
//! pool; everything below this layer is synchronous.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use shopgrade_core_types::{RequestContext, RequestId, Sensitive};
use shopgrade_engine::commands::preview::PreviewRequest;
use shopgrade_engine::{Engine, EngineCommand};
use tokio::net::TcpListener;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/components/:shop_id", get(preview_handler))
        .route("/shop/:id/publish-upgrade", post(publish_handler))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
///
/// # Errors
///
/// Bind or accept failures.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, build_router(state)).await
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn preview_handler(
    State(state): State<AppState>,
    Path(shop_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| Sensitive::new(v.to_string()));
    let request = PreviewRequest {
        shop_id: Some(shop_id),
        authorization,
        diff: params.contains_key("diff"),
    };
    dispatch(&state, request_context(&headers), EngineCommand::PreviewDiff(request)).await
}

async fn publish_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let cmd = EngineCommand::PublishUpgrade {
        shop_id: id,
        body: body.to_vec(),
    };
    dispatch(&state, request_context(&headers), cmd).await
}

fn request_context(headers: &HeaderMap) -> RequestContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| RequestContext::with_request_id(RequestId::from_string(v.to_string())))
        .unwrap_or_default()
}

async fn dispatch(state: &AppState, ctx: RequestContext, cmd: EngineCommand) -> Response {
    let engine = state.engine.clone();
    let span = tracing::info_span!("request", request_id = %ctx.request_id);
    let joined = tokio::task::spawn_blocking(move || span.in_scope(|| engine.apply(cmd))).await;

    let (status, body) = match joined {
        Ok(Ok(result)) => (result.status(), result.body()),
        Ok(Err(err)) => {
            tracing::error!(request_id = %ctx.request_id, error = %err, "request failed");
            let status = match err.kind().http_status() {
                400 => 400,
                _ => 500,
            };
            (status, json!({ "error": err.message() }))
        }
        Err(join_err) => {
            tracing::error!(request_id = %ctx.request_id, error = %join_err, "handler panicked");
            (500, json!({ "error": "internal error" }))
        }
    };

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(ctx.request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
