//! Standalone webhook HTTP server: health, subscription GET, and event POST on one port.

use super::handler::{EventHandler, VerifyQuery, WebhookHelper, WebhookPayload};
use crate::config::{self, Config};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
struct WebhookState {
    helper: WebhookHelper,
    handler: Arc<dyn EventHandler>,
    path: Arc<str>,
}

/// Router with `GET /` (health), `GET {path}` (subscription), and `POST {path}` (events).
pub fn webhook_router(helper: WebhookHelper, path: &str, handler: Arc<dyn EventHandler>) -> Router {
    let state = WebhookState {
        helper,
        handler,
        path: Arc::from(path),
    };
    Router::new()
        .route("/", get(health_http))
        .route(path, get(verify_setup).post(receive_events))
        .with_state(state)
}

/// Serve the webhook on the configured bind/port until SIGINT or SIGTERM.
pub async fn run_webhook_server(config: Config, handler: Arc<dyn EventHandler>) -> Result<()> {
    let helper = WebhookHelper::new(
        config::resolve_app_secret(&config),
        config::resolve_verify_token(&config),
    );
    if !helper.has_app_secret() {
        log::warn!("no app secret configured; webhook signatures will not be checked");
    }
    let path = config::normalize_webhook_path(&config.webhook.path);
    let app = webhook_router(helper, &path, handler);

    let bind_addr = format!("{}:{}", config.webhook.bind.trim(), config.webhook.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("webhook listening on {}{}", bind_addr, path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<WebhookState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "webhook": &*state.path,
        "signatureCheck": state.helper.has_app_secret(),
    }))
}

async fn verify_setup(State(state): State<WebhookState>, Query(query): Query<VerifyQuery>) -> Response {
    state.helper.verify_webhook_setup(&query, None)
}

/// POST {path} — signature check on the raw body, then parse and dispatch.
async fn receive_events(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Err(e) = state.helper.verify_webhook_request(&headers, &body) {
        log::warn!("webhook request rejected: {}", e);
        return StatusCode::FORBIDDEN;
    }
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            log::debug!("webhook body is not a valid payload: {}", e);
            return StatusCode::BAD_REQUEST;
        }
    };
    state.helper.handle_webhook_event(payload, state.handler.clone())
}
