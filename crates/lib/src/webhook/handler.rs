//! Webhook request handling: setup verification, signature verification, event dispatch.

use super::signature::{verify_signature, SIGNATURE_HEADER};
use crate::incoming::MessagingEvent;
use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("missing {} header", SIGNATURE_HEADER)]
    MissingSignature,
    #[error("malformed {} header", SIGNATURE_HEADER)]
    MalformedSignature,
    #[error("webhook signature mismatch")]
    SignatureMismatch,
}

/// Query parameters of the subscription GET request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Webhook POST body: `{object, entry: [{id, time, messaging: [event, ...]}]}`.
///
/// Parsing never fails on shape: a non-array `entry` yields no entries, an entry without a
/// `messaging` array yields no events, and mistyped `object`/`id`/`time` are dropped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhookEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    pub messaging: Vec<MessagingEvent>,
}

fn array_items(value: Option<&mut Value>) -> Vec<Value> {
    match value.map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

impl WebhookEntry {
    fn from_value(mut value: Value) -> Self {
        Self {
            id: value.get("id").and_then(Value::as_str).map(String::from),
            time: value.get("time").and_then(Value::as_i64),
            messaging: array_items(value.get_mut("messaging"))
                .into_iter()
                .map(MessagingEvent::new)
                .collect(),
        }
    }
}

impl WebhookPayload {
    /// Walk a parsed body, keeping every entry and event that has the expected shape.
    pub fn from_value(mut value: Value) -> Self {
        Self {
            object: value.get("object").and_then(Value::as_str).map(String::from),
            entry: array_items(value.get_mut("entry"))
                .into_iter()
                .map(WebhookEntry::from_value)
                .collect(),
        }
    }

    /// All messaging events across entries, in delivery order.
    pub fn into_events(self) -> impl Iterator<Item = MessagingEvent> {
        self.entry.into_iter().flat_map(|e| e.messaging)
    }
}

impl<'de> Deserialize<'de> for WebhookPayload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Receives each messaging event of a webhook delivery.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: MessagingEvent);
}

#[async_trait]
impl<F> EventHandler for F
where
    F: Fn(MessagingEvent) + Send + Sync,
{
    async fn handle_event(&self, event: MessagingEvent) {
        self(event)
    }
}

/// Call `f` once per messaging event, entry by entry, in array order. Returns the number of events.
pub fn dispatch_events<F>(payload: &WebhookPayload, mut f: F) -> usize
where
    F: FnMut(&MessagingEvent),
{
    let mut count = 0;
    for entry in &payload.entry {
        for event in &entry.messaging {
            f(event);
            count += 1;
        }
    }
    count
}

/// Holds the app secret and verify token configured for one app.
#[derive(Debug, Clone, Default)]
pub struct WebhookHelper {
    app_secret: Option<String>,
    verify_token: Option<String>,
}

impl WebhookHelper {
    /// Without an app secret, signature checks always pass.
    pub fn new(app_secret: Option<String>, verify_token: Option<String>) -> Self {
        Self {
            app_secret: app_secret.filter(|s| !s.is_empty()),
            verify_token: verify_token.filter(|s| !s.is_empty()),
        }
    }

    pub fn has_app_secret(&self) -> bool {
        self.app_secret.is_some()
    }

    /// Answer the subscription GET: 200 with `hub.challenge` when the token matches and
    /// `hub.mode` is `subscribe`, 403 otherwise. A non-empty `verify_token` overrides the configured token.
    pub fn verify_webhook_setup(&self, query: &VerifyQuery, verify_token: Option<&str>) -> Response {
        let expected = verify_token
            .filter(|t| !t.is_empty())
            .or(self.verify_token.as_deref());
        let token_ok = matches!(
            (query.verify_token.as_deref(), expected),
            (Some(got), Some(want)) if got == want
        );
        if token_ok && query.mode.as_deref() == Some("subscribe") {
            log::info!("webhook subscription verified");
            (StatusCode::OK, query.challenge.clone().unwrap_or_default()).into_response()
        } else {
            log::warn!("webhook subscription rejected (mode: {:?})", query.mode);
            StatusCode::FORBIDDEN.into_response()
        }
    }

    /// Check `x-hub-signature` against the raw body. No-op when no app secret is set.
    pub fn verify_webhook_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), WebhookError> {
        let Some(secret) = self.app_secret.as_deref() else {
            return Ok(());
        };
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(WebhookError::MissingSignature)?;
        verify_signature(secret, body, header)
    }

    /// Acknowledge the delivery with 200 and hand its events to `handler` on a spawned task,
    /// one at a time in order. Handler failures never reach the response.
    pub fn handle_webhook_event(
        &self,
        payload: WebhookPayload,
        handler: Arc<dyn EventHandler>,
    ) -> StatusCode {
        tokio::spawn(async move {
            for event in payload.into_events() {
                log::debug!("webhook event: {:?}", event.kind());
                handler.handle_event(event).await;
            }
        });
        StatusCode::OK
    }
}
