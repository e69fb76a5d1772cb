//! Webhook helpers: subscription challenge, `x-hub-signature` check, and event fan-out.
//!
//! The helpers work on axum request/response types. [`webhook_router`] wires all three
//! into one route; hosts with their own router can call the [`WebhookHelper`] methods directly.

mod handler;
mod server;
mod signature;

pub use handler::{
    dispatch_events, EventHandler, VerifyQuery, WebhookEntry, WebhookError, WebhookHelper,
    WebhookPayload,
};
pub use server::{run_webhook_server, webhook_router};
pub use signature::{sign_payload, signature_header, verify_signature, SIGNATURE_HEADER};
