//! Messenger Platform SDK — inbound event classification, outbound message templates,
//! Graph API client, and webhook helpers.
//!
//! The four parts do not call each other; an integration composes them:
//! classify an event, build a reply, send it through the client.

pub mod api;
pub mod config;
pub mod incoming;
pub mod templates;
pub mod webhook;
