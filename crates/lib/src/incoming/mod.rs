//! Inbound messaging events (one item of an entry's `messaging` list).
//!
//! Events stay as raw JSON so unknown fields survive; classification is a set of
//! predicates over that JSON that never fail on malformed input.

mod event;

pub use event::{EventKind, MessagingEvent};
