//! Messaging event wrapper and classifier predicates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One messaging event as delivered by the platform (webhook POST body, `entry[].messaging[]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessagingEvent(Value);

/// Best single classification of an event. Predicates on [`MessagingEvent`] may overlap;
/// this picks the most specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Echo,
    QuickReply,
    Attachment,
    Text,
    Postback,
    Referral,
    Optin,
    AccountLinking,
    Read,
    Delivery,
    Unknown,
}

impl From<Value> for MessagingEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl MessagingEvent {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Page-scoped id of the user who triggered the event (`sender.id`).
    pub fn sender_id(&self) -> Option<&str> {
        self.0.get("sender")?.get("id")?.as_str()
    }

    /// Page id the event was delivered to (`recipient.id`).
    pub fn recipient_id(&self) -> Option<&str> {
        self.0.get("recipient")?.get("id")?.as_str()
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.0.get("timestamp")?.as_i64()
    }

    /// The `message` object, if present. A non-object `message` counts as absent.
    pub fn message(&self) -> Option<&Value> {
        self.0.get("message").filter(|m| m.is_object())
    }

    /// Message text, if any (also set on quick replies and echoes).
    pub fn text(&self) -> Option<&str> {
        self.message()?.get("text")?.as_str()
    }

    /// Developer payload of a quick reply (`message.quick_reply.payload`).
    pub fn quick_reply_payload(&self) -> Option<&str> {
        self.message()?.get("quick_reply")?.get("payload")?.as_str()
    }

    /// Developer payload of a postback button (`postback.payload`).
    pub fn postback_payload(&self) -> Option<&str> {
        self.0.get("postback")?.get("payload")?.as_str()
    }

    /// Attachments of a message, empty when there are none.
    pub fn attachments(&self) -> &[Value] {
        self.message()
            .and_then(|m| m.get("attachments"))
            .and_then(|a| a.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn message_has(&self, field: &str) -> bool {
        self.message()
            .and_then(|m| m.get(field))
            .is_some_and(|v| !v.is_null())
    }

    fn has(&self, field: &str) -> bool {
        self.0.get(field).is_some()
    }

    /// Plain text message: not an echo, not a quick reply, no attachments, non-empty text.
    pub fn is_text_message(&self) -> bool {
        self.message().is_some()
            && !self.is_echo()
            && !self.message_has("quick_reply")
            && !self.message_has("attachments")
            && self.text().is_some_and(|t| !t.is_empty())
    }

    pub fn is_quick_reply(&self) -> bool {
        self.message_has("quick_reply")
    }

    pub fn is_attachment(&self) -> bool {
        self.message_has("attachments")
    }

    /// Message sent by the page itself, echoed back to the webhook.
    pub fn is_echo(&self) -> bool {
        self.message()
            .and_then(|m| m.get("is_echo"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_referral(&self) -> bool {
        self.has("referral")
    }

    pub fn is_postback(&self) -> bool {
        self.has("postback")
    }

    pub fn is_optin(&self) -> bool {
        self.has("optin")
    }

    pub fn is_account_linking(&self) -> bool {
        self.has("account_linking")
    }

    pub fn is_read_confirmation(&self) -> bool {
        self.has("read")
    }

    pub fn is_delivery_confirmation(&self) -> bool {
        self.has("delivery")
    }

    pub fn kind(&self) -> EventKind {
        if self.is_echo() {
            EventKind::Echo
        } else if self.is_quick_reply() {
            EventKind::QuickReply
        } else if self.is_attachment() {
            EventKind::Attachment
        } else if self.is_text_message() {
            EventKind::Text
        } else if self.is_postback() {
            EventKind::Postback
        } else if self.is_referral() {
            EventKind::Referral
        } else if self.is_optin() {
            EventKind::Optin
        } else if self.is_account_linking() {
            EventKind::AccountLinking
        } else if self.is_read_confirmation() {
            EventKind::Read
        } else if self.is_delivery_confirmation() {
            EventKind::Delivery
        } else {
            EventKind::Unknown
        }
    }
}
