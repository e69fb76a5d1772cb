//! Request options and response payloads for the Graph API client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields requested by `get_user_profile`.
pub const USER_PROFILE_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "profile_pic",
    "locale",
    "timezone",
    "gender",
    "is_payment_enabled",
    "last_ad_referral",
];

/// Messenger profile fields fetched or deleted when the caller does not name any.
pub const MESSENGER_PROFILE_FIELDS: &[&str] = &[
    "persistent_menu",
    "get_started",
    "greeting",
    "whitelisted_domains",
    "account_linking_url",
    "payment_settings",
    "target_audience",
];

/// Per-call options. `access_token` overrides the client's default token.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub access_token: Option<String>,
}

/// Options for `send_message`.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub notification_type: NotificationType,
    /// Message tag for sends outside the standard messaging window.
    pub tag: Option<String>,
    pub access_token: Option<String>,
}

/// Options for messenger profile reads and deletes.
#[derive(Debug, Clone, Default)]
pub struct ProfileFieldsOptions {
    /// Fields to fetch or delete; `None` means [`MESSENGER_PROFILE_FIELDS`].
    pub fields: Option<Vec<String>>,
    pub access_token: Option<String>,
}

impl ProfileFieldsOptions {
    pub(crate) fn fields_or_default(&self) -> Vec<String> {
        self.fields.clone().unwrap_or_else(|| {
            MESSENGER_PROFILE_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect()
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    #[default]
    Regular,
    SilentPush,
    NoPush,
}

/// Transient UI signal shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderAction {
    TypingOn,
    TypingOff,
    MarkSeen,
}

impl std::str::FromStr for SenderAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "typing_on" => Ok(SenderAction::TypingOn),
            "typing_off" => Ok(SenderAction::TypingOff),
            "mark_seen" => Ok(SenderAction::MarkSeen),
            other => Err(format!("unknown sender action: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub recipient_id: String,
    pub message_id: String,
    /// Set when the message carried a reusable attachment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderActionResponse {
    pub recipient_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadAttachmentResponse {
    pub attachment_id: String,
}

/// User profile. Every field is optional: the page may lack permission for some.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_payment_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ad_referral: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}
