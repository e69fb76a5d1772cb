//! Messenger Platform Graph API client.
//!
//! Send API, sender actions, user profile, messenger profile, and attachment upload.
//! The page access token travels as a query parameter on every call.

mod client;
mod types;

pub use client::{MessengerClient, MessengerError, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use types::{
    NotificationType, ProfileFieldsOptions, RequestOptions, SendMessageResponse, SendOptions,
    SenderAction, SenderActionResponse, UploadAttachmentResponse, UserProfile,
    MESSENGER_PROFILE_FIELDS, USER_PROFILE_FIELDS,
};
