//! Graph API client (https://graph.facebook.com/v2.8 by default).

use super::types::{
    NotificationType, ProfileFieldsOptions, RequestOptions, SendMessageResponse, SendOptions, SenderAction,
    SenderActionResponse, UploadAttachmentResponse, UserProfile, USER_PROFILE_FIELDS,
};
use crate::templates::{AttachmentType, OutboundMessage};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_API_VERSION: &str = "v2.8";

/// Client for the Messenger Platform. Optionally bound to one page through a default access token.
#[derive(Clone)]
pub struct MessengerClient {
    base_url: String,
    api_version: String,
    access_token: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    /// No token on the call and none bound to the client. No request was sent.
    #[error("missing page access token")]
    MissingAccessToken,
    #[error("messenger request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The `error` object from the platform's JSON response, unmodified.
    #[error("messenger api error: {0}")]
    Api(Value),
    #[error("unexpected messenger response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    recipient: Recipient<'a>,
    message: &'a OutboundMessage,
    notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
}

#[derive(Serialize)]
struct SenderActionRequest<'a> {
    recipient: Recipient<'a>,
    sender_action: SenderAction,
}

impl MessengerClient {
    /// Create a client. With `access_token` set, calls that do not pass their own token use it.
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.filter(|t| !t.is_empty()),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at another host (e.g. a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into().trim_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.api_version, endpoint)
    }

    fn resolve_token<'a>(&'a self, per_call: Option<&'a str>) -> Result<&'a str, MessengerError> {
        per_call
            .filter(|t| !t.is_empty())
            .or(self.access_token.as_deref())
            .ok_or(MessengerError::MissingAccessToken)
    }

    /// One round trip: token check, request, JSON parse, `error` field check, typed decode.
    async fn call<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        access_token: Option<&str>,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, MessengerError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.resolve_token(access_token)?;
        let url = self.endpoint_url(endpoint);
        log::debug!("messenger {} {}", method, url);
        let mut req = self
            .client
            .request(method, &url)
            .query(&[("access_token", token)])
            .query(query)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        let res = req.send().await?;
        let json: Value = res.json().await?;
        if let Some(error) = json.get("error").filter(|e| !e.is_null()) {
            log::debug!("messenger api error on {}: {}", endpoint, error);
            return Err(MessengerError::Api(error.clone()));
        }
        Ok(serde_json::from_value(json)?)
    }

    /// POST me/messages — send a message to a page-scoped user id.
    pub async fn send_message(
        &self,
        recipient_id: &str,
        message: &OutboundMessage,
        opts: SendOptions,
    ) -> Result<SendMessageResponse, MessengerError> {
        let body = SendMessageRequest {
            recipient: Recipient { id: recipient_id },
            message,
            notification_type: opts.notification_type,
            tag: opts.tag.as_deref(),
        };
        self.call(
            Method::POST,
            "me/messages",
            opts.access_token.as_deref(),
            &[],
            Some(&body),
        )
        .await
    }

    /// POST me/messages with a sender action (typing indicator, mark seen).
    pub async fn send_sender_action(
        &self,
        recipient_id: &str,
        action: SenderAction,
        opts: RequestOptions,
    ) -> Result<SenderActionResponse, MessengerError> {
        let body = SenderActionRequest {
            recipient: Recipient { id: recipient_id },
            sender_action: action,
        };
        self.call(
            Method::POST,
            "me/messages",
            opts.access_token.as_deref(),
            &[],
            Some(&body),
        )
        .await
    }

    /// GET {id} — user profile with the fixed field list.
    pub async fn get_user_profile(
        &self,
        id: &str,
        opts: RequestOptions,
    ) -> Result<UserProfile, MessengerError> {
        let fields = USER_PROFILE_FIELDS.join(",");
        self.call::<_, ()>(
            Method::GET,
            id,
            opts.access_token.as_deref(),
            &[("fields", fields.as_str())],
            None,
        )
        .await
    }

    /// POST me/messenger_profile — set page-level settings (greeting, menu, ...).
    pub async fn set_messenger_profile(
        &self,
        profile: &Value,
        opts: RequestOptions,
    ) -> Result<Value, MessengerError> {
        self.call(
            Method::POST,
            "me/messenger_profile",
            opts.access_token.as_deref(),
            &[],
            Some(profile),
        )
        .await
    }

    /// GET me/messenger_profile.
    pub async fn get_messenger_profile(
        &self,
        opts: ProfileFieldsOptions,
    ) -> Result<Value, MessengerError> {
        let fields = opts.fields_or_default().join(",");
        self.call::<_, ()>(
            Method::GET,
            "me/messenger_profile",
            opts.access_token.as_deref(),
            &[("fields", fields.as_str())],
            None,
        )
        .await
    }

    /// DELETE me/messenger_profile with `{fields: [...]}` as body.
    pub async fn delete_messenger_profile(
        &self,
        opts: ProfileFieldsOptions,
    ) -> Result<Value, MessengerError> {
        let body = json!({ "fields": opts.fields_or_default() });
        self.call(
            Method::DELETE,
            "me/messenger_profile",
            opts.access_token.as_deref(),
            &[],
            Some(&body),
        )
        .await
    }

    /// POST me/message_attachments — upload a reusable attachment from a URL.
    pub async fn upload_attachment(
        &self,
        kind: AttachmentType,
        url: &str,
        opts: RequestOptions,
    ) -> Result<UploadAttachmentResponse, MessengerError> {
        let body = json!({
            "message": {
                "attachment": {
                    "type": kind,
                    "payload": { "url": url, "is_reusable": true },
                }
            }
        });
        self.call(
            Method::POST,
            "me/message_attachments",
            opts.access_token.as_deref(),
            &[],
            Some(&body),
        )
        .await
    }
}
