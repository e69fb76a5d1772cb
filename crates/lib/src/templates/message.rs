//! Wire types for the `message` field of a Send API request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message object sent to a user. Field names are the platform's wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    #[serde(flatten)]
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

/// Exactly one content field: `text` or `attachment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContent {
    Text(String),
    Attachment(Attachment),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentType,
    pub payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    Image,
    Video,
    Audio,
    File,
    Template,
}

impl std::str::FromStr for AttachmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(AttachmentType::Image),
            "video" => Ok(AttachmentType::Video),
            "audio" => Ok(AttachmentType::Audio),
            "file" => Ok(AttachmentType::File),
            "template" => Ok(AttachmentType::Template),
            other => Err(format!("unknown attachment type: {}", other)),
        }
    }
}

/// `top_element_style` of a list template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopElementStyle {
    #[default]
    Large,
    Compact,
}

/// Options shared by every builder. Absent fields are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageOptions {
    pub quick_replies: Option<Vec<Value>>,
    pub metadata: Option<String>,
}

impl OutboundMessage {
    pub fn new(content: MessageContent, opts: MessageOptions) -> Self {
        Self {
            content,
            quick_replies: opts.quick_replies,
            metadata: opts.metadata,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(t) => Some(t),
            MessageContent::Attachment(_) => None,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match &self.content {
            MessageContent::Attachment(a) => Some(a),
            MessageContent::Text(_) => None,
        }
    }
}
