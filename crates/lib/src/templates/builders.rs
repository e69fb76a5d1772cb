//! Message builders. Buttons, elements, and quick replies are passed through unchecked;
//! the platform decides whether they are acceptable.

use super::message::{
    Attachment, AttachmentType, MessageContent, MessageOptions, OutboundMessage, TopElementStyle,
};
use serde_json::{json, Value};

/// Options for [`list_template`]: style of the first element and list-level buttons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTemplateOptions {
    pub top_element_style: Option<TopElementStyle>,
    pub buttons: Option<Vec<Value>>,
    pub message: MessageOptions,
}

fn attachment_message(kind: AttachmentType, payload: Value, opts: MessageOptions) -> OutboundMessage {
    OutboundMessage::new(
        MessageContent::Attachment(Attachment { kind, payload }),
        opts,
    )
}

pub fn text_message(text: impl Into<String>, opts: MessageOptions) -> OutboundMessage {
    OutboundMessage::new(MessageContent::Text(text.into()), opts)
}

/// Button template: text with up to three call-to-action buttons.
pub fn button_message(
    text: impl Into<String>,
    buttons: Vec<Value>,
    opts: MessageOptions,
) -> OutboundMessage {
    attachment_message(
        AttachmentType::Template,
        json!({
            "template_type": "button",
            "text": text.into(),
            "buttons": buttons,
        }),
        opts,
    )
}

/// Generic template: horizontally scrollable carousel of elements.
pub fn generic_template(elements: Vec<Value>, opts: MessageOptions) -> OutboundMessage {
    attachment_message(
        AttachmentType::Template,
        json!({
            "template_type": "generic",
            "elements": elements,
        }),
        opts,
    )
}

/// List template. Style defaults to `large`, buttons to an empty list.
pub fn list_template(elements: Vec<Value>, opts: ListTemplateOptions) -> OutboundMessage {
    let style = opts.top_element_style.unwrap_or_default();
    attachment_message(
        AttachmentType::Template,
        json!({
            "template_type": "list",
            "top_element_style": style,
            "elements": elements,
            "buttons": opts.buttons.unwrap_or_default(),
        }),
        opts.message,
    )
}

pub fn image_message(url: impl Into<String>, opts: MessageOptions) -> OutboundMessage {
    attachment_message(AttachmentType::Image, json!({ "url": url.into() }), opts)
}

pub fn video_message(url: impl Into<String>, opts: MessageOptions) -> OutboundMessage {
    attachment_message(AttachmentType::Video, json!({ "url": url.into() }), opts)
}

pub fn audio_message(url: impl Into<String>, opts: MessageOptions) -> OutboundMessage {
    attachment_message(AttachmentType::Audio, json!({ "url": url.into() }), opts)
}

pub fn file_message(url: impl Into<String>, opts: MessageOptions) -> OutboundMessage {
    attachment_message(AttachmentType::File, json!({ "url": url.into() }), opts)
}
