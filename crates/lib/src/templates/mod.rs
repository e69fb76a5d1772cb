//! Outbound message payloads and builders for text, media, and structured templates.

mod builders;
mod message;

pub use builders::{
    audio_message, button_message, file_message, generic_template, image_message,
    list_template, text_message, video_message, ListTemplateOptions,
};
pub use message::{
    Attachment, AttachmentType, MessageContent, MessageOptions, OutboundMessage,
    TopElementStyle,
};
