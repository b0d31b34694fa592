use serde::{Deserialize, Serialize};

use crate::models::notification::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Html,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: Option<String>,
    pub body: String,
    pub content_type: ContentType,
}

/// A rendered message addressed to one recipient, handed to a provider.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub to: String,
    pub kind: NotificationKind,
    pub reply_to: Option<String>,
    pub message: RenderedMessage,
}
