use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result},
};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReviewRequest,
    Test,
    FeedbackAlert,
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::ReviewRequest => "review_request",
            NotificationKind::Test => "test",
            NotificationKind::FeedbackAlert => "feedback_alert",
        }
    }

    /// Fields that must be present (and non-blank) before a message of this
    /// kind can be rendered. Identical for both channels.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            NotificationKind::ReviewRequest => &["customerName", "businessName", "reviewLink"],
            NotificationKind::FeedbackAlert => {
                &["customerName", "businessName", "reviewLink", "rating"]
            }
            NotificationKind::Test => &[],
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub channel: Channel,
    pub kind: NotificationKind,
    pub recipient: String,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub business_name: Option<String>,

    #[serde(default)]
    pub review_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,

    #[serde(default)]
    pub custom_data: HashMap<String, JsonValue>,
}

impl NotificationRequest {
    pub fn new(channel: Channel, kind: NotificationKind, recipient: impl Into<String>) -> Self {
        Self {
            channel,
            kind,
            recipient: recipient.into(),
            customer_name: None,
            business_name: None,
            review_link: None,
            reply_to: None,
            rating: None,
            feedback: None,
            custom_data: HashMap::new(),
        }
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    pub fn with_business_name(mut self, name: impl Into<String>) -> Self {
        self.business_name = Some(name.into());
        self
    }

    pub fn with_review_link(mut self, link: impl Into<String>) -> Self {
        self.review_link = Some(link.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn with_custom_data(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.custom_data.insert(key.into(), value);
        self
    }

    /// Borrowed view of the values the renderer interpolates.
    ///
    /// Blank strings are treated as absent so that `"  "` never satisfies a
    /// required field. The review link is trimmed because it ends up in an
    /// `href` and in SMS bodies. Ratings outside `0..=255` cannot be represented and
    /// come through as `None`; range checks belong to the dispatcher.
    pub fn template_fields(&self) -> TemplateFields<'_> {
        TemplateFields {
            customer_name: non_blank(self.customer_name.as_deref()),
            business_name: non_blank(self.business_name.as_deref()),
            review_link: non_blank(self.review_link.as_deref()).map(str::trim),
            rating: self.rating.and_then(|r| u8::try_from(r).ok()),
            feedback: non_blank(self.feedback.as_deref()),
            button_text: self.custom_str("buttonText"),
            message_template: self.custom_str("messageTemplate"),
        }
    }

    fn custom_str(&self, key: &str) -> Option<&str> {
        non_blank(self.custom_data.get(key).and_then(|v| v.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFields<'a> {
    pub customer_name: Option<&'a str>,
    pub business_name: Option<&'a str>,
    pub review_link: Option<&'a str>,
    pub rating: Option<u8>,
    pub feedback: Option<&'a str>,
    pub button_text: Option<&'a str>,
    pub message_template: Option<&'a str>,
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
