//! Channel-specific message rendering.
//!
//! Email bodies are HTML and every caller-supplied value is passed through
//! [`sanitize::escape`] before interpolation. SMS bodies are plain text built
//! by literal placeholder substitution.

pub mod email;
pub mod sanitize;
pub mod sms;

use chrono::{DateTime, Utc};

use crate::models::{
    dispatch::DispatchFailure,
    message::RenderedMessage,
    notification::{Channel, NotificationKind, TemplateFields},
};

pub const BRAND_NAME: &str = "RevBoost";

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

pub fn render(
    kind: NotificationKind,
    channel: Channel,
    fields: &TemplateFields<'_>,
    now: DateTime<Utc>,
) -> Result<RenderedMessage, DispatchFailure> {
    match channel {
        Channel::Email => email::render(kind, fields, now),
        Channel::Sms => sms::render(kind, fields, now),
    }
}

/// Five glyphs, filled for each point of the rating. Callers pass `1..=5`;
/// larger values saturate.
pub fn star_rating(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    let mut stars = String::with_capacity(5 * FILLED_STAR.len_utf8());
    stars.extend(std::iter::repeat_n(FILLED_STAR, filled));
    stars.extend(std::iter::repeat_n(EMPTY_STAR, 5 - filled));
    stars
}

#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    pub customer_name: &'a str,
    pub business_name: &'a str,
    pub review_link: &'a str,
}

/// Replaces `{{customerName}}`, `{{businessName}}` and `{{reviewLink}}` in a
/// single scan. Any other `{{...}}` sequence is copied verbatim, and
/// substituted values are never rescanned.
pub fn substitute_placeholders(template: &str, values: &Placeholders<'_>) -> String {
    let mut output = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let tail = &rest[start..];

        let matched = [
            ("{{customerName}}", values.customer_name),
            ("{{businessName}}", values.business_name),
            ("{{reviewLink}}", values.review_link),
        ]
        .into_iter()
        .find(|(placeholder, _)| tail.starts_with(placeholder));

        match matched {
            Some((placeholder, value)) => {
                output.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                output.push_str("{{");
                rest = &tail[2..];
            }
        }
    }

    output.push_str(rest);
    output
}

pub(crate) fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, DispatchFailure> {
    value.ok_or_else(|| DispatchFailure::validation(field, "is required"))
}

pub(crate) fn require_rating(value: Option<u8>) -> Result<u8, DispatchFailure> {
    value.ok_or_else(|| DispatchFailure::validation("rating", "is required"))
}

pub(crate) fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
