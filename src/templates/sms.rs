use chrono::{DateTime, Utc};

use crate::{
    models::{
        dispatch::DispatchFailure,
        message::{ContentType, RenderedMessage},
        notification::{NotificationKind, TemplateFields},
    },
    templates::{
        BRAND_NAME, Placeholders, require, require_rating, star_rating, substitute_placeholders,
        timestamp,
    },
};

pub const DEFAULT_REVIEW_TEMPLATE: &str = "Hi {{customerName}}, thanks for choosing {{businessName}}! We'd love to hear about your experience: {{reviewLink}}";

pub fn render(
    kind: NotificationKind,
    fields: &TemplateFields<'_>,
    now: DateTime<Utc>,
) -> Result<RenderedMessage, DispatchFailure> {
    let body = match kind {
        NotificationKind::ReviewRequest => review_request(fields)?,
        NotificationKind::Test => format!(
            "{} test message sent at {}. Your SMS configuration is working.",
            BRAND_NAME,
            timestamp(now)
        ),
        NotificationKind::FeedbackAlert => feedback_alert(fields)?,
    };

    Ok(RenderedMessage {
        subject: None,
        body,
        content_type: ContentType::Text,
    })
}

fn review_request(fields: &TemplateFields<'_>) -> Result<String, DispatchFailure> {
    let values = Placeholders {
        customer_name: require(fields.customer_name, "customerName")?,
        business_name: require(fields.business_name, "businessName")?,
        review_link: require(fields.review_link, "reviewLink")?,
    };

    let template = fields.message_template.unwrap_or(DEFAULT_REVIEW_TEMPLATE);
    Ok(substitute_placeholders(template, &values))
}

fn feedback_alert(fields: &TemplateFields<'_>) -> Result<String, DispatchFailure> {
    let customer_name = require(fields.customer_name, "customerName")?;
    let business_name = require(fields.business_name, "businessName")?;
    let review_link = require(fields.review_link, "reviewLink")?;
    let rating = require_rating(fields.rating)?;

    let mut body = format!(
        "{}: new {}/5 feedback for {} from {} {}",
        BRAND_NAME,
        rating,
        business_name,
        customer_name,
        star_rating(rating)
    );

    if let Some(feedback) = fields.feedback {
        body.push_str(&format!(" \"{}\"", feedback));
    }

    body.push_str(&format!(" View: {}", review_link));
    Ok(body)
}
