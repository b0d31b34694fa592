use chrono::{DateTime, Datelike, Utc};

use crate::{
    models::{
        dispatch::DispatchFailure,
        message::{ContentType, RenderedMessage},
        notification::{NotificationKind, TemplateFields},
    },
    templates::{
        BRAND_NAME, Placeholders, require, require_rating, sanitize::escape, star_rating,
        substitute_placeholders, timestamp,
    },
};

pub const TEST_SUBJECT: &str = "RevBoost Test Email";
pub const FEEDBACK_ALERT_SUBJECT: &str = "New customer feedback received";

const DEFAULT_REVIEW_BUTTON: &str = "Leave a Review";
const DEFAULT_DASHBOARD_BUTTON: &str = "View Feedback";

const ACCENT: &str = "#2563eb";

pub fn review_request_subject(business_name: &str) -> String {
    format!("We'd love to hear your feedback on {}", business_name)
}

pub fn render(
    kind: NotificationKind,
    fields: &TemplateFields<'_>,
    now: DateTime<Utc>,
) -> Result<RenderedMessage, DispatchFailure> {
    let (subject, body) = match kind {
        NotificationKind::ReviewRequest => review_request(fields, now)?,
        NotificationKind::Test => test_message(fields, now),
        NotificationKind::FeedbackAlert => feedback_alert(fields, now)?,
    };

    Ok(RenderedMessage {
        subject: Some(subject),
        body,
        content_type: ContentType::Html,
    })
}

fn review_request(
    fields: &TemplateFields<'_>,
    now: DateTime<Utc>,
) -> Result<(String, String), DispatchFailure> {
    let customer_name = require(fields.customer_name, "customerName")?;
    let business_name = require(fields.business_name, "businessName")?;
    let review_link = require(fields.review_link, "reviewLink")?;

    let intro = match fields.message_template {
        Some(template) => substitute_placeholders(
            template,
            &Placeholders {
                customer_name,
                business_name,
                review_link,
            },
        ),
        None => format!(
            "Thank you for choosing {}! We hope you had a great experience. \
             Would you take a moment to share your feedback? It only takes a minute \
             and helps us serve you better.",
            business_name
        ),
    };

    let button_text = fields.button_text.unwrap_or(DEFAULT_REVIEW_BUTTON);
    let href = escape(review_link);

    let content = format!(
        r#"<p style="font-size:16px;margin:0 0 16px;">Hi {customer},</p>
<p style="font-size:16px;line-height:1.5;margin:0 0 24px;">{intro}</p>
{button}
<p style="font-size:13px;color:#6b7280;margin:24px 0 0;">If the button doesn't work, copy and paste this link into your browser:<br><a href="{href}" style="color:{accent};word-break:break-all;">{href}</a></p>"#,
        customer = escape(customer_name),
        intro = escape(&intro),
        button = button(&href, button_text),
        href = href,
        accent = ACCENT,
    );

    let body = layout(&escape(business_name), &content, business_name, now);
    Ok((review_request_subject(business_name), body))
}

fn test_message(fields: &TemplateFields<'_>, now: DateTime<Utc>) -> (String, String) {
    let business_line = fields
        .business_name
        .map(|name| {
            format!(
                r#"<p style="font-size:14px;margin:0 0 8px;">Business: <strong>{}</strong></p>"#,
                escape(name)
            )
        })
        .unwrap_or_default();

    let content = format!(
        r#"<p style="font-size:16px;line-height:1.5;margin:0 0 16px;">This is a test email from {brand}. If you are reading this, your email configuration is working.</p>
{business_line}<p style="font-size:14px;color:#6b7280;margin:0;">Sent at: {sent_at}</p>"#,
        brand = BRAND_NAME,
        business_line = business_line,
        sent_at = timestamp(now),
    );

    let body = layout(BRAND_NAME, &content, BRAND_NAME, now);
    (TEST_SUBJECT.to_string(), body)
}

fn feedback_alert(
    fields: &TemplateFields<'_>,
    now: DateTime<Utc>,
) -> Result<(String, String), DispatchFailure> {
    let customer_name = require(fields.customer_name, "customerName")?;
    let business_name = require(fields.business_name, "businessName")?;
    let review_link = require(fields.review_link, "reviewLink")?;
    let rating = require_rating(fields.rating)?;

    let feedback = fields
        .feedback
        .map(|text| {
            format!(
                r#"<blockquote style="margin:0 0 24px;padding:12px 16px;border-left:4px solid {accent};background:#f9fafb;font-size:15px;line-height:1.5;">{text}</blockquote>"#,
                accent = ACCENT,
                text = escape(text),
            )
        })
        .unwrap_or_default();

    let href = escape(review_link);
    let button_text = fields.button_text.unwrap_or(DEFAULT_DASHBOARD_BUTTON);

    let content = format!(
        r#"<p style="font-size:16px;margin:0 0 16px;"><strong>{customer}</strong> left feedback for <strong>{business}</strong>.</p>
<p style="font-size:24px;color:#f59e0b;letter-spacing:2px;margin:0 0 8px;">{stars}</p>
<p style="font-size:14px;color:#6b7280;margin:0 0 16px;">Rating: {rating}/5</p>
{feedback}{button}"#,
        customer = escape(customer_name),
        business = escape(business_name),
        stars = star_rating(rating),
        rating = rating,
        feedback = feedback,
        button = button(&href, button_text),
    );

    let body = layout(BRAND_NAME, &content, business_name, now);
    Ok((FEEDBACK_ALERT_SUBJECT.to_string(), body))
}

/// `href` must already be escaped.
fn button(href: &str, label: &str) -> String {
    format!(
        r#"<table role="presentation" cellspacing="0" cellpadding="0" style="margin:0 auto;"><tr><td style="border-radius:6px;background:{accent};"><a href="{href}" style="display:inline-block;padding:12px 28px;color:#ffffff;font-size:16px;font-weight:600;text-decoration:none;">{label}</a></td></tr></table>"#,
        accent = ACCENT,
        href = href,
        label = escape(label),
    )
}

/// `heading_html` and `content_html` are inserted as-is; `footer_name` is escaped.
fn layout(heading_html: &str, content_html: &str, footer_name: &str, now: DateTime<Utc>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="margin:0;padding:0;background:#f3f4f6;font-family:-apple-system,'Segoe UI',Roboto,Helvetica,Arial,sans-serif;color:#111827;">
<table role="presentation" width="100%" cellspacing="0" cellpadding="0"><tr><td align="center" style="padding:32px 16px;">
<table role="presentation" width="600" cellspacing="0" cellpadding="0" style="max-width:600px;width:100%;background:#ffffff;border-radius:8px;">
<tr><td style="padding:24px 32px;border-bottom:1px solid #e5e7eb;"><h1 style="margin:0;font-size:22px;">{heading}</h1></td></tr>
<tr><td style="padding:32px;">
{content}
</td></tr>
<tr><td style="padding:16px 32px;border-top:1px solid #e5e7eb;font-size:12px;color:#9ca3af;text-align:center;">&copy; {year} {footer_name}. Sent with {brand}.</td></tr>
</table>
</td></tr></table>
</body>
</html>"#,
        heading = heading_html,
        content = content_html,
        year = now.year(),
        footer_name = escape(footer_name),
        brand = BRAND_NAME,
    )
}
