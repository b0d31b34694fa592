use std::sync::Arc;

use review_notify::{
    clients::{email::EmailClient, provider::DeliveryProvider, sms::SmsClient},
    config::{EmailConfig, SmsConfig},
    dispatch::Dispatcher,
    models::{
        dispatch::DispatchFailure,
        message::{ContentType, OutboundMessage, RenderedMessage},
        notification::{Channel, NotificationKind, NotificationRequest},
        provider::{ProviderAck, ProviderError},
    },
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{basic_auth, bearer_token, body_partial_json, body_string_contains, method, path},
};

fn email_config(api_url: &str, api_key: Option<&str>) -> EmailConfig {
    EmailConfig {
        api_key: api_key.map(str::to_string),
        from_email: "reviews@revboostapp.com".to_string(),
        from_name: "RevBoost".to_string(),
        api_url: api_url.to_string(),
    }
}

fn sms_config(api_url: &str) -> SmsConfig {
    SmsConfig {
        account_sid: Some("AC123".to_string()),
        auth_token: Some("secret".to_string()),
        from_number: Some("+15550000000".to_string()),
        api_url: api_url.to_string(),
    }
}

fn email_message() -> OutboundMessage {
    OutboundMessage {
        to: "a@b.com".to_string(),
        kind: NotificationKind::ReviewRequest,
        reply_to: Some("owner@acme.com".to_string()),
        message: RenderedMessage {
            subject: Some("We'd love to hear your feedback on Acme".to_string()),
            body: "<p>Hi Jane</p>".to_string(),
            content_type: ContentType::Html,
        },
    }
}

fn sms_message() -> OutboundMessage {
    OutboundMessage {
        to: "+15551234567".to_string(),
        kind: NotificationKind::ReviewRequest,
        reply_to: None,
        message: RenderedMessage {
            subject: None,
            body: "Hi Jane".to_string(),
            content_type: ContentType::Text,
        },
    }
}

/// Test: Email payload carries sender, tags and reply-to
#[tokio::test]
async fn test_email_send_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(bearer_token("re_test"))
        .and(body_partial_json(json!({
            "from": "RevBoost <reviews@revboostapp.com>",
            "to": ["a@b.com"],
            "subject": "We'd love to hear your feedback on Acme",
            "html": "<p>Hi Jane</p>",
            "reply_to": "owner@acme.com",
            "tags": [{ "name": "category", "value": "review_request" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "em_123" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EmailClient::new(email_config(&server.uri(), Some("re_test"))).unwrap();
    let ack = client.send(&email_message()).await.unwrap();

    assert_eq!(
        ack,
        ProviderAck {
            id: "em_123".to_string(),
            status: "sent".to_string(),
        }
    );
}

/// Test: Provider error message is surfaced on rejection
#[tokio::test]
async fn test_email_rejection_uses_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "Invalid `to` field."
        })))
        .mount(&server)
        .await;

    let client = EmailClient::new(email_config(&server.uri(), Some("re_test"))).unwrap();
    let err = client.send(&email_message()).await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::Rejected {
            status: 422,
            message: "Invalid `to` field.".to_string(),
        }
    );
}

/// Test: Rejection without a body falls back to a generic message
#[tokio::test]
async fn test_email_rejection_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = EmailClient::new(email_config(&server.uri(), Some("re_test"))).unwrap();
    let err = client.send(&email_message()).await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::Rejected {
            status: 503,
            message: "Provider returned status 503".to_string(),
        }
    );
}

/// Test: Unconfigured client never touches the network
#[tokio::test]
async fn test_email_unconfigured_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = EmailClient::new(email_config(&server.uri(), None)).unwrap();

    assert!(!client.is_configured());
    assert_eq!(
        client.send(&email_message()).await.unwrap_err(),
        ProviderError::Unconfigured
    );
}

/// Test: Connection failures are classified as unreachable
#[tokio::test]
async fn test_email_connection_refused_is_unreachable() {
    let client = EmailClient::new(email_config("http://127.0.0.1:1", Some("re_test"))).unwrap();

    let err = client.send(&email_message()).await.unwrap_err();
    assert_eq!(err, ProviderError::Unreachable("connection failed".to_string()));
}

/// Test: Malformed success body is an internal error
#[tokio::test]
async fn test_email_garbled_response_is_internal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = EmailClient::new(email_config(&server.uri(), Some("re_test"))).unwrap();
    let err = client.send(&email_message()).await.unwrap_err();

    assert!(matches!(err, ProviderError::Internal(_)), "got {:?}", err);
}

/// Test: SMS is form-encoded with basic auth and returns sid + status
#[tokio::test]
async fn test_sms_send_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
        .and(basic_auth("AC123", "secret"))
        .and(body_string_contains("To=%2B15551234567"))
        .and(body_string_contains("From=%2B15550000000"))
        .and(body_string_contains("Body=Hi+Jane"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sid": "SM123",
            "status": "queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SmsClient::new(sms_config(&server.uri())).unwrap();
    let ack = client.send(&sms_message()).await.unwrap();

    assert_eq!(ack.id, "SM123");
    assert_eq!(ack.status, "queued");
}

/// Test: SMS rejection carries the provider message
#[tokio::test]
async fn test_sms_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 21211,
            "message": "The 'To' number is not a valid phone number.",
            "status": 400
        })))
        .mount(&server)
        .await;

    let client = SmsClient::new(sms_config(&server.uri())).unwrap();
    let err = client.send(&sms_message()).await.unwrap_err();

    assert_eq!(
        err,
        ProviderError::Rejected {
            status: 400,
            message: "The 'To' number is not a valid phone number.".to_string(),
        }
    );
}

/// Test: Partial SMS credentials leave the client unconfigured
#[tokio::test]
async fn test_sms_partial_credentials_unconfigured() {
    let mut config = sms_config("http://127.0.0.1:1");
    config.from_number = None;

    let client = SmsClient::new(config).unwrap();

    assert!(!client.is_configured());
    assert_eq!(
        client.send(&sms_message()).await.unwrap_err(),
        ProviderError::Unconfigured
    );
}

/// Test: Transport failures never expose the request URL or account SID
#[tokio::test]
async fn test_unreachable_sms_hides_credentials_from_callers() {
    let mut config = sms_config("http://127.0.0.1:1");
    config.account_sid = Some("AC_SECRET_SID".to_string());

    let sms = SmsClient::new(config).unwrap();
    let email = EmailClient::new(email_config("http://127.0.0.1:1", None)).unwrap();
    let dispatcher = Dispatcher::new(Arc::new(email), Arc::new(sms));

    let request = NotificationRequest::new(Channel::Sms, NotificationKind::ReviewRequest, "+15551234567")
        .with_customer_name("Jane")
        .with_business_name("Acme")
        .with_review_link("https://g.co/r");

    let failure = dispatcher.dispatch(request).await.unwrap_err();

    assert!(
        matches!(failure, DispatchFailure::ProviderUnreachable(_)),
        "got {:?}",
        failure
    );

    let message = failure.public_message();
    assert!(!message.contains("AC_SECRET_SID"), "leaked SID: {}", message);
    assert!(!message.contains("127.0.0.1"), "leaked URL: {}", message);
    assert!(!failure.to_string().contains("AC_SECRET_SID"));
}
