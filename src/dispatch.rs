use std::{sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    clients::provider::DeliveryProvider,
    models::{
        dispatch::{DispatchFailure, DispatchResult},
        message::OutboundMessage,
        notification::{Channel, NotificationKind, NotificationRequest, non_blank},
        provider::ProviderError,
        validation::{
            normalize_phone, validate_email, validate_phone, validate_rating,
            validate_review_link,
        },
    },
    templates,
    utils::{Clock, SystemClock},
};

pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Dispatcher {
    email: Arc<dyn DeliveryProvider>,
    sms: Arc<dyn DeliveryProvider>,
    clock: Arc<dyn Clock>,
}

impl Dispatcher {
    pub fn new(email: Arc<dyn DeliveryProvider>, sms: Arc<dyn DeliveryProvider>) -> Self {
        Self::with_clock(email, sms, Arc::new(SystemClock))
    }

    pub fn with_clock(
        email: Arc<dyn DeliveryProvider>,
        sms: Arc<dyn DeliveryProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { email, sms, clock }
    }

    pub fn providers(&self) -> Vec<Arc<dyn DeliveryProvider>> {
        vec![Arc::clone(&self.email), Arc::clone(&self.sms)]
    }

    fn provider(&self, channel: Channel) -> &Arc<dyn DeliveryProvider> {
        match channel {
            Channel::Email => &self.email,
            Channel::Sms => &self.sms,
        }
    }

    /// Validates, renders and delivers one notification. Makes at most one
    /// provider call and never retries.
    pub async fn dispatch(
        &self,
        request: NotificationRequest,
    ) -> Result<DispatchResult, DispatchFailure> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "dispatch",
            request_id = %request_id,
            channel = %request.channel,
            kind = %request.kind,
        );

        self.dispatch_inner(request).instrument(span).await
    }

    async fn dispatch_inner(
        &self,
        request: NotificationRequest,
    ) -> Result<DispatchResult, DispatchFailure> {
        if let Err(e) = validate_request(&request) {
            info!(error = %e, "Rejected invalid notification request");
            return Err(e);
        }

        let provider = self.provider(request.channel);
        if !provider.is_configured() {
            warn!("Provider not configured, refusing dispatch");
            return Err(DispatchFailure::ProviderUnconfigured(request.channel));
        }

        let rendered = templates::render(
            request.kind,
            request.channel,
            &request.template_fields(),
            self.clock.now(),
        )?;

        debug!(body_len = rendered.body.len(), "Message rendered");

        let recipient = request.recipient.trim();
        let to = match request.channel {
            Channel::Email => recipient.to_string(),
            Channel::Sms => normalize_phone(recipient)
                .map_err(|e| DispatchFailure::validation("recipient", e.to_string()))?,
        };

        let outbound = OutboundMessage {
            to,
            kind: request.kind,
            reply_to: match request.channel {
                Channel::Email => non_blank(request.reply_to.as_deref()).map(str::to_string),
                Channel::Sms => None,
            },
            message: rendered,
        };

        let outcome = match timeout(PROVIDER_TIMEOUT, provider.send(&outbound)).await {
            Ok(result) => result.map_err(|e| classify(request.channel, e)),
            Err(_) => Err(DispatchFailure::ProviderUnreachable(format!(
                "no response within {}s",
                PROVIDER_TIMEOUT.as_secs()
            ))),
        };

        match outcome {
            Ok(ack) => {
                info!(provider_id = %ack.id, provider_status = %ack.status, "Notification dispatched");
                Ok(DispatchResult {
                    provider_id: ack.id,
                    provider_status: ack.status,
                    channel: request.channel,
                    kind: request.kind,
                })
            }
            Err(failure) => {
                match &failure {
                    DispatchFailure::Internal(cause) => {
                        error!(error = %cause, "Dispatch failed unexpectedly")
                    }
                    other => warn!(error = %other, "Dispatch failed"),
                }
                Err(failure)
            }
        }
    }
}

fn classify(channel: Channel, error: ProviderError) -> DispatchFailure {
    match error {
        ProviderError::Unconfigured => DispatchFailure::ProviderUnconfigured(channel),
        ProviderError::Rejected { status, message } => DispatchFailure::ProviderRejected {
            status_code: status,
            message,
        },
        ProviderError::Unreachable(cause) => DispatchFailure::ProviderUnreachable(cause),
        ProviderError::Internal(cause) => DispatchFailure::Internal(cause),
    }
}

/// Structural checks that must pass before anything is rendered or sent.
pub fn validate_request(request: &NotificationRequest) -> Result<(), DispatchFailure> {
    let recipient = request.recipient.trim();
    let recipient_check = match request.channel {
        Channel::Email => validate_email(recipient),
        Channel::Sms => validate_phone(recipient),
    };
    recipient_check.map_err(|e| DispatchFailure::validation("recipient", e.to_string()))?;

    let fields = request.template_fields();
    for field in request.kind.required_fields() {
        let present = match *field {
            "customerName" => fields.customer_name.is_some(),
            "businessName" => fields.business_name.is_some(),
            "reviewLink" => fields.review_link.is_some(),
            "rating" => request.rating.is_some(),
            _ => true,
        };

        if !present {
            return Err(DispatchFailure::validation(*field, "is required"));
        }
    }

    if let (NotificationKind::FeedbackAlert, Some(rating)) = (request.kind, request.rating) {
        validate_rating(rating).map_err(|e| DispatchFailure::validation("rating", e.to_string()))?;
    }

    if let Some(link) = fields.review_link {
        validate_review_link(link)
            .map_err(|e| DispatchFailure::validation("reviewLink", e.to_string()))?;
    }

    let reply_to = non_blank(request.reply_to.as_deref());
    if let (Channel::Email, Some(reply_to)) = (request.channel, reply_to) {
        validate_email(reply_to.trim())
            .map_err(|e| DispatchFailure::validation("replyTo", e.to_string()))?;
    }

    Ok(())
}
