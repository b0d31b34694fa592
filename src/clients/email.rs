use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    clients::provider::{DeliveryProvider, rejection},
    config::EmailConfig,
    models::{
        message::OutboundMessage,
        notification::Channel,
        provider::{EmailPayload, EmailResponse, EmailTag, ProviderAck, ProviderError},
    },
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct EmailClient {
    http_client: Client,
    api_key: Option<String>,
    from: String,
    api_url: String,
}

impl EmailClient {
    pub fn new(config: EmailConfig) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        if config.api_key.is_some() {
            info!(from = %config.from_email, "Email client initialized");
        } else {
            warn!("Email API key missing, email delivery disabled");
        }

        Ok(Self {
            http_client,
            api_key: config.api_key,
            from: format!("{} <{}>", config.from_name, config.from_email),
            api_url: config.api_url,
        })
    }

    fn payload(&self, message: &OutboundMessage) -> EmailPayload {
        EmailPayload {
            from: self.from.clone(),
            to: vec![message.to.clone()],
            subject: message.message.subject.clone().unwrap_or_default(),
            html: message.message.body.clone(),
            reply_to: message.reply_to.clone(),
            tags: vec![EmailTag {
                name: "category".to_string(),
                value: message.kind.as_str().to_string(),
            }],
        }
    }
}

#[async_trait]
impl DeliveryProvider for EmailClient {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, message: &OutboundMessage) -> Result<ProviderAck, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::Unconfigured)?;

        debug!(to = %message.to, kind = %message.kind, "Sending email");

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_url))
            .bearer_auth(api_key)
            .json(&self.payload(message))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body: EmailResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Internal(format!("Failed to parse email response: {}", e.without_url())))?;

        info!(provider_id = %body.id, "Email accepted by provider");

        Ok(ProviderAck {
            id: body.id,
            status: body.status.unwrap_or_else(|| "sent".to_string()),
        })
    }
}
