use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::{
    clients::provider::{DeliveryProvider, rejection},
    config::SmsConfig,
    models::{
        message::OutboundMessage,
        notification::Channel,
        provider::{ProviderAck, ProviderError, SmsPayload, SmsResponse},
    },
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

struct SmsCredentials {
    account_sid: String,
    auth_token: String,
    from_number: String,
}

pub struct SmsClient {
    http_client: Client,
    credentials: Option<SmsCredentials>,
    api_url: String,
}

impl SmsClient {
    pub fn new(config: SmsConfig) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        let credentials = match (config.account_sid, config.auth_token, config.from_number) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => {
                info!(from = %from_number, "SMS client initialized");
                Some(SmsCredentials {
                    account_sid,
                    auth_token,
                    from_number,
                })
            }
            _ => {
                warn!("SMS credentials incomplete, SMS delivery disabled");
                None
            }
        };

        Ok(Self {
            http_client,
            credentials,
            api_url: config.api_url,
        })
    }
}

#[async_trait]
impl DeliveryProvider for SmsClient {
    fn channel(&self) -> Channel {
        Channel::Sms
    }

    fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    async fn send(&self, message: &OutboundMessage) -> Result<ProviderAck, ProviderError> {
        let credentials = self.credentials.as_ref().ok_or(ProviderError::Unconfigured)?;

        debug!(to = %message.to, kind = %message.kind, "Sending SMS");

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_url, credentials.account_sid
        );

        let payload = SmsPayload {
            from: credentials.from_number.clone(),
            to: message.to.clone(),
            body: message.message.body.clone(),
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let body: SmsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Internal(format!("Failed to parse SMS response: {}", e.without_url())))?;

        info!(provider_id = %body.sid, status = %body.status, "SMS accepted by provider");

        Ok(ProviderAck {
            id: body.sid,
            status: body.status,
        })
    }
}
