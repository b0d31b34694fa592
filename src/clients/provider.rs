use async_trait::async_trait;
use reqwest::Response;

use crate::models::{
    message::OutboundMessage,
    notification::Channel,
    provider::{ProviderAck, ProviderError, ProviderErrorBody},
};

/// A single outbound delivery capability for one channel.
#[async_trait]
pub trait DeliveryProvider: Send + Sync {
    fn channel(&self) -> Channel;

    /// `false` when credentials were missing at construction time.
    fn is_configured(&self) -> bool;

    async fn send(&self, message: &OutboundMessage) -> Result<ProviderAck, ProviderError>;
}

/// Turns a non-2xx provider response into `ProviderError::Rejected`, preferring
/// the provider's own error message.
pub(crate) async fn rejection(response: Response) -> ProviderError {
    let status = response.status().as_u16();

    let message = match response.text().await {
        Ok(text) => serde_json::from_str::<ProviderErrorBody>(&text)
            .ok()
            .and_then(ProviderErrorBody::into_message),
        Err(_) => None,
    };

    ProviderError::Rejected {
        status,
        message: message.unwrap_or_else(|| format!("Provider returned status {}", status)),
    }
}
