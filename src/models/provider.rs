use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Native acknowledgment returned by a delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAck {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("missing provider credentials")]
    Unconfigured,

    #[error("provider returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProviderError {
    /// Request URLs carry credentials (the SMS account SID), so only a fixed
    /// phrase survives into the error. The full error goes to the log.
    fn from(err: reqwest::Error) -> Self {
        warn!(error = %err, "Provider transport error");

        if err.is_timeout() {
            ProviderError::Unreachable("request timed out".to_string())
        } else if err.is_connect() {
            ProviderError::Unreachable("connection failed".to_string())
        } else if err.is_request() {
            ProviderError::Unreachable("request could not be sent".to_string())
        } else {
            ProviderError::Internal(err.without_url().to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,

    pub tags: Vec<EmailTag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailTag {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailResponse {
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmsPayload {
    #[serde(rename = "From")]
    pub from: String,

    #[serde(rename = "To")]
    pub to: String,

    #[serde(rename = "Body")]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsResponse {
    pub sid: String,
    pub status: String,
}

/// Error body shape shared closely enough by both providers:
/// either `{"message": ".."}` or `{"error": {"message": ".."}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<NestedError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NestedError {
    #[serde(default)]
    pub message: Option<String>,
}

impl ProviderErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.error.and_then(|e| e.message))
            .filter(|m| !m.trim().is_empty())
    }
}
