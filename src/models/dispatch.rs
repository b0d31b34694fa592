use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::notification::{Channel, NotificationKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub provider_id: String,
    pub provider_status: String,
    pub channel: Channel,
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchFailure {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{0} provider is not configured")]
    ProviderUnconfigured(Channel),

    #[error("provider rejected the message ({status_code}): {message}")]
    ProviderRejected { status_code: u16, message: String },

    #[error("provider unreachable: {0}")]
    ProviderUnreachable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DispatchFailure {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DispatchFailure::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            DispatchFailure::Validation { .. } => "validation_error",
            DispatchFailure::ProviderUnconfigured(_) => "provider_unconfigured",
            DispatchFailure::ProviderRejected { .. } => "provider_rejected",
            DispatchFailure::ProviderUnreachable(_) => "provider_unreachable",
            DispatchFailure::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            DispatchFailure::Validation { .. } => StatusCode::BAD_REQUEST,
            DispatchFailure::ProviderUnconfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            DispatchFailure::ProviderRejected { .. } => StatusCode::BAD_GATEWAY,
            DispatchFailure::ProviderUnreachable(_) => StatusCode::GATEWAY_TIMEOUT,
            DispatchFailure::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to callers. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            DispatchFailure::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}
