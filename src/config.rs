use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::liveness::LivenessPolicy;

pub const DEFAULT_FROM_EMAIL: &str = "reviews@revboostapp.com";
pub const DEFAULT_FROM_NAME: &str = "RevBoost";

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub resend_api_key: Option<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    #[serde(default = "default_email_api_url")]
    pub email_api_url: String,

    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_phone_number: Option<String>,

    #[serde(default = "default_sms_api_url")]
    pub sms_api_url: String,

    pub self_check_url: Option<String>,

    #[serde(default = "default_app_env")]
    pub app_env: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from_email: String,
    pub from_name: String,
    pub api_url: String,
}

#[derive(Clone, Debug)]
pub struct SmsConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub api_url: String,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn email_config(&self) -> EmailConfig {
        EmailConfig {
            api_key: present(&self.resend_api_key),
            from_email: self.from_email.clone(),
            from_name: self.from_name.clone(),
            api_url: self.email_api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn sms_config(&self) -> SmsConfig {
        SmsConfig {
            account_sid: present(&self.twilio_account_sid),
            auth_token: present(&self.twilio_auth_token),
            from_number: present(&self.twilio_phone_number),
            api_url: self.sms_api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Liveness pings only make sense for a deployed instance that knows its
    /// own public URL.
    pub fn liveness_policy(&self) -> LivenessPolicy {
        if self.is_production() && present(&self.self_check_url).is_some() {
            LivenessPolicy::enabled()
        } else {
            LivenessPolicy::disabled()
        }
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn default_from_email() -> String {
    DEFAULT_FROM_EMAIL.to_string()
}

fn default_from_name() -> String {
    DEFAULT_FROM_NAME.to_string()
}

fn default_email_api_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_sms_api_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_server_port() -> u16 {
    3001
}
