#![allow(dead_code)]

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use review_notify::{
    clients::{liveness::SelfCheck, provider::DeliveryProvider},
    dispatch::Dispatcher,
    models::{
        message::OutboundMessage,
        notification::{Channel, NotificationKind, NotificationRequest},
        provider::{ProviderAck, ProviderError},
    },
    utils::FixedClock,
};

#[derive(Clone)]
pub enum Behavior {
    Ack { id: String, status: String },
    Fail(ProviderError),
    Hang,
}

pub struct StubProvider {
    channel: Channel,
    configured: bool,
    behavior: Behavior,
    calls: AtomicUsize,
    last: Mutex<Option<OutboundMessage>>,
}

impl StubProvider {
    pub fn new(channel: Channel, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            channel,
            configured: true,
            behavior,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn acking(channel: Channel, id: &str, status: &str) -> Arc<Self> {
        Self::new(
            channel,
            Behavior::Ack {
                id: id.to_string(),
                status: status.to_string(),
            },
        )
    }

    pub fn unconfigured(channel: Channel) -> Arc<Self> {
        Arc::new(Self {
            channel,
            configured: false,
            behavior: Behavior::Fail(ProviderError::Unconfigured),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_message(&self) -> Option<OutboundMessage> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryProvider for StubProvider {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, message: &OutboundMessage) -> Result<ProviderAck, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(message.clone());

        match &self.behavior {
            Behavior::Ack { id, status } => Ok(ProviderAck {
                id: id.clone(),
                status: status.clone(),
            }),
            Behavior::Fail(error) => Err(error.clone()),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::Internal("woke up".to_string()))
            }
        }
    }
}

/// Self-check double that fails on the listed (zero-based) attempts.
pub struct ScriptedCheck {
    failing_attempts: Vec<usize>,
    attempts: AtomicUsize,
}

impl ScriptedCheck {
    pub fn new(failing_attempts: Vec<usize>) -> Arc<Self> {
        Arc::new(Self {
            failing_attempts,
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SelfCheck for ScriptedCheck {
    async fn check(&self) -> Result<(), Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.failing_attempts.contains(&attempt) {
            Err(anyhow!("simulated failure on attempt {}", attempt))
        } else {
            Ok(())
        }
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

pub fn dispatcher(email: Arc<StubProvider>, sms: Arc<StubProvider>) -> Dispatcher {
    Dispatcher::with_clock(email, sms, Arc::new(FixedClock(fixed_now())))
}

pub fn review_request(channel: Channel, recipient: &str) -> NotificationRequest {
    NotificationRequest::new(channel, NotificationKind::ReviewRequest, recipient)
        .with_customer_name("Jane")
        .with_business_name("Acme")
        .with_review_link("https://g.co/r")
}

pub fn feedback_alert(rating: i64) -> NotificationRequest {
    NotificationRequest::new(Channel::Email, NotificationKind::FeedbackAlert, "owner@acme.com")
        .with_customer_name("Jane")
        .with_business_name("Acme")
        .with_review_link("https://app.revboostapp.com/feedback/42")
        .with_rating(rating)
}
