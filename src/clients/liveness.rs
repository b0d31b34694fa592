use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tokio::{
    task::JoinHandle,
    time::{Instant, interval_at, sleep, timeout},
};
use tracing::{debug, info, warn};

use crate::models::liveness::{LivenessCounters, LivenessPolicy};

pub const SELF_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// One outbound call proving the service can be reached.
#[async_trait]
pub trait SelfCheck: Send + Sync {
    async fn check(&self) -> Result<(), Error>;
}

pub struct HttpSelfCheck {
    http_client: Client,
    url: String,
}

impl HttpSelfCheck {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(SELF_CHECK_TIMEOUT)
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        Ok(Self {
            http_client,
            url: format!("{}/health", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SelfCheck for HttpSelfCheck {
    async fn check(&self) -> Result<(), Error> {
        let response = self.http_client.get(&self.url).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(anyhow!("Self-check returned status {}", status))
        }
    }
}

pub struct LivenessScheduler {
    policy: LivenessPolicy,
    check: Arc<dyn SelfCheck>,
    counters: Arc<LivenessCounters>,
    started: AtomicBool,
}

impl LivenessScheduler {
    pub fn new(
        policy: LivenessPolicy,
        check: Arc<dyn SelfCheck>,
        counters: Arc<LivenessCounters>,
    ) -> Self {
        Self {
            policy,
            check,
            counters,
            started: AtomicBool::new(false),
        }
    }

    pub fn counters(&self) -> Arc<LivenessCounters> {
        Arc::clone(&self.counters)
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Spawns the tick loop. Returns `None` when the policy is disabled or the
    /// loop is already running.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if !self.policy.enabled {
            info!("Liveness scheduler disabled for this environment");
            return None;
        }

        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Liveness scheduler already running");
            return None;
        }

        let check = Arc::clone(&self.check);
        let counters = Arc::clone(&self.counters);
        let policy = self.policy.clone();

        info!(
            interval_secs = policy.interval.as_secs(),
            initial_delay_secs = policy.initial_delay.as_secs(),
            "Liveness scheduler started"
        );

        Some(tokio::spawn(async move {
            sleep(policy.initial_delay).await;
            run_tick(check.as_ref(), &counters).await;

            let mut ticker = interval_at(Instant::now() + policy.interval, policy.interval);
            loop {
                ticker.tick().await;
                run_tick(check.as_ref(), &counters).await;
            }
        }))
    }

    /// Performs a single self-check and records it. Never fails.
    pub async fn tick(&self) -> bool {
        run_tick(self.check.as_ref(), &self.counters).await
    }
}

async fn run_tick(check: &dyn SelfCheck, counters: &LivenessCounters) -> bool {
    let outcome = match timeout(SELF_CHECK_TIMEOUT, check.check()).await {
        Ok(result) => result,
        Err(_) => Err(anyhow!(
            "Self-check timed out after {}s",
            SELF_CHECK_TIMEOUT.as_secs()
        )),
    };

    match outcome {
        Ok(()) => {
            counters.record_success(Utc::now());
            debug!("Liveness tick succeeded");
            true
        }
        Err(e) => {
            warn!(error = %e, "Liveness tick failed");
            counters.record_failure(Utc::now(), e.to_string());
            false
        }
    }
}
