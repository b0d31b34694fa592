use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tracing::debug;

use crate::{
    clients::provider::DeliveryProvider,
    models::{
        health::{HealthCheckResponse, HealthStatus, ServiceHealth},
        liveness::LivenessCounters,
    },
};

pub struct HealthChecker {
    providers: Vec<Arc<dyn DeliveryProvider>>,
    counters: Arc<LivenessCounters>,
}

impl HealthChecker {
    pub fn new(providers: Vec<Arc<dyn DeliveryProvider>>, counters: Arc<LivenessCounters>) -> Self {
        Self {
            providers,
            counters,
        }
    }

    pub fn check_all(&self) -> HealthCheckResponse {
        let checks: HashMap<String, ServiceHealth> = self
            .providers
            .iter()
            .map(|provider| {
                let channel = provider.channel();
                let health = if provider.is_configured() {
                    ServiceHealth::configured()
                } else {
                    ServiceHealth::unconfigured(format!("{} provider credentials missing", channel))
                };
                debug!(channel = %channel, configured = health.configured, "Provider checked");
                (channel.to_string(), health)
            })
            .collect();

        HealthCheckResponse {
            status: determine_overall_status(&checks),
            timestamp: Utc::now(),
            checks,
            liveness: self.counters.snapshot(),
        }
    }
}

/// A missing provider degrades the service but never takes it down: the other
/// channel and the liveness surface keep working.
fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
    let has_degraded = checks
        .values()
        .any(|health| health.status == HealthStatus::Degraded);

    if has_degraded {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
