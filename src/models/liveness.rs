use std::{sync::Mutex, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LIVENESS_INTERVAL: Duration = Duration::from_secs(14 * 60);
pub const DEFAULT_LIVENESS_INITIAL_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessPolicy {
    pub enabled: bool,
    pub interval: Duration,
    pub initial_delay: Duration,
}

impl LivenessPolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_LIVENESS_INTERVAL,
            initial_delay: DEFAULT_LIVENESS_INITIAL_DELAY,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::enabled()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LivenessSnapshot {
    pub total_attempts: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct CounterState {
    total_attempts: u64,
    success_count: u64,
    failure_count: u64,
    last_attempt_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Rolling liveness counters, shared between the scheduler (writer) and
/// diagnostic queries (readers). One mutex guards every field so a snapshot
/// never observes half of an update.
#[derive(Debug)]
pub struct LivenessCounters {
    started_at: DateTime<Utc>,
    state: Mutex<CounterState>,
}

impl LivenessCounters {
    pub fn new() -> Self {
        Self::with_start(Utc::now())
    }

    pub fn with_start(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            state: Mutex::new(CounterState {
                total_attempts: 0,
                success_count: 0,
                failure_count: 0,
                last_attempt_at: None,
                last_error: None,
            }),
        }
    }

    pub fn record_success(&self, at: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.total_attempts += 1;
        state.success_count += 1;
        state.last_attempt_at = Some(at);
        state.last_error = None;
    }

    pub fn record_failure(&self, at: DateTime<Utc>, error: String) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.total_attempts += 1;
        state.failure_count += 1;
        state.last_attempt_at = Some(at);
        state.last_error = Some(error);
    }

    pub fn snapshot(&self) -> LivenessSnapshot {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Utc::now();

        LivenessSnapshot {
            total_attempts: state.total_attempts,
            success_count: state.success_count,
            failure_count: state.failure_count,
            last_attempt_at: state.last_attempt_at,
            started_at: self.started_at,
            uptime_seconds: (now - self.started_at).num_seconds().max(0),
            last_error: state.last_error.clone(),
        }
    }
}

impl Default for LivenessCounters {
    fn default() -> Self {
        Self::new()
    }
}
