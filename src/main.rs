use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use review_notify::{
    api::{AppState, run_api_server},
    clients::{
        email::EmailClient,
        liveness::{HttpSelfCheck, LivenessScheduler},
        sms::SmsClient,
    },
    config::Config,
    dispatch::Dispatcher,
    models::liveness::LivenessCounters,
    utils::init_tracing,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;
    init_tracing(config.is_production());

    info!(app_env = %config.app_env, "Configuration loaded");

    let email = Arc::new(EmailClient::new(config.email_config())?);
    let sms = Arc::new(SmsClient::new(config.sms_config())?);
    let dispatcher = Arc::new(Dispatcher::new(email, sms));

    let counters = Arc::new(LivenessCounters::new());

    let self_check_url = config
        .self_check_url
        .clone()
        .unwrap_or_else(|| format!("http://127.0.0.1:{}", config.server_port));
    let scheduler = LivenessScheduler::new(
        config.liveness_policy(),
        Arc::new(HttpSelfCheck::new(&self_check_url)?),
        Arc::clone(&counters),
    );
    let _liveness = scheduler.start();

    let state = Arc::new(AppState::new(dispatcher, counters));

    run_api_server(state, config.server_port)
        .await
        .map_err(|e| anyhow!("API server failed: {}", e))
}
