use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    clients::health::HealthChecker,
    dispatch::Dispatcher,
    models::{
        dispatch::DispatchResult,
        health::HealthCheckResponse,
        liveness::{LivenessCounters, LivenessSnapshot},
        notification::NotificationRequest,
        response::ApiResponse,
    },
};

pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub health_checker: HealthChecker,
    pub counters: Arc<LivenessCounters>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>, counters: Arc<LivenessCounters>) -> Self {
        let health_checker = HealthChecker::new(dispatcher.providers(), Arc::clone(&counters));

        Self {
            dispatcher,
            health_checker,
            counters,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/liveness", get(query_liveness))
        .route("/api/notifications", post(submit_notification))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server(state: Arc<AppState>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "API server started");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn submit_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiResponse<DispatchResult>>) {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            info!(error = %rejection.body_text(), "Rejected malformed notification payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "validation_error".to_string(),
                    rejection.body_text(),
                )),
            );
        }
    };

    match state.dispatcher.dispatch(request).await {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                result,
                "Notification dispatched".to_string(),
            )),
        ),
        Err(failure) => (
            failure.status_code(),
            Json(ApiResponse::error(
                failure.code().to_string(),
                failure.public_message(),
            )),
        ),
    }
}

async fn query_liveness(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<LivenessSnapshot>> {
    Json(ApiResponse::success(
        state.counters.snapshot(),
        "Liveness counters".to_string(),
    ))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthCheckResponse> {
    Json(state.health_checker.check_all())
}
