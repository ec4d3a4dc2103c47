//! HTTP health-check endpoint.
//!
//! Lets an uptime monitor (or a hosting platform's health probe) see that the
//! process is alive and how many reminders are armed.

use crate::reminders::Scheduler;
use axum::{extract::State, response::Json, routing::get, Router};
use minitats_core::config::ApiConfig;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{error, info};

#[derive(Clone)]
pub struct ApiState {
    pub bot_name: String,
    pub uptime: Instant,
    pub scheduler: Scheduler,
}

async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "bot": state.bot_name,
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "armed_reminders": state.scheduler.armed_count(),
    }))
}

/// Build the axum router with shared state.
fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .with_state(state)
}

/// Start the API server. Called from `Gateway::run()`.
pub async fn serve(config: ApiConfig, state: ApiState) {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("API server failed to bind to {addr}: {e}");
            return;
        }
    };

    info!("API server listening on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        error!("API server error: {e}");
    }
}
