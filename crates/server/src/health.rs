use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

pub const SERVICE_NAME: &str = "fyndy-api";

#[derive(Clone)]
pub struct HealthState {
    port: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub port: u16,
    pub checked_at: String,
}

pub fn router(port: u16) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { port })
}

pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        port: state.port,
        checked_at: Utc::now().to_rfc3339(),
    })
}
