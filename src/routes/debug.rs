use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report service wiring
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let provider = state.coordinator.provider_name();

    let mut status = json!({
        "status": "ok",
        "checks": {
            "directions": provider,
            "directions_timeout_secs": state.coordinator.timeout().as_secs(),
        }
    });

    // Still serving, but every route will come from the local solver.
    if provider == "unavailable" {
        status["status"] = json!("degraded");
    }

    Json(status)
}
