pub mod debug;
pub mod display_route;
pub mod geofence;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/display", post(display_route::create_display_route))
        .route("/locations/{id}/route", get(display_route::get_location_route))
        .route("/geofence/contains", post(geofence::check_geofence))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
