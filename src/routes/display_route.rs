use crate::error::{AppError, Result};
use crate::models::{DirectionsResult, DisplayRouteRequest, Waypoint};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// POST /routes/display
/// Order a location's waypoints into a closed walking route
pub async fn create_display_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DisplayRouteRequest>,
) -> Result<Json<DirectionsResult>> {
    request.validate().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        location_id = %request.location_id,
        waypoints = request.waypoints.len(),
        "Display route request for location {}: {} waypoints",
        request.location_id, request.waypoints.len()
    );

    resolve(&state, &request.location_id, request.waypoints).await
}

/// GET /locations/{id}/route
/// Fetch a location's route from the location service, then order it
pub async fn get_location_route(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<String>,
) -> Result<Json<DirectionsResult>> {
    let waypoints = state
        .waypoint_source
        .fetch_route_waypoints(&location_id)
        .await?;

    resolve(&state, &location_id, waypoints).await
}

async fn resolve(
    state: &AppState,
    location_id: &str,
    waypoints: Vec<Waypoint>,
) -> Result<Json<DirectionsResult>> {
    // Client disconnects drop this future; the guard then cancels the
    // outstanding directions request.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state
        .coordinator
        .resolve_route(location_id, waypoints, &cancel)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Route request cancelled".to_string()))
}
