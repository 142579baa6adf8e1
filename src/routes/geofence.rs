use crate::error::Result;
use crate::geometry::Geofence;
use crate::models::Coordinates;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct GeofenceCheckRequest {
    pub point: Coordinates,
    pub polygon: Vec<Coordinates>,
}

#[derive(Debug, Serialize)]
pub struct GeofenceCheckResponse {
    pub inside: bool,
    pub centroid: Coordinates,
    pub distance_to_centroid_km: f64,
}

/// POST /geofence/contains
/// Check whether a point lies inside an assigned area
pub async fn check_geofence(
    Json(request): Json<GeofenceCheckRequest>,
) -> Result<Json<GeofenceCheckResponse>> {
    let fence = Geofence::new(request.polygon)?;
    let inside = fence.contains(&request.point);
    let centroid = fence.centroid();

    tracing::debug!(
        lat = request.point.lat,
        lng = request.point.lng,
        vertices = fence.vertices().len(),
        inside,
        "Geofence check"
    );

    Ok(Json(GeofenceCheckResponse {
        inside,
        centroid,
        distance_to_centroid_km: request.point.distance_to(&centroid),
    }))
}
