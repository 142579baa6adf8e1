use crate::constants::DEFAULT_DIRECTIONS_BASE_URL;
use crate::error::{AppError, Result};
use crate::models::{Coordinates, TransportMode};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// One leg of an optimized route, as reported by the directions service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Encoded polylines of the leg's steps, in travel order.
    pub step_polylines: Vec<String>,
}

/// Optimized route as reported by the directions service, still encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedRoute {
    /// Visiting order of the intermediate waypoints (indices into them).
    pub waypoint_order: Vec<usize>,
    pub legs: Vec<RouteLeg>,
    pub overview_polyline: Option<String>,
}

/// External service able to order waypoints and return a road-following path.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn fetch_optimized_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        intermediates: &[Coordinates],
        mode: TransportMode,
    ) -> Result<OptimizedRoute>;

    fn provider_name(&self) -> &'static str;
}

/// Google Directions API client (`waypoints=optimize:true|...`).
#[derive(Clone)]
pub struct GoogleDirectionsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleDirectionsClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_config(api_key, DEFAULT_DIRECTIONS_BASE_URL.to_string(), timeout)
    }

    pub fn with_config(api_key: String, base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GoogleDirectionsClient {
            client,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirectionsClient {
    async fn fetch_optimized_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        intermediates: &[Coordinates],
        mode: TransportMode,
    ) -> Result<OptimizedRoute> {
        let waypoints_param = optimize_waypoints_param(intermediates);

        tracing::debug!(
            intermediates = intermediates.len(),
            mode = %mode.directions_mode(),
            "Directions API request: {} intermediates, mode {}",
            intermediates.len(), mode.directions_mode()
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origin", origin.to_query_param()),
                ("destination", destination.to_query_param()),
                ("waypoints", waypoints_param),
                ("mode", mode.directions_mode().to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::DirectionsApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                "Directions API HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::DirectionsApi(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: DirectionsApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::DirectionsApi(format!("Failed to parse response: {}", e)))?;

        let route = body.into_optimized_route()?;
        tracing::debug!(
            legs = route.legs.len(),
            order = ?route.waypoint_order,
            "Directions response: {} legs",
            route.legs.len()
        );
        Ok(route)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}

/// Stand-in used when no API key is configured: every request fails, so every
/// route is ordered by the local solver.
#[derive(Debug, Clone, Default)]
pub struct UnavailableDirections;

#[async_trait]
impl DirectionsProvider for UnavailableDirections {
    async fn fetch_optimized_route(
        &self,
        _origin: &Coordinates,
        _destination: &Coordinates,
        _intermediates: &[Coordinates],
        _mode: TransportMode,
    ) -> Result<OptimizedRoute> {
        Err(AppError::DirectionsApi(
            "No directions provider configured".to_string(),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "unavailable"
    }
}

/// `optimize:true|lat,lng|lat,lng|...`
fn optimize_waypoints_param(intermediates: &[Coordinates]) -> String {
    std::iter::once("optimize:true".to_string())
        .chain(intermediates.iter().map(Coordinates::to_query_param))
        .collect::<Vec<_>>()
        .join("|")
}

// Directions API response types

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    status: String,
    #[serde(default)]
    routes: Vec<ApiRoute>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    #[serde(default)]
    waypoint_order: Vec<usize>,
    #[serde(default)]
    legs: Vec<ApiLeg>,
    #[serde(default)]
    overview_polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    #[serde(default)]
    distance: Option<ApiValue>,
    #[serde(default)]
    duration: Option<ApiValue>,
    #[serde(default)]
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    #[serde(default)]
    polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
struct ApiValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct ApiPolyline {
    points: String,
}

impl DirectionsApiResponse {
    fn into_optimized_route(self) -> Result<OptimizedRoute> {
        if self.status != "OK" {
            tracing::warn!(
                status = %self.status,
                message = ?self.error_message,
                "Directions API returned status {}",
                self.status
            );
            return Err(AppError::DirectionsApi(format!(
                "Status {}: {}",
                self.status,
                self.error_message.unwrap_or_default()
            )));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| AppError::DirectionsApi("No routes found".to_string()))?;

        let legs = route
            .legs
            .into_iter()
            .map(|leg| RouteLeg {
                distance_meters: leg.distance.map_or(0.0, |d| d.value),
                duration_seconds: leg.duration.map_or(0.0, |d| d.value),
                step_polylines: leg
                    .steps
                    .into_iter()
                    .filter_map(|step| step.polyline.map(|p| p.points))
                    .collect(),
            })
            .collect();

        Ok(OptimizedRoute {
            waypoint_order: route.waypoint_order,
            legs,
            overview_polyline: route.overview_polyline.map(|p| p.points),
        })
    }
}
