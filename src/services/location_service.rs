use crate::error::{AppError, Result};
use crate::models::{Coordinates, Waypoint};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Source of a location's route waypoints.
#[async_trait]
pub trait WaypointSource: Send + Sync {
    async fn fetch_route_waypoints(&self, location_id: &str) -> Result<Vec<Waypoint>>;
}

/// Client for the location service (`GET /api/locations/:id`).
#[derive(Clone)]
pub struct LocationServiceClient {
    client: Client,
    base_url: Url,
}

impl LocationServiceClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&base_url).map_err(|e| {
            AppError::Internal(format!("Invalid location service URL '{}': {}", base_url, e))
        })?;

        Ok(LocationServiceClient { client, base_url })
    }

    /// The id always becomes a single encoded path segment.
    fn location_url(&self, location_id: &str) -> Result<Url> {
        if matches!(location_id.trim(), "" | "." | "..") {
            return Err(AppError::InvalidRequest(format!(
                "Invalid location id '{}'",
                location_id
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Location service URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "locations", location_id]);
        Ok(url)
    }
}

#[async_trait]
impl WaypointSource for LocationServiceClient {
    async fn fetch_route_waypoints(&self, location_id: &str) -> Result<Vec<Waypoint>> {
        let response = self
            .client
            .get(self.location_url(location_id)?)
            .send()
            .await
            .map_err(|e| AppError::LocationService(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Location {}", location_id)));
        }
        if !response.status().is_success() {
            return Err(AppError::LocationService(format!(
                "HTTP {} for location {}",
                response.status(),
                location_id
            )));
        }

        let body: LocationResponse = response
            .json()
            .await
            .map_err(|e| AppError::LocationService(format!("Failed to parse response: {}", e)))?;

        let waypoints = parse_route_entries(location_id, &body.data.route);
        tracing::info!(
            location_id = %location_id,
            raw = body.data.route.len(),
            valid = waypoints.len(),
            "Fetched {} route waypoints for location {}",
            waypoints.len(), location_id
        );
        Ok(waypoints)
    }
}

#[derive(Debug, Deserialize)]
struct LocationResponse {
    data: LocationData,
}

#[derive(Debug, Deserialize)]
struct LocationData {
    #[serde(default)]
    route: Vec<Value>,
}

/// Turns raw `route[]` entries into waypoints, skipping entries without usable
/// coordinates. Entries are kept loosely typed so one bad entry does not
/// reject the whole response.
pub fn parse_route_entries(location_id: &str, entries: &[Value]) -> Vec<Waypoint> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match parse_route_entry(entry) {
            Ok(coordinates) => Some(
                Waypoint::new(
                    coordinates,
                    string_field(entry, "place"),
                    string_field(entry, "type"),
                )
                .with_sequence_hint(index as i32),
            ),
            Err(reason) => {
                tracing::warn!(
                    location_id = %location_id,
                    index,
                    reason = %reason,
                    "Skipping route entry {}: {}",
                    index, reason
                );
                None
            }
        })
        .collect()
}

fn parse_route_entry(entry: &Value) -> std::result::Result<Coordinates, String> {
    let lat = numeric_field(entry, "latitude").ok_or("missing or non-numeric latitude")?;
    let lng = numeric_field(entry, "longitude").ok_or("missing or non-numeric longitude")?;
    Coordinates::new(lat, lng)
}

/// Accepts numbers and numeric strings ("12.97").
fn numeric_field(entry: &Value, key: &str) -> Option<f64> {
    let value = match entry.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn string_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
