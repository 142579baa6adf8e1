use crate::models::{Coordinates, Waypoint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Walk,
    Bike,
    Drive,
}

impl TransportMode {
    /// Returns the directions API `mode` value for this transport mode
    pub fn directions_mode(&self) -> &str {
        match self {
            TransportMode::Walk => "walking",
            TransportMode::Bike => "bicycling",
            TransportMode::Drive => "driving",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Walk => write!(f, "walk"),
            TransportMode::Bike => write!(f, "bike"),
            TransportMode::Drive => write!(f, "drive"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "walk" | "walking" => Ok(TransportMode::Walk),
            "bike" | "bicycling" | "cycling" => Ok(TransportMode::Bike),
            "drive" | "driving" | "car" => Ok(TransportMode::Drive),
            _ => Err(format!("Invalid transport mode: '{}'", s)),
        }
    }
}

/// Where the visiting order of a [`DirectionsResult`] came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteSource {
    External,
    FallbackTsp,
}

/// Non-fatal conditions the caller may surface to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteNotice {
    /// Fewer than two waypoints; markers only, no connecting path.
    NotEnoughPoints,
    /// The directions service failed and the local solver produced the order.
    DirectionsDegraded,
}

/// Displayable route for one location, built fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectionsResult {
    pub ordered_waypoints: Vec<Waypoint>,
    pub path_polyline: Vec<Coordinates>,
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
    pub source: RouteSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<RouteNotice>,
}

impl DirectionsResult {
    pub fn is_degraded(&self) -> bool {
        self.notice == Some(RouteNotice::DirectionsDegraded)
    }

    pub fn distance_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.total_duration_seconds / 60.0).round() as u32
    }
}

/// What a display-route session publishes: a quick direct path first, then the
/// optimized (or fallback) route once it is known.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteUpdate {
    Interim(DirectionsResult),
    Final(DirectionsResult),
}

impl RouteUpdate {
    pub fn result(&self) -> &DirectionsResult {
        match self {
            RouteUpdate::Interim(result) | RouteUpdate::Final(result) => result,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, RouteUpdate::Final(_))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayRouteRequest {
    pub location_id: String,
    pub waypoints: Vec<Waypoint>,
}

impl DisplayRouteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.location_id.trim().is_empty() {
            return Err("location_id must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mode_parsing() {
        assert_eq!("walking".parse::<TransportMode>().unwrap(), TransportMode::Walk);
        assert_eq!("Bike".parse::<TransportMode>().unwrap(), TransportMode::Bike);
        assert!("boat".parse::<TransportMode>().is_err());
        assert_eq!(TransportMode::default().directions_mode(), "walking");
    }

    #[test]
    fn test_source_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_value(RouteSource::FallbackTsp).unwrap(),
            "FALLBACK_TSP"
        );
        assert_eq!(
            serde_json::to_value(RouteNotice::DirectionsDegraded).unwrap(),
            "DIRECTIONS_DEGRADED"
        );
    }

    #[test]
    fn test_result_conversions() {
        let result = DirectionsResult {
            ordered_waypoints: Vec::new(),
            path_polyline: Vec::new(),
            total_distance_meters: 5240.0,
            total_duration_seconds: 3720.0,
            source: RouteSource::External,
            notice: None,
        };
        assert_eq!(result.distance_km(), 5.24);
        assert_eq!(result.duration_minutes(), 62);
        assert!(!result.is_degraded());
    }

    #[test]
    fn test_request_validation() {
        let request = DisplayRouteRequest {
            location_id: " ".to_string(),
            waypoints: Vec::new(),
        };
        assert!(request.validate().is_err());
    }
}
