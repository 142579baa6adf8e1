use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// One stop of a location's route, e.g. a surveyed boundary vertex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    #[serde(flatten)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_hint: Option<i32>,
}

impl Waypoint {
    pub fn new(coordinates: Coordinates, label: impl Into<String>, kind: impl Into<String>) -> Self {
        Waypoint {
            coordinates,
            label: label.into(),
            kind: kind.into(),
            sequence_hint: None,
        }
    }

    pub fn with_sequence_hint(mut self, hint: i32) -> Self {
        self.sequence_hint = Some(hint);
        self
    }

    pub fn point(&self) -> Coordinates {
        self.coordinates
    }
}

/// Positions of a waypoint list, in order.
pub fn points_of(waypoints: &[Waypoint]) -> Vec<Coordinates> {
    waypoints.iter().map(Waypoint::point).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_json_shape() {
        let wp: Waypoint = serde_json::from_str(
            r#"{"lat": 12.97, "lng": 77.59, "label": "Gate", "kind": "boundary"}"#,
        )
        .unwrap();
        assert_eq!(wp.label, "Gate");
        assert_eq!(wp.kind, "boundary");
        assert_eq!(wp.sequence_hint, None);
        assert_eq!(wp.point().lat, 12.97);

        let json = serde_json::to_value(&wp).unwrap();
        assert_eq!(json["lng"], 77.59);
        assert!(json.get("sequence_hint").is_none());
    }

    #[test]
    fn test_label_and_kind_default() {
        let wp: Waypoint = serde_json::from_str(r#"{"lat": 1.0, "lng": 2.0}"#).unwrap();
        assert!(wp.label.is_empty());
        assert!(wp.kind.is_empty());
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let result = serde_json::from_str::<Waypoint>(r#"{"lat": -95.0, "lng": 2.0}"#);
        assert!(result.is_err());
    }
}
