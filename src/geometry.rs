//! Geometry kernel: great-circle distance, geofence membership, centroids.
//!
//! Everything here treats latitude/longitude as planar except the Haversine
//! distance. That is fine for geofences the size of a survey site.

use crate::constants::{EARTH_RADIUS_KM, MIN_POLYGON_VERTICES};
use crate::error::{AppError, Result};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Great-circle distance between two points in kilometers (Haversine, R = 6371 km).
pub fn haversine_distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Ray-casting membership test.
///
/// A ray is cast from `point` and edge crossings are counted; an odd count
/// means inside. The closing edge from the last vertex back to the first is
/// implied. For a point lying exactly on an edge or vertex the answer depends
/// on floating point rounding and is not specified.
pub fn is_point_in_polygon(point: &Coordinates, polygon: &[Coordinates]) -> Result<bool> {
    ensure_polygon(polygon)?;

    let (x, y) = (point.lat, point.lng);
    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].lat, polygon[i].lng);
        let (xj, yj) = (polygon[j].lat, polygon[j].lng);

        let crosses = (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    Ok(inside)
}

/// Vertex average of a polygon (mean latitude, mean longitude).
///
/// Not an area-weighted centroid: unevenly spaced vertices pull the result
/// toward the denser side.
pub fn polygon_centroid(polygon: &[Coordinates]) -> Result<Coordinates> {
    if polygon.is_empty() {
        return Err(AppError::InvalidGeometry(
            "Cannot compute the centroid of an empty polygon".to_string(),
        ));
    }

    let n = polygon.len() as f64;
    let lat = polygon.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = polygon.iter().map(|p| p.lng).sum::<f64>() / n;

    // The mean of valid coordinates is always in range.
    Ok(Coordinates { lat, lng })
}

fn ensure_polygon(polygon: &[Coordinates]) -> Result<()> {
    if polygon.len() < MIN_POLYGON_VERTICES {
        return Err(AppError::InvalidGeometry(format!(
            "Polygon needs at least {} vertices, got {}",
            MIN_POLYGON_VERTICES,
            polygon.len()
        )));
    }
    Ok(())
}

/// Closed polygon delimiting an assigned survey area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinates>", into = "Vec<Coordinates>")]
pub struct Geofence {
    vertices: Vec<Coordinates>,
}

impl Geofence {
    /// Builds a geofence, dropping an explicit closing vertex if the caller
    /// repeated the first one at the end.
    pub fn new(mut vertices: Vec<Coordinates>) -> Result<Self> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        ensure_polygon(&vertices)?;
        Ok(Geofence { vertices })
    }

    pub fn vertices(&self) -> &[Coordinates] {
        &self.vertices
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        // Vertex count was checked on construction.
        is_point_in_polygon(point, &self.vertices).unwrap_or(false)
    }

    pub fn centroid(&self) -> Coordinates {
        let n = self.vertices.len() as f64;
        Coordinates {
            lat: self.vertices.iter().map(|p| p.lat).sum::<f64>() / n,
            lng: self.vertices.iter().map(|p| p.lng).sum::<f64>() / n,
        }
    }
}

impl TryFrom<Vec<Coordinates>> for Geofence {
    type Error = AppError;

    fn try_from(vertices: Vec<Coordinates>) -> Result<Self> {
        Geofence::new(vertices)
    }
}

impl From<Geofence> for Vec<Coordinates> {
    fn from(geofence: Geofence) -> Self {
        geofence.vertices
    }
}
