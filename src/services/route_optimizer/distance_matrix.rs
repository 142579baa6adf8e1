use crate::error::{AppError, Result};
use crate::geometry::haversine_distance_km;
use crate::models::Coordinates;

/// Symmetric great-circle distance matrix (km) with a zero diagonal.
///
/// Built once per optimization call and owned by it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    distances: Vec<f64>,
}

impl DistanceMatrix {
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance in kilometers between points `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.distances[i * self.n..(i + 1) * self.n]
    }
}

/// Pairwise Haversine distances. Only the upper triangle is computed; the
/// lower one is mirrored.
pub fn build_distance_matrix(points: &[Coordinates]) -> Result<DistanceMatrix> {
    if points.is_empty() {
        return Err(AppError::InvalidRequest(
            "Cannot build a distance matrix for zero points".to_string(),
        ));
    }

    let n = points.len();
    let mut distances = vec![0.0; n * n];

    for i in 0..n {
        for j in (i + 1)..n {
            let km = haversine_distance_km(&points[i], &points[j]);
            distances[i * n + j] = km;
            distances[j * n + i] = km;
        }
    }

    Ok(DistanceMatrix { n, distances })
}
