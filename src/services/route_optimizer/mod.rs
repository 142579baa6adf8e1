//! Local route optimizer, used whenever the directions service cannot order
//! the waypoints for us.
//!
//! Closed-loop TSP over a handful of points: nearest neighbour construction
//! followed by first-improvement 2-opt. Deterministic for a given input.

mod distance_matrix;
mod polyline;
mod tour;
mod two_opt;

pub use distance_matrix::{build_distance_matrix, DistanceMatrix};
pub use polyline::decode_polyline;
pub use tour::{nearest_neighbor_tour, Tour};
pub use two_opt::two_opt_improve;

use crate::models::Coordinates;

/// Solves a closed tour starting (and ending) at `points[0]`.
///
/// Zero points give an empty tour and one point gives `[0]`.
pub fn solve_tsp(points: &[Coordinates]) -> Tour {
    match points.len() {
        0 => return Tour::empty(),
        1 => return Tour::new(vec![0]),
        _ => {}
    }

    let matrix = match build_distance_matrix(points) {
        Ok(matrix) => matrix,
        // Unreachable for non-empty input.
        Err(_) => return Tour::new((0..points.len()).collect()),
    };

    let initial = nearest_neighbor_tour(&matrix);
    let initial_km = initial.closed_length(&matrix);
    let tour = two_opt_improve(initial, &matrix);

    tracing::debug!(
        points = points.len(),
        nearest_neighbor_km = %format!("{:.3}", initial_km),
        two_opt_km = %format!("{:.3}", tour.closed_length(&matrix)),
        "Solved {}-point tour",
        points.len()
    );

    tour
}
