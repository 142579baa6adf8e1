use super::distance_matrix::DistanceMatrix;
use super::tour::Tour;
use crate::constants::{MAX_TWO_OPT_ITERATIONS, TWO_OPT_EPSILON_KM};

/// First-improvement 2-opt over a closed tour.
///
/// Each scan walks position pairs `(i, j)` with `j >= i + 2`. Reversing
/// `tour[i+1..=j]` replaces edges `(i, i+1)` and `(j, j+1)` by `(i, j)` and
/// `(i+1, j+1)`. The pair `(0, n-1)` is skipped since those two edges share
/// the start vertex. The first strictly shorter tour is committed and the scan
/// restarts from the top. Stops when a whole scan finds nothing, or after
/// [`MAX_TWO_OPT_ITERATIONS`] scans.
pub fn two_opt_improve(tour: Tour, matrix: &DistanceMatrix) -> Tour {
    let n = tour.len();
    if n < 4 {
        return tour;
    }

    let mut tour = tour;
    for iteration in 0..MAX_TWO_OPT_ITERATIONS {
        match first_improving_swap(&tour, matrix) {
            Some((i, j, gain)) => {
                tour.reverse_segment(i + 1, j);
                tracing::trace!(iteration, i, j, gain_km = gain, "2-opt swap committed");
            }
            None => {
                tracing::trace!(iteration, "2-opt converged");
                return tour;
            }
        }
    }

    tracing::debug!(
        max_iterations = MAX_TWO_OPT_ITERATIONS,
        "2-opt stopped at iteration cap"
    );
    tour
}

/// Returns the first `(i, j, gain_km)` whose swap shortens the tour.
pub(super) fn first_improving_swap(
    tour: &Tour,
    matrix: &DistanceMatrix,
) -> Option<(usize, usize, f64)> {
    let order = tour.as_slice();
    let n = order.len();

    for i in 0..n - 2 {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }

            let a = order[i];
            let b = order[i + 1];
            let c = order[j];
            let d = order[(j + 1) % n];

            let removed = matrix.get(a, b) + matrix.get(c, d);
            let added = matrix.get(a, c) + matrix.get(b, d);
            let gain = removed - added;

            if gain > TWO_OPT_EPSILON_KM {
                return Some((i, j, gain));
            }
        }
    }

    None
}
