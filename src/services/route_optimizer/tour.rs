use super::distance_matrix::DistanceMatrix;
use serde::{Deserialize, Serialize};

/// Closed visiting order: indices into the input list, returning implicitly
/// from the last index to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tour(Vec<usize>);

impl Tour {
    pub fn new(order: Vec<usize>) -> Self {
        Tour(order)
    }

    pub fn empty() -> Self {
        Tour(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }

    /// True when every index of `0..n` appears exactly once.
    pub fn is_permutation_of(&self, n: usize) -> bool {
        if self.0.len() != n {
            return false;
        }
        let mut seen = vec![false; n];
        for &index in &self.0 {
            if index >= n || seen[index] {
                return false;
            }
            seen[index] = true;
        }
        true
    }

    /// Total length (km) including the closing edge back to the start.
    pub fn closed_length(&self, matrix: &DistanceMatrix) -> f64 {
        let n = self.0.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|k| matrix.get(self.0[k], self.0[(k + 1) % n]))
            .sum()
    }

    /// Reorders `items` by this tour.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        self.0.iter().map(|&index| items[index].clone()).collect()
    }

    pub(super) fn reverse_segment(&mut self, from: usize, to: usize) {
        self.0[from..=to].reverse();
    }
}

/// Greedy construction from index 0: always move to the nearest unvisited
/// point. Equidistant candidates resolve to the lowest index.
pub fn nearest_neighbor_tour(matrix: &DistanceMatrix) -> Tour {
    let n = matrix.len();
    if n <= 1 {
        return Tour(vec![0]);
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0;
    visited[current] = true;
    order.push(current);

    while order.len() < n {
        let mut best: Option<(usize, f64)> = None;
        for (candidate, &distance) in matrix.row(current).iter().enumerate() {
            if visited[candidate] {
                continue;
            }
            // Strict comparison keeps the first (lowest) index on ties.
            if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                best = Some((candidate, distance));
            }
        }

        let Some((next, _)) = best else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    Tour(order)
}

#[cfg(test)]
mod tests {
    use super::super::distance_matrix::build_distance_matrix;
    use super::*;
    use crate::models::Coordinates;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    #[test]
    fn test_nearest_neighbor_follows_a_line() {
        let points = vec![c(0.0, 0.0), c(0.0, 3.0), c(0.0, 1.0), c(0.0, 2.0)];
        let matrix = build_distance_matrix(&points).unwrap();
        let tour = nearest_neighbor_tour(&matrix);
        assert_eq!(tour.as_slice(), &[0, 2, 3, 1]);
    }

    #[test]
    fn test_nearest_neighbor_tie_breaks_on_lowest_index() {
        // 1 and 2 are equidistant from 0
        let points = vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, -1.0)];
        let matrix = build_distance_matrix(&points).unwrap();
        let tour = nearest_neighbor_tour(&matrix);
        assert_eq!(tour.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn test_single_point_tour() {
        let matrix = build_distance_matrix(&[c(10.0, 10.0)]).unwrap();
        assert_eq!(nearest_neighbor_tour(&matrix).as_slice(), &[0]);
    }

    #[test]
    fn test_closed_length_includes_return_edge() {
        let points = vec![c(0.0, 0.0), c(0.0, 1.0)];
        let matrix = build_distance_matrix(&points).unwrap();
        let tour = Tour::new(vec![0, 1]);
        assert!((tour.closed_length(&matrix) - 2.0 * matrix.get(0, 1)).abs() < 1e-12);
    }

    #[test]
    fn test_permutation_check() {
        assert!(Tour::new(vec![2, 0, 1]).is_permutation_of(3));
        assert!(!Tour::new(vec![0, 0, 1]).is_permutation_of(3));
        assert!(!Tour::new(vec![0, 1]).is_permutation_of(3));
        assert!(!Tour::new(vec![0, 1, 3]).is_permutation_of(3));
        assert!(Tour::empty().is_permutation_of(0));
    }

    #[test]
    fn test_apply_reorders_items() {
        let tour = Tour::new(vec![2, 0, 1]);
        assert_eq!(tour.apply(&["a", "b", "c"]), vec!["c", "a", "b"]);
    }
}
