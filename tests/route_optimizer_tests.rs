use surveyroute::models::Coordinates;
use surveyroute::services::route_optimizer::{
    build_distance_matrix, decode_polyline, nearest_neighbor_tour, solve_tsp, two_opt_improve,
};

/// Scattered points around a survey area, reproducible without a RNG crate
fn scattered_points(n: usize, seed: u64) -> Vec<Coordinates> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64) / ((1u64 << 31) as f64)
    };
    (0..n)
        .map(|_| Coordinates::new(12.90 + next() * 0.1, 77.55 + next() * 0.1).unwrap())
        .collect()
}

#[test]
fn test_tour_is_a_permutation_starting_at_origin() {
    for n in 2..=25 {
        let points = scattered_points(n, n as u64);
        let tour = solve_tsp(&points);
        assert!(tour.is_permutation_of(n), "n = {}: {:?}", n, tour);
        assert_eq!(tour.as_slice()[0], 0);
    }
}

#[test]
fn test_solver_is_deterministic() {
    let points = scattered_points(15, 42);
    let first = solve_tsp(&points);
    for _ in 0..5 {
        assert_eq!(solve_tsp(&points), first);
    }
}

#[test]
fn test_two_opt_never_lengthens_the_tour() {
    for seed in 1..20 {
        let points = scattered_points(12, seed);
        let matrix = build_distance_matrix(&points).unwrap();
        let initial = nearest_neighbor_tour(&matrix);
        let initial_km = initial.closed_length(&matrix);

        let improved = two_opt_improve(initial, &matrix);
        assert!(improved.closed_length(&matrix) <= initial_km + 1e-9);
        assert_eq!(improved.as_slice()[0], 0);
    }
}

#[test]
fn test_two_opt_untangles_crossing_tour() {
    // Square visited along both diagonals
    let points = vec![
        Coordinates::new(0.0, 0.0).unwrap(),
        Coordinates::new(0.01, 0.01).unwrap(),
        Coordinates::new(0.0, 0.01).unwrap(),
        Coordinates::new(0.01, 0.0).unwrap(),
    ];
    let matrix = build_distance_matrix(&points).unwrap();
    let crossing = surveyroute::services::route_optimizer::Tour::new(vec![0, 1, 2, 3]);
    let crossing_km = crossing.closed_length(&matrix);

    let improved = two_opt_improve(crossing, &matrix);
    assert!(improved.closed_length(&matrix) < crossing_km);
    assert!(improved.is_permutation_of(4));
}

#[test]
fn test_degenerate_inputs() {
    assert!(solve_tsp(&[]).is_empty());
    assert_eq!(solve_tsp(&scattered_points(1, 7)).as_slice(), &[0]);
    assert!(build_distance_matrix(&[]).is_err());

    // Identical points still give a valid tour
    let same = vec![Coordinates::new(12.97, 77.59).unwrap(); 5];
    let tour = solve_tsp(&same);
    assert_eq!(tour.as_slice(), &[0, 1, 2, 3, 4]);
}

#[test]
fn test_collinear_points_visit_in_line_order() {
    let points: Vec<Coordinates> = [0.0, 0.03, 0.01, 0.04, 0.02]
        .iter()
        .map(|&lng| Coordinates::new(0.0, lng).unwrap())
        .collect();
    let tour = solve_tsp(&points);
    assert_eq!(tour.as_slice(), &[0, 2, 4, 1, 3]);
}

#[test]
fn test_decoded_polyline_feeds_the_solver() {
    let path = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    assert_eq!(path.len(), 3);
    assert!((path[0].lat - 38.5).abs() < 1e-9);
    assert!((path[0].lng + 120.2).abs() < 1e-9);
    assert!((path[2].lat - 43.252).abs() < 1e-9);
    assert!((path[2].lng + 126.453).abs() < 1e-9);

    let tour = solve_tsp(&path);
    assert!(tour.is_permutation_of(3));
}

#[test]
fn test_malformed_polyline_keeps_decoded_prefix() {
    assert!(decode_polyline("").is_empty());
    // Truncated after the first point
    let truncated = decode_polyline("_p~iF~ps|U_ulL");
    assert_eq!(truncated.len(), 1);
}
