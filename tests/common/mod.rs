use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use surveyroute::models::{Coordinates, TransportMode, Waypoint};
use surveyroute::services::directions::{DirectionsProvider, OptimizedRoute, RouteLeg};
use surveyroute::services::directions_coordinator::DirectionsCoordinator;
use surveyroute::services::location_service::WaypointSource;
use surveyroute::{AppError, AppState, Result};

/// Create a test waypoint
#[allow(dead_code)]
pub fn waypoint(lat: f64, lng: f64, label: &str) -> Waypoint {
    Waypoint::new(Coordinates::new(lat, lng).unwrap(), label, "boundary")
}

/// Boundary of a survey plot (Cubbon Park, Bengaluru), deliberately out of order
#[allow(dead_code)]
pub fn survey_site() -> Vec<Waypoint> {
    vec![
        waypoint(12.9763, 77.5929, "north gate"),
        waypoint(12.9698, 77.5986, "south east"),
        waypoint(12.9779, 77.5962, "north east"),
        waypoint(12.9712, 77.5907, "south west"),
        waypoint(12.9745, 77.5998, "east"),
        waypoint(12.9731, 77.5921, "west"),
    ]
}

/// Directions provider that always fails and counts its calls
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingDirections {
    pub calls: AtomicUsize,
}

#[async_trait]
impl DirectionsProvider for FailingDirections {
    async fn fetch_optimized_route(
        &self,
        _origin: &Coordinates,
        _destination: &Coordinates,
        _intermediates: &[Coordinates],
        _mode: TransportMode,
    ) -> Result<OptimizedRoute> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::DirectionsApi("HTTP 503: unavailable".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

/// Directions provider returning a canned route, optionally after a delay
#[allow(dead_code)]
pub struct StaticDirections {
    pub route: OptimizedRoute,
    pub delay: Duration,
    pub last_intermediates: std::sync::Mutex<Vec<Coordinates>>,
}

#[allow(dead_code)]
impl StaticDirections {
    pub fn new(route: OptimizedRoute) -> Self {
        StaticDirections {
            route,
            delay: Duration::ZERO,
            last_intermediates: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl DirectionsProvider for StaticDirections {
    async fn fetch_optimized_route(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
        intermediates: &[Coordinates],
        mode: TransportMode,
    ) -> Result<OptimizedRoute> {
        assert_eq!(origin, destination, "display routes are closed loops");
        assert_eq!(mode, TransportMode::Walk);
        *self.last_intermediates.lock().unwrap() = intermediates.to_vec();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.route.clone())
    }

    fn provider_name(&self) -> &'static str {
        "static"
    }
}

/// Route over `n` intermediates visited in reverse, one straight leg each
#[allow(dead_code)]
pub fn reversed_route(n: usize) -> OptimizedRoute {
    OptimizedRoute {
        waypoint_order: (0..n).rev().collect(),
        legs: (0..=n)
            .map(|_| RouteLeg {
                distance_meters: 250.0,
                duration_seconds: 180.0,
                step_polylines: Vec::new(),
            })
            .collect(),
        overview_polyline: Some("_p~iF~ps|U_ulLnnqC_mqNvxq`@".to_string()),
    }
}

/// Waypoint source backed by a map; unknown ids are NotFound
#[allow(dead_code)]
#[derive(Default)]
pub struct MapWaypointSource {
    pub locations: HashMap<String, Vec<Waypoint>>,
}

#[async_trait]
impl WaypointSource for MapWaypointSource {
    async fn fetch_route_waypoints(&self, location_id: &str) -> Result<Vec<Waypoint>> {
        self.locations
            .get(location_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Location {}", location_id)))
    }
}

/// Build application state around a directions provider
#[allow(dead_code)]
pub fn test_state(
    provider: Arc<dyn DirectionsProvider>,
    waypoint_source: MapWaypointSource,
) -> Arc<AppState> {
    Arc::new(AppState {
        coordinator: DirectionsCoordinator::new(provider, Duration::from_secs(5)),
        waypoint_source: Arc::new(waypoint_source),
    })
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests() -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var("DIRECTIONS_API_KEY").is_err()
}
