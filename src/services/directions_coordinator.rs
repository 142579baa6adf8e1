//! Builds the displayable route of a location.
//!
//! The directions service is asked for an optimized walking loop. Whatever
//! happens to that request (error, bad data, timeout), the caller still gets a
//! route: the local TSP solver orders the waypoints and the result is flagged
//! as degraded. A straight-line interim route is published before any network
//! work starts.

use crate::constants::{MAX_DIRECTIONS_WAYPOINTS, WALKING_SPEED_MPS};
use crate::error::{AppError, Result};
use crate::geometry::haversine_distance_km;
use crate::models::waypoint::points_of;
use crate::models::{
    Coordinates, DirectionsResult, RouteNotice, RouteSource, RouteUpdate, TransportMode, Waypoint,
};
use crate::services::directions::{DirectionsProvider, OptimizedRoute};
use crate::services::route_optimizer::{decode_polyline, solve_tsp, Tour};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct DirectionsCoordinator {
    provider: Arc<dyn DirectionsProvider>,
    timeout: Duration,
    mode: TransportMode,
}

impl DirectionsCoordinator {
    pub fn new(provider: Arc<dyn DirectionsProvider>, timeout: Duration) -> Self {
        DirectionsCoordinator {
            provider,
            timeout,
            mode: TransportMode::Walk,
        }
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts a display-route session.
    ///
    /// The returned session already holds a usable route: the final
    /// "not enough points" result for fewer than two waypoints, otherwise the
    /// interim direct path. The optimized route is resolved on a spawned task
    /// and replaces it. Cancelling `cancel` (or dropping the session) discards
    /// whatever the task would have published.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn compute_display_route(
        &self,
        location_id: &str,
        waypoints: Vec<Waypoint>,
        cancel: &CancellationToken,
    ) -> DisplayRouteSession {
        let cancel = cancel.child_token();

        if waypoints.len() < 2 {
            tracing::info!(
                location_id = %location_id,
                waypoints = waypoints.len(),
                "Not enough waypoints to draw a route for location {}",
                location_id
            );
            let (_tx, updates) = watch::channel(RouteUpdate::Final(not_enough_points(waypoints)));
            return DisplayRouteSession {
                updates,
                cancel,
                task: None,
            };
        }

        let (tx, updates) = watch::channel(RouteUpdate::Interim(direct_path(&waypoints)));

        let coordinator = self.clone();
        let location_id = location_id.to_string();
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let Some(result) = coordinator
                .resolve_route(&location_id, waypoints, &task_cancel)
                .await
            else {
                return;
            };
            if task_cancel.is_cancelled() {
                tracing::debug!(location_id = %location_id, "Route resolved after cancellation, discarded");
                return;
            }
            // Fails only when every receiver is gone, nothing to do then.
            let _ = tx.send(RouteUpdate::Final(result));
        });

        DisplayRouteSession {
            updates,
            cancel,
            task: Some(task),
        }
    }

    /// Resolves the final route directly. `None` when cancelled first.
    pub async fn resolve_route(
        &self,
        location_id: &str,
        waypoints: Vec<Waypoint>,
        cancel: &CancellationToken,
    ) -> Option<DirectionsResult> {
        if waypoints.len() < 2 {
            return Some(not_enough_points(waypoints));
        }

        tracing::info!(
            location_id = %location_id,
            waypoints = waypoints.len(),
            provider = self.provider.provider_name(),
            "Resolving route for location {}: {} waypoints",
            location_id, waypoints.len()
        );

        if waypoints.len() - 1 > MAX_DIRECTIONS_WAYPOINTS {
            tracing::warn!(
                location_id = %location_id,
                waypoints = waypoints.len(),
                limit = MAX_DIRECTIONS_WAYPOINTS,
                "Too many waypoints for the directions service, using local solver"
            );
            return Some(fallback_route(&waypoints));
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(location_id = %location_id, "Route request cancelled");
                return None;
            }
            outcome = tokio::time::timeout(self.timeout, self.fetch_external(&waypoints)) => outcome,
        };

        let result = match outcome {
            Ok(Ok(result)) => {
                tracing::info!(
                    location_id = %location_id,
                    distance_km = %format!("{:.2}", result.distance_km()),
                    path_points = result.path_polyline.len(),
                    "External route for location {}: {:.2}km, {} path points",
                    location_id, result.distance_km(), result.path_polyline.len()
                );
                result
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    location_id = %location_id,
                    error = %e,
                    "Directions failed for location {}, falling back to local solver",
                    location_id
                );
                fallback_route(&waypoints)
            }
            Err(_) => {
                tracing::warn!(
                    location_id = %location_id,
                    timeout_secs = self.timeout.as_secs(),
                    "Directions timed out for location {}, falling back to local solver",
                    location_id
                );
                fallback_route(&waypoints)
            }
        };

        Some(result)
    }

    async fn fetch_external(&self, waypoints: &[Waypoint]) -> Result<DirectionsResult> {
        let origin = waypoints[0].point();
        let intermediates = points_of(&waypoints[1..]);

        let route = self
            .provider
            .fetch_optimized_route(&origin, &origin, &intermediates, self.mode)
            .await?;

        external_result(waypoints, route)
    }
}

/// Applies the service's reported order and decodes its path.
///
/// The origin stays first; `waypoint_order` must be a permutation of the
/// intermediate waypoints or the whole response is rejected. Step polylines
/// are concatenated; the overview polyline is used when there are none. With
/// no polyline at all the ordered waypoints are joined directly.
pub fn external_result(waypoints: &[Waypoint], route: OptimizedRoute) -> Result<DirectionsResult> {
    let intermediates = &waypoints[1..];
    let order = Tour::new(route.waypoint_order);
    if !order.is_permutation_of(intermediates.len()) {
        return Err(AppError::DirectionsApi(format!(
            "Invalid waypoint_order {:?} for {} intermediates",
            order.as_slice(),
            intermediates.len()
        )));
    }

    let mut ordered_waypoints = Vec::with_capacity(waypoints.len());
    ordered_waypoints.push(waypoints[0].clone());
    ordered_waypoints.extend(order.apply(intermediates));

    let mut path_polyline: Vec<Coordinates> = route
        .legs
        .iter()
        .flat_map(|leg| leg.step_polylines.iter())
        .flat_map(|encoded| decode_polyline(encoded))
        .collect();
    if path_polyline.is_empty() {
        if let Some(overview) = route.overview_polyline.as_deref() {
            path_polyline = decode_polyline(overview);
        }
    }
    // Consecutive steps share their joining point.
    path_polyline.dedup();
    if path_polyline.is_empty() {
        path_polyline = closed_loop(&ordered_waypoints);
    }

    Ok(DirectionsResult {
        ordered_waypoints,
        path_polyline,
        total_distance_meters: route.legs.iter().map(|leg| leg.distance_meters).sum(),
        total_duration_seconds: route.legs.iter().map(|leg| leg.duration_seconds).sum(),
        source: RouteSource::External,
        notice: None,
    })
}

/// Straight lines between consecutive waypoints, looped back to the start.
pub fn direct_path(waypoints: &[Waypoint]) -> DirectionsResult {
    let path_polyline = closed_loop(waypoints);
    let total_distance_meters = path_length_km(&path_polyline) * 1000.0;

    DirectionsResult {
        ordered_waypoints: waypoints.to_vec(),
        path_polyline,
        total_distance_meters,
        total_duration_seconds: total_distance_meters / WALKING_SPEED_MPS,
        source: RouteSource::FallbackTsp,
        notice: None,
    }
}

/// Local TSP order joined by straight lines, flagged as degraded.
pub fn fallback_route(waypoints: &[Waypoint]) -> DirectionsResult {
    let tour = solve_tsp(&points_of(waypoints));
    let ordered = tour.apply(waypoints);

    DirectionsResult {
        notice: Some(RouteNotice::DirectionsDegraded),
        ..direct_path(&ordered)
    }
}

fn not_enough_points(waypoints: Vec<Waypoint>) -> DirectionsResult {
    DirectionsResult {
        ordered_waypoints: waypoints,
        path_polyline: Vec::new(),
        total_distance_meters: 0.0,
        total_duration_seconds: 0.0,
        source: RouteSource::FallbackTsp,
        notice: Some(RouteNotice::NotEnoughPoints),
    }
}

fn closed_loop(waypoints: &[Waypoint]) -> Vec<Coordinates> {
    if waypoints.len() < 2 {
        return Vec::new();
    }
    let mut path = points_of(waypoints);
    path.push(waypoints[0].point());
    path
}

fn path_length_km(path: &[Coordinates]) -> f64 {
    path.windows(2)
        .map(|w| haversine_distance_km(&w[0], &w[1]))
        .sum()
}

/// Handle on an in-flight display route.
///
/// Dropping the session cancels the pending request.
pub struct DisplayRouteSession {
    updates: watch::Receiver<RouteUpdate>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DisplayRouteSession {
    /// Latest published route (interim or final).
    pub fn current(&self) -> RouteUpdate {
        self.updates.borrow().clone()
    }

    /// Receiver for callers that want to react to the interim -> final switch.
    pub fn subscribe(&self) -> watch::Receiver<RouteUpdate> {
        self.updates.clone()
    }

    /// Waits for the final route. `None` if the session was cancelled first.
    pub async fn wait_final(&mut self) -> Option<DirectionsResult> {
        loop {
            if let RouteUpdate::Final(result) = &*self.updates.borrow_and_update() {
                return Some(result.clone());
            }
            if self.updates.changed().await.is_err() {
                // Sender dropped: either the final value was the last send, or
                // the task gave up after cancellation.
                return match &*self.updates.borrow() {
                    RouteUpdate::Final(result) => Some(result.clone()),
                    RouteUpdate::Interim(_) => None,
                };
            }
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for DisplayRouteSession {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
