// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::directions_coordinator::DirectionsCoordinator;
use services::location_service::WaypointSource;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub coordinator: DirectionsCoordinator,
    pub waypoint_source: Arc<dyn WaypointSource>,
}
