//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm bounds, and default
//! fallbacks for env-var-based configuration. They should rarely change.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- External collaborators ---

/// Google Directions JSON endpoint. Overridden by `DIRECTIONS_BASE_URL`.
pub const DEFAULT_DIRECTIONS_BASE_URL: &str =
    "https://maps.googleapis.com/maps/api/directions/json";
/// Default bound on a single directions request. Overridden by `DIRECTIONS_TIMEOUT_SECS`.
pub const DEFAULT_DIRECTIONS_TIMEOUT_SECS: u64 = 20;
/// Accepted range for `DIRECTIONS_TIMEOUT_SECS`.
pub const MIN_DIRECTIONS_TIMEOUT_SECS: u64 = 1;
pub const MAX_DIRECTIONS_TIMEOUT_SECS: u64 = 120;

/// Base URL of the location service. Overridden by `LOCATION_SERVICE_URL`.
pub const DEFAULT_LOCATION_SERVICE_URL: &str = "http://localhost:8080";
/// Overridden by `LOCATION_SERVICE_TIMEOUT_SECS`.
pub const DEFAULT_LOCATION_SERVICE_TIMEOUT_SECS: u64 = 10;

// --- Geometry ---

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// A geofence needs at least a triangle.
pub const MIN_POLYGON_VERTICES: usize = 3;

// --- Route optimization ---

/// Hard cap on 2-opt pair scans. Guarantees termination even if floating
/// point noise would otherwise keep producing "improvements".
pub const MAX_TWO_OPT_ITERATIONS: usize = 100;
/// A 2-opt swap must shorten the tour by more than this (km) to count.
pub const TWO_OPT_EPSILON_KM: f64 = 1e-10;
/// Directions services reject larger waypoint lists; beyond this we go
/// straight to the local solver.
pub const MAX_DIRECTIONS_WAYPOINTS: usize = 25;

/// Walking speed used to estimate durations when no directions data exists.
pub const WALKING_SPEED_MPS: f64 = 1.4;

// --- Encoded polyline format ---

/// Printable offset added to every 5-bit chunk.
pub const POLYLINE_CHAR_OFFSET: u8 = 63;
/// Continuation flag on a chunk.
pub const POLYLINE_CONTINUATION_BIT: i64 = 0x20;
/// Payload mask of a chunk.
pub const POLYLINE_CHUNK_MASK: i64 = 0x1f;
/// Coordinates are stored as integers of 1e-5 degrees.
pub const POLYLINE_PRECISION: f64 = 1e5;
