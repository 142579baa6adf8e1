pub mod coordinates;
pub mod route;
pub mod waypoint;

pub use coordinates::Coordinates;
pub use route::{
    DirectionsResult, DisplayRouteRequest, RouteNotice, RouteSource, RouteUpdate, TransportMode,
};
pub use waypoint::Waypoint;
