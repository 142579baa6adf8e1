pub mod attachments;
pub mod directions;
pub mod directions_coordinator;
pub mod location_service;
pub mod route_optimizer;
