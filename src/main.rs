use axum::Router;
use std::sync::Arc;
use surveyroute::config::Config;
use surveyroute::services::directions::{
    DirectionsProvider, GoogleDirectionsClient, UnavailableDirections,
};
use surveyroute::services::directions_coordinator::DirectionsCoordinator;
use surveyroute::services::location_service::LocationServiceClient;
use surveyroute::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "surveyroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting SurveyRoute API server");
    tracing::info!("Configuration loaded successfully");

    // Directions provider: without an API key every route uses the local solver
    let provider: Arc<dyn DirectionsProvider> = match config.directions_api_key {
        Some(ref api_key) => {
            tracing::info!(
                base_url = %config.directions_base_url,
                timeout_secs = config.directions_timeout_secs,
                "Directions service configured"
            );
            Arc::new(GoogleDirectionsClient::with_config(
                api_key.clone(),
                config.directions_base_url.clone(),
                config.directions_timeout(),
            )?)
        }
        None => {
            tracing::warn!(
                "DIRECTIONS_API_KEY not set. All routes will be ordered by the local solver."
            );
            Arc::new(UnavailableDirections)
        }
    };

    let waypoint_source = Arc::new(LocationServiceClient::new(
        config.location_service_url.clone(),
        config.location_service_timeout(),
    )?);

    // Create application state
    let state = Arc::new(AppState {
        coordinator: DirectionsCoordinator::new(provider, config.directions_timeout()),
        waypoint_source,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", surveyroute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
