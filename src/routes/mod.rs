/// Application routes configuration
use crate::handlers::{
    get_apod, get_donki_events, get_donki_status, get_epic, get_mars_photos, get_neo, health,
    AppState,
};
use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Imagery
        .route("/apod", get(get_apod))
        .route("/mars/:rover", get(get_mars_photos))
        .route("/epic", get(get_epic))
        // Near-earth objects
        .route("/neo", get(get_neo))
        // Space weather; the static route wins over the capture
        .route("/donki/status", get(get_donki_status))
        .route("/donki/:kind", get(get_donki_events))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
