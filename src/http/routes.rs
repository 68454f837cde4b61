use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Service info + health
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Session context upload (resume / job description text)
        .route("/api/context", post(handlers::upload_context))
        // The coaching channel
        .route("/ws/audio", get(handlers::ws_audio))
        // Request logging + CORS for the browser client
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
