use super::{AppState, MAX_IMAGE_SIZE_BYTES, handlers, ui};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_app(state: AppState) -> Router {
    // Configure the router with the API endpoints and the interactive page
    Router::new()
        // Welcome/info endpoints
        .route("/", get(handlers::root))
        .route("/api", get(handlers::api_root))
        // The enhancement API
        .route("/api/enhance/", post(handlers::enhance))
        // Interactive UI: static page plus its upload endpoint
        .route("/ui", get(ui::ui_page))
        .route("/ui/enhance", post(handlers::ui_enhance))
        // Apply a layer to limit the maximum size of request bodies
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE_BYTES))
        // Add CORS layer for broader client compatibility
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        // Provide the shared state
        .with_state(state)
}
