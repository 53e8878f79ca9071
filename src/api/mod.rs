mod dto;
mod error;
mod handlers;
mod state;


pub use state::AppState;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/us_news_status", get(handlers::us_news_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
