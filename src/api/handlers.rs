use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::dto::{HealthResponse, StatusQuery, StatusResponse};
use super::error::ApiError;
use super::state::AppState;
use crate::blackout::evaluator::first_active;

/// GET /health - Liveness, no auth
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// GET /us_news_status - Is a high impact USD release inside its blackout window?
pub async fn us_news_status(
    State(state): State<Arc<AppState>>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Query(query) = query?;

    if let Err(error) = state.authorize(query.token.as_deref()) {
        warn!(token_present = query.token.is_some(), "rejected status request");
        return Err(error);
    }

    let window = query.window(state.default_window)?;

    let events = state.cache.get_or_fetch().await?;
    let now = Utc::now();

    let response = match first_active(&events, now, window) {
        Some(active) => {
            info!(
                event = %active.event.title,
                impact = %active.event.impact_tier,
                event_time_utc = %active.event.event_time_utc,
                minutes_to_clear = active.minutes_to_clear,
                "news blackout active"
            );
            StatusResponse::blackout(&active, window)
        }
        None => {
            debug!(candidates = events.len(), ?window, "no news blackout");
            StatusResponse::clear(window)
        }
    };

    Ok(Json(response))
}
