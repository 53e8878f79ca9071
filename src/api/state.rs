use std::sync::Arc;

use crate::api::error::ApiError;
use crate::cache::calendar_cache::CalendarCache;
use crate::types::blackout_window::BlackoutWindow;

/// Shared state for all handlers
pub struct AppState {
    bridge_token: Option<String>,
    pub default_window: BlackoutWindow,
    pub cache: CalendarCache,
}

impl AppState {
    pub fn new(
        bridge_token: Option<String>,
        default_window: BlackoutWindow,
        cache: CalendarCache,
    ) -> Arc<Self> {
        Arc::new(Self {
            bridge_token,
            default_window,
            cache,
        })
    }

    /// Exact match against the configured secret. No secret means nobody is allowed in.
    pub fn authorize(&self, token: Option<&str>) -> Result<(), ApiError> {
        match (self.bridge_token.as_deref(), token) {
            (Some(expected), Some(given)) if expected == given => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}
