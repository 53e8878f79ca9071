use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blackout::evaluator::ActiveBlackout;
use crate::types::blackout_window::{BlackoutWindow, WindowError};
use crate::types::event::ImpactTier;

/// Query string of `GET /us_news_status`.
///
/// Window values stay raw until the token has been checked.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub token: Option<String>,
    pub pre_minutes: Option<String>,
    pub post_minutes: Option<String>,
}

impl StatusQuery {
    /// Request window: the overrides parsed and applied on top of `defaults`.
    pub fn window(&self, defaults: BlackoutWindow) -> Result<BlackoutWindow, WindowError> {
        let pre_minutes = self
            .pre_minutes
            .as_deref()
            .map(|raw| BlackoutWindow::parse_minutes("pre_minutes", raw))
            .transpose()?;
        let post_minutes = self
            .post_minutes
            .as_deref()
            .map(|raw| BlackoutWindow::parse_minutes("post_minutes", raw))
            .transpose()?;

        defaults.with_overrides(pre_minutes, post_minutes)
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub us_news_blackout: bool,

    /// Present only while a blackout is active.
    #[serde(flatten)]
    pub event: Option<BlackoutEvent>,

    pub pre_minutes: i64,
    pub post_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct BlackoutEvent {
    pub event: String,
    pub category: String,
    pub impact: ImpactTier,
    pub currency: String,
    pub event_time_utc: DateTime<Utc>,
    pub minutes_to_clear: i64,
}

impl StatusResponse {
    pub fn clear(window: BlackoutWindow) -> Self {
        Self {
            us_news_blackout: false,
            event: None,
            pre_minutes: window.pre_minutes,
            post_minutes: window.post_minutes,
        }
    }

    pub fn blackout(active: &ActiveBlackout<'_>, window: BlackoutWindow) -> Self {
        let event = active.event;

        Self {
            us_news_blackout: true,
            event: Some(BlackoutEvent {
                event: event.title.clone(),
                category: event.category.clone().unwrap_or_default(),
                impact: event.impact_tier,
                currency: event.currency_or_country.clone(),
                event_time_utc: event.event_time_utc,
                minutes_to_clear: active.minutes_to_clear,
            }),
            pre_minutes: window.pre_minutes,
            post_minutes: window.post_minutes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
