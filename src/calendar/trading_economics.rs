use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::calendar::calendar_error::CalendarError;
use crate::calendar::calendar_source::CalendarSource;
use crate::calendar::http::fetch_text;
use crate::calendar::timestamps::parse_iso_utc;
use crate::types::event::{Event, ImpactTier};

/// Trading Economics REST calendar for the United States.
#[derive(Debug, Clone)]
pub struct TradingEconomicsSource {
    http: Client,
    url: String,
    api_key: Option<String>,
}

/// One row of `/calendar/country/{country}`. Only the fields the bridge reads.
///
/// `Event` and `Category` are read as raw values so that a number where a
/// string belongs does not cost the whole row.
#[derive(Debug, Deserialize)]
struct CalendarRow {
    #[serde(rename = "Event", default)]
    event: Option<Value>,

    #[serde(rename = "Category", default)]
    category: Option<Value>,

    /// Usually an integer, but coerced leniently.
    #[serde(rename = "Importance", default)]
    importance: Option<Value>,

    #[serde(rename = "Date", default)]
    date: Option<String>,
}

impl TradingEconomicsSource {
    pub const DEFAULT_URL: &'static str =
        "https://api.tradingeconomics.com/calendar/country/united%20states";

    pub fn new(http: Client, url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }
}

#[async_trait]
impl CalendarSource for TradingEconomicsSource {
    fn name(&self) -> &'static str {
        "trading-economics"
    }

    async fn fetch_high_impact_us_events(&self) -> Result<Vec<Event>, CalendarError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CalendarError::MissingCredential("TE_API_KEY"))?;

        let started = Instant::now();
        let request = self
            .http
            .get(&self.url)
            .query(&[("c", api_key), ("f", "json")]);
        let body = fetch_text(request).await?;

        let events = parse_calendar_json(&body)?;

        info!(
            source = self.name(),
            retained = events.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched calendar"
        );

        Ok(events)
    }
}

/// Parses a Trading Economics calendar body into high impact USD events.
///
/// The body must be a JSON array; anything else fails the fetch. Rows that
/// are malformed, below importance 3, or carry an unusable `Date` are dropped.
pub fn parse_calendar_json(body: &str) -> Result<Vec<Event>, CalendarError> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| CalendarError::payload(format!("invalid JSON: {e}"), body))?;

    let Value::Array(rows) = document else {
        return Err(CalendarError::payload("expected a JSON array", body));
    };

    let total = rows.len();
    let mut events = Vec::new();

    for row in rows {
        let row: CalendarRow = match serde_json::from_value(row) {
            Ok(row) => row,
            Err(error) => {
                debug!(%error, "dropping malformed calendar row");
                continue;
            }
        };

        if ImpactTier::from_importance(coerce_importance(row.importance.as_ref()))
            != ImpactTier::High
        {
            continue;
        }

        let Some(event_time_utc) = row.date.as_deref().and_then(parse_iso_utc) else {
            debug!(event = ?row.event, date = ?row.date, "dropping calendar row with unparseable date");
            continue;
        };

        events.push(Event::high_impact_us(
            coerce_text(row.event).unwrap_or_default(),
            coerce_text(row.category).filter(|category| !category.is_empty()),
            event_time_utc,
        ));
    }

    debug!(total, retained = events.len(), "filtered trading economics calendar");

    Ok(events)
}

/// Integer importance; unusable values count as 0.
fn coerce_importance(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
        Some(Value::Bool(flag)) => i64::from(*flag),
        _ => 0,
    }
}

/// Text field; scalars are stringified, `null` is absent.
fn coerce_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
