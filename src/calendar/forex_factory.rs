use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::calendar::calendar_error::CalendarError;
use crate::calendar::calendar_source::CalendarSource;
use crate::calendar::http::fetch_text;
use crate::calendar::timestamps::{parse_date_and_time_utc, parse_epoch_seconds};
use crate::types::event::{Event, ImpactTier};

/// Weekly XML calendar in the Forex Factory export format.
#[derive(Debug, Clone)]
pub struct ForexFactorySource {
    http: Client,
    feed_url: String,
}

#[derive(Debug, Deserialize)]
struct FeedRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    impact: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
}

impl FeedRow {
    fn currency(&self) -> Option<&str> {
        non_empty(self.currency.as_deref()).or_else(|| non_empty(self.country.as_deref()))
    }

    /// Epoch seconds when present, otherwise the date and time pair.
    fn event_time_utc(&self) -> Option<DateTime<Utc>> {
        if let Some(epoch) = non_empty(self.timestamp.as_deref()).and_then(parse_epoch_seconds) {
            return Some(epoch);
        }

        let time = non_empty(self.time.as_deref())?;
        if is_unscheduled(time) {
            return None;
        }

        parse_date_and_time_utc(non_empty(self.date.as_deref())?, time)
    }
}

impl ForexFactorySource {
    pub const DEFAULT_FEED_URL: &'static str =
        "https://nfs.faireconomy.media/ff_calendar_thisweek.xml";

    pub fn new(http: Client, feed_url: impl Into<String>) -> Self {
        Self {
            http,
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl CalendarSource for ForexFactorySource {
    fn name(&self) -> &'static str {
        "forex-factory"
    }

    async fn fetch_high_impact_us_events(&self) -> Result<Vec<Event>, CalendarError> {
        let started = Instant::now();
        let body = fetch_text(self.http.get(&self.feed_url)).await?;

        let events = parse_calendar_xml(&body)?;

        info!(
            source = self.name(),
            retained = events.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched calendar"
        );

        Ok(events)
    }
}

/// Parses the weekly XML feed into high impact USD events.
///
/// The document must be well-formed XML rooted at `<weeklyevents>`; anything
/// else fails the fetch. Each `event` element is read on its own, so one odd
/// element is dropped without losing the rest. Elements with other
/// currencies, lower impact, "All Day" or "Tentative" times, or unparseable
/// dates are dropped too.
pub fn parse_calendar_xml(body: &str) -> Result<Vec<Event>, CalendarError> {
    let malformed = |e: quick_xml::Error| CalendarError::payload(format!("invalid calendar XML: {e}"), body);

    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut total = 0usize;
    let mut events = Vec::new();
    let mut in_root = false;

    loop {
        let element_start = reader.buffer_position() as usize;

        match reader.read_event().map_err(malformed)? {
            XmlEvent::Start(start) if !in_root => {
                expect_root(start.local_name().as_ref(), body)?;
                in_root = true;
            }
            XmlEvent::Empty(start) if !in_root => {
                expect_root(start.local_name().as_ref(), body)?;
                break;
            }
            XmlEvent::Start(start) if start.local_name().as_ref() == FEED_EVENT => {
                reader.read_to_end(start.name()).map_err(malformed)?;
                let element = &body[element_start..reader.buffer_position() as usize];

                total += 1;
                if let Some(event) = parse_feed_element(element) {
                    events.push(event);
                }
            }
            XmlEvent::Start(start) => {
                reader.read_to_end(start.name()).map_err(malformed)?;
            }
            XmlEvent::End(_) => break,
            XmlEvent::Eof if in_root => {
                return Err(CalendarError::payload("unterminated <weeklyevents>", body));
            }
            XmlEvent::Eof => {
                return Err(CalendarError::payload("empty calendar document", body));
            }
            _ => {}
        }
    }

    debug!(total, retained = events.len(), "filtered forex factory calendar");

    Ok(events)
}

const FEED_ROOT: &[u8] = b"weeklyevents";
const FEED_EVENT: &[u8] = b"event";

fn expect_root(name: &[u8], body: &str) -> Result<(), CalendarError> {
    if name.eq_ignore_ascii_case(FEED_ROOT) {
        return Ok(());
    }

    Err(CalendarError::payload(
        format!("expected <weeklyevents> root, got <{}>", String::from_utf8_lossy(name)),
        body,
    ))
}

/// One `<event>...</event>` fragment to a high impact USD event, if it is one.
fn parse_feed_element(element: &str) -> Option<Event> {
    let row: FeedRow = match quick_xml::de::from_str(element) {
        Ok(row) => row,
        Err(error) => {
            debug!(%error, "dropping malformed feed event");
            return None;
        }
    };

    let is_usd = row
        .currency()
        .is_some_and(|currency| currency.eq_ignore_ascii_case(Event::US_CURRENCY));
    let is_high = row
        .impact
        .as_deref()
        .is_some_and(|impact| ImpactTier::from_label(impact) == ImpactTier::High);

    if !is_usd || !is_high {
        return None;
    }

    let Some(event_time_utc) = row.event_time_utc() else {
        debug!(title = ?row.title, date = ?row.date, time = ?row.time, "dropping feed event without a usable time");
        return None;
    };

    Some(Event::high_impact_us(
        row.title.map(|title| title.trim().to_string()).unwrap_or_default(),
        None,
        event_time_utc,
    ))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_unscheduled(time: &str) -> bool {
    time.eq_ignore_ascii_case("all day") || time.eq_ignore_ascii_case("tentative")
}
