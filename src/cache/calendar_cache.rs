use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::calendar::calendar_error::CalendarError;
use crate::calendar::sources::DynamicCalendarSource;
use crate::types::event::Event;

pub type EventList = Arc<Vec<Event>>;

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    events: EventList,
}

/// Single-entry TTL cache in front of the configured calendar source.
///
/// The lock is only held to read or swap the entry, never across the upstream
/// call. Two requests that miss at the same time both fetch and the later
/// write wins. A failed fetch leaves the previous entry in place but it is
/// never served once expired.
pub struct CalendarCache {
    source: DynamicCalendarSource,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl CalendarCache {
    pub fn new(source: DynamicCalendarSource, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entry: RwLock::new(None),
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn get_or_fetch(&self) -> Result<EventList, CalendarError> {
        self.get_or_fetch_at(Utc::now()).await
    }

    pub async fn get_or_fetch_at(&self, now: DateTime<Utc>) -> Result<EventList, CalendarError> {
        if let Some(events) = self.fresh(now).await {
            debug!(source = self.source_name(), count = events.len(), "calendar cache hit");
            return Ok(events);
        }

        debug!(source = self.source_name(), "calendar cache miss");

        let events: EventList = match self.source.fetch_high_impact_us_events().await {
            Ok(events) => {
                debug_assert!(events.iter().all(Event::is_high_impact_us));
                Arc::new(events)
            }
            Err(error) => {
                warn!(source = self.source_name(), %error, "calendar fetch failed");
                return Err(error);
            }
        };

        *self.entry.write().await = Some(CacheEntry {
            fetched_at: now,
            events: Arc::clone(&events),
        });

        Ok(events)
    }

    async fn fresh(&self, now: DateTime<Utc>) -> Option<EventList> {
        let guard = self.entry.read().await;
        let entry = guard.as_ref()?;

        let age = (now - entry.fetched_at).to_std().unwrap_or_default();
        if age < self.ttl {
            return Some(Arc::clone(&entry.events));
        }

        None
    }
}
