use async_trait::async_trait;

use crate::calendar::calendar_error::CalendarError;
use crate::types::event::Event;

#[async_trait]
pub trait CalendarSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches the upstream calendar and returns only high impact USD events,
    /// in upstream order.
    async fn fetch_high_impact_us_events(&self) -> Result<Vec<Event>, CalendarError>;
}
