use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Coarse severity classification shared by every calendar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactTier {
    High,
    Medium,
    Low,
}

impl ImpactTier {
    /// Trading Economics grades importance 1..=3, where 3 is market-moving.
    pub fn from_importance(importance: i64) -> Self {
        match importance {
            i if i >= 3 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Feed labels such as "High", "Medium", "Low", "Holiday" (case-insensitive).
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("high") {
            Self::High
        } else if label.eq_ignore_ascii_case("medium") {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// A normalized, already-filtered calendar entry.
///
/// Only high impact US events are ever constructed by the calendar sources,
/// and `event_time_utc` is always a resolved instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub title: String,
    pub category: Option<String>,
    pub impact_tier: ImpactTier,
    pub currency_or_country: String,
    pub event_time_utc: DateTime<Utc>,
}

impl Event {
    pub const US_CURRENCY: &'static str = "USD";

    pub fn high_impact_us(
        title: impl Into<String>,
        category: Option<String>,
        event_time_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            impact_tier: ImpactTier::High,
            currency_or_country: Self::US_CURRENCY.to_string(),
            event_time_utc,
        }
    }

    pub fn is_high_impact_us(&self) -> bool {
        self.impact_tier == ImpactTier::High
            && self.currency_or_country.eq_ignore_ascii_case(Self::US_CURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn importance_threshold_is_three() {
        assert_eq!(ImpactTier::from_importance(3), ImpactTier::High);
        assert_eq!(ImpactTier::from_importance(4), ImpactTier::High);
        assert_eq!(ImpactTier::from_importance(2), ImpactTier::Medium);
        assert_eq!(ImpactTier::from_importance(1), ImpactTier::Low);
        assert_eq!(ImpactTier::from_importance(0), ImpactTier::Low);
        assert_eq!(ImpactTier::from_importance(-7), ImpactTier::Low);
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(ImpactTier::from_label("HIGH"), ImpactTier::High);
        assert_eq!(ImpactTier::from_label(" high "), ImpactTier::High);
        assert_eq!(ImpactTier::from_label("Medium"), ImpactTier::Medium);
        assert_eq!(ImpactTier::from_label("Holiday"), ImpactTier::Low);
        assert_eq!(ImpactTier::from_label(""), ImpactTier::Low);
    }

    #[test]
    fn high_impact_us_constructor_satisfies_filter() {
        let at = Utc.with_ymd_and_hms(2026, 3, 6, 13, 30, 0).unwrap();
        let event = Event::high_impact_us("Non-Farm Payrolls", None, at);

        assert!(event.is_high_impact_us());
        assert_eq!(event.currency_or_country, "USD");
        assert_eq!(event.impact_tier.to_string(), "High");
    }
}
