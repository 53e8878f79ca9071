use chrono::{DateTime, Duration, Utc};

use crate::types::blackout_window::BlackoutWindow;
use crate::types::event::Event;

/// The event governing an active blackout, with the time left until it clears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBlackout<'a> {
    pub event: &'a Event,
    pub minutes_to_clear: i64,
}

/// `event_time - pre <= now <= event_time + post`, inclusive at both ends.
pub fn is_in_blackout(
    now: DateTime<Utc>,
    event_time: DateTime<Utc>,
    pre_minutes: i64,
    post_minutes: i64,
) -> bool {
    let start = event_time - Duration::minutes(pre_minutes);
    let end = event_time + Duration::minutes(post_minutes);

    start <= now && now <= end
}

/// Whole minutes until `event_time + post` has passed, floored and never negative.
pub fn minutes_to_clear(now: DateTime<Utc>, event_time: DateTime<Utc>, post_minutes: i64) -> i64 {
    let end = event_time + Duration::minutes(post_minutes);
    let remaining_seconds = (end - now).num_seconds();

    if remaining_seconds <= 0 {
        return 0;
    }

    remaining_seconds / 60
}

/// Returns the first event, in feed order, whose window contains `now`.
///
/// Overlapping windows are not ranked by proximity: the earliest entry in
/// `events` wins even if a later one is nearer in time.
pub fn first_active<'a>(
    events: &'a [Event],
    now: DateTime<Utc>,
    window: BlackoutWindow,
) -> Option<ActiveBlackout<'a>> {
    events
        .iter()
        .find(|event| {
            is_in_blackout(
                now,
                event.event_time_utc,
                window.pre_minutes,
                window.post_minutes,
            )
        })
        .map(|event| ActiveBlackout {
            event,
            minutes_to_clear: minutes_to_clear(now, event.event_time_utc, window.post_minutes),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn release_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 2, 12, 30, 0).unwrap()
    }

    fn event(title: &str, at: DateTime<Utc>) -> Event {
        Event::high_impact_us(title, None, at)
    }

    #[test]
    fn five_minutes_before_release_is_blacked_out() {
        let t = release_time();
        let now = t - Duration::minutes(5);

        assert!(is_in_blackout(now, t, 10, 30));
        assert_eq!(minutes_to_clear(now, t, 30), 35);
    }

    #[test]
    fn window_is_closed_after_post_minutes() {
        let t = release_time();
        let now = t + Duration::minutes(35);

        assert!(!is_in_blackout(now, t, 10, 30));
        assert_eq!(minutes_to_clear(now, t, 30), 0);
    }

    #[test]
    fn both_boundaries_count_as_blackout() {
        let t = release_time();

        assert!(is_in_blackout(t - Duration::minutes(10), t, 10, 30));
        assert!(is_in_blackout(t + Duration::minutes(30), t, 10, 30));

        assert!(!is_in_blackout(t - Duration::minutes(10) - Duration::seconds(1), t, 10, 30));
        assert!(!is_in_blackout(t + Duration::minutes(30) + Duration::seconds(1), t, 10, 30));
    }

    #[test]
    fn zero_width_window_only_matches_exact_instant() {
        let t = release_time();

        assert!(is_in_blackout(t, t, 0, 0));
        assert!(!is_in_blackout(t + Duration::milliseconds(1), t, 0, 0));
    }

    #[test]
    fn minutes_to_clear_floors_partial_minutes() {
        let t = release_time();
        let now = t + Duration::minutes(10) + Duration::seconds(30);

        assert_eq!(minutes_to_clear(now, t, 30), 19);
    }

    #[test]
    fn minutes_to_clear_is_zero_exactly_at_and_after_end() {
        let t = release_time();
        let end = t + Duration::minutes(30);

        assert_eq!(minutes_to_clear(end, t, 30), 0);
        assert_eq!(minutes_to_clear(end + Duration::hours(6), t, 30), 0);
        assert_eq!(minutes_to_clear(end - Duration::seconds(60), t, 30), 1);
        assert_eq!(minutes_to_clear(end - Duration::seconds(59), t, 30), 0);
    }

    #[test]
    fn minutes_to_clear_decreases_with_wall_clock() {
        let t = release_time();
        let mut previous = i64::MAX;

        for offset in (-10..=30).step_by(5) {
            let now = t + Duration::minutes(offset);
            let remaining = minutes_to_clear(now, t, 30);

            assert!(remaining >= 0);
            assert!(remaining <= previous);
            previous = remaining;
        }
    }

    #[test]
    fn first_found_wins_over_nearest() {
        let t = release_time();
        let now = t;
        // B is further from `now` but comes first in feed order.
        let events = vec![
            event("B", t - Duration::minutes(20)),
            event("A", t + Duration::minutes(1)),
        ];

        let active = first_active(&events, now, BlackoutWindow::default()).unwrap();

        assert_eq!(active.event.title, "B");
        assert_eq!(active.minutes_to_clear, 10);
    }

    #[test]
    fn no_match_when_all_events_are_outside_their_windows() {
        let t = release_time();
        let events = vec![
            event("Yesterday", t - Duration::days(1)),
            event("Tomorrow", t + Duration::days(1)),
        ];

        assert!(first_active(&events, t, BlackoutWindow::default()).is_none());
        assert!(first_active(&[], t, BlackoutWindow::default()).is_none());
    }
}
