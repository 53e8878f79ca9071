use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%m-%d-%Y", "%Y-%m-%d", "%m/%d/%Y"];

const TIME_FORMATS: &[&str] = &["%I:%M%p", "%I:%M %p", "%I%p", "%H:%M:%S", "%H:%M"];

/// ISO-8601 with an explicit offset is converted to UTC; without one it is
/// taken to already be UTC.
pub fn parse_iso_utc(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Utc));
    }

    let naive = raw.trim_end_matches(['Z', 'z']);
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|parsed| parsed.and_utc())
}

/// Unix seconds, tolerating a fractional part.
pub fn parse_epoch_seconds(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(seconds) = raw.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0);
    }

    let seconds = raw.parse::<f64>().ok().filter(|s| s.is_finite())?;
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}

/// Separate calendar date and clock time, both taken as UTC.
pub fn parse_date_and_time_utc(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = date.trim();
    let time = time.trim();

    let day = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())?;
    let clock = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time, format).ok())?;

    Some(day.and_time(clock).and_utc())
}
