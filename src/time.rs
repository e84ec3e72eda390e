use chrono::{DateTime, SecondsFormat, Utc};

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current instant as an ISO-8601 UTC string with millisecond precision,
/// e.g. `2024-03-01T09:30:00.125Z`.
pub fn iso_now() -> String {
    to_iso(Utc::now())
}

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Relative phrasing of `then` as seen from `now` ("3 days ago", "in an hour").
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let phrase = humanize(delta.unsigned_abs());
    if delta < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn humanize(seconds: u64) -> String {
    let secs = seconds as f64;
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3_600.0).round();
    let days = (secs / 86_400.0).round();

    if seconds < 45 {
        "a few seconds".into()
    } else if seconds < 90 {
        "a minute".into()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if minutes < 90.0 {
        "an hour".into()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if hours < 36.0 {
        "a day".into()
    } else if days < 26.0 {
        format!("{days} days")
    } else if days < 45.0 {
        "a month".into()
    } else if days < 320.0 {
        let months = (days / 30.4).round().max(2.0);
        format!("{months} months")
    } else if days < 548.0 {
        "a year".into()
    } else {
        let years = (days / 365.0).round().max(2.0);
        format!("{years} years")
    }
}
