//! Recognizes the WCF-style JSON dates WSDOT emits, e.g. `/Date(1430006400000-0700)/`.
//!
//! The number is milliseconds since the Unix epoch (UTC). The optional `±HHMM` suffix is
//! the zone the value was recorded in; it changes the offset of the result, not the instant.

use crate::domain::model::FlatValue;
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub enum DateMatch {
    Matched(DateTime<FixedOffset>),
    NotMatched,
}

impl DateMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, DateMatch::Matched(_))
    }
}

fn wsdot_date_re() -> &'static Regex {
    static WSDOT_DATE_RE: OnceLock<Regex> = OnceLock::new();
    WSDOT_DATE_RE.get_or_init(|| {
        Regex::new(r"^/Date\((-?[0-9]+)(?:([+-])([0-9]{2})([0-9]{2}))?\)/$")
            .expect("valid wsdot date regex")
    })
}

pub fn detect_date(s: &str) -> DateMatch {
    let Some(caps) = wsdot_date_re().captures(s) else {
        return DateMatch::NotMatched;
    };

    let Ok(millis) = caps[1].parse::<i64>() else {
        return DateMatch::NotMatched;
    };
    let Some(instant) = DateTime::from_timestamp_millis(millis) else {
        return DateMatch::NotMatched;
    };

    let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
        (Some(sign), Some(hours), Some(minutes)) => {
            match parse_offset(sign.as_str(), hours.as_str(), minutes.as_str()) {
                Some(offset) => offset,
                None => return DateMatch::NotMatched,
            }
        }
        _ => FixedOffset::east_opt(0).expect("zero offset is in range"),
    };

    // The local wall-clock time must also be representable, or rendering panics.
    if instant.naive_utc().checked_add_offset(offset).is_none() {
        return DateMatch::NotMatched;
    }

    DateMatch::Matched(instant.with_timezone(&offset))
}

fn parse_offset(sign: &str, hours: &str, minutes: &str) -> Option<FixedOffset> {
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let seconds = (hours * 60 + minutes) * 60;
    match sign {
        "-" => FixedOffset::west_opt(seconds),
        _ => FixedOffset::east_opt(seconds),
    }
}

/// Parses `s` into a date when it matches, otherwise keeps the original text.
pub fn normalize_string(s: &str) -> FlatValue {
    match detect_date(s) {
        DateMatch::Matched(dt) => FlatValue::DateTime(dt),
        DateMatch::NotMatched => FlatValue::String(s.to_string()),
    }
}
