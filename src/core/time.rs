//! Timestamp and date normalization shared by the response decoders.
//!
//! Every instant is surfaced as a [`NaiveDateTime`] wall clock:
//! - ISO-8601 strings have a trailing `Z` stripped and are parsed as naive.
//! - Epoch numbers are converted to their UTC wall clock.
//!
//! So `"2023-07-22T04:26:40Z"` and `1690000000` decode to the same value.

use crate::utils::error::{Result, RsWikiError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochUnit {
    Seconds,
    Millis,
}

const ISO_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const LONG_DATE_FORMAT: &str = "%d %B %Y";

const PORTUGUESE_MONTHS: &[(&str, &str)] = &[
    ("janeiro", "January"),
    ("fevereiro", "February"),
    ("março", "March"),
    ("marco", "March"),
    ("abril", "April"),
    ("maio", "May"),
    ("junho", "June"),
    ("julho", "July"),
    ("agosto", "August"),
    ("setembro", "September"),
    ("outubro", "October"),
    ("novembro", "November"),
    ("dezembro", "December"),
];

static PORTUGUESE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d{1,2})\s+de\s+(\p{L}+)\s+de\s+(\d{4})\s*$")
        .expect("portuguese date pattern is valid")
});

pub fn parse_iso_naive(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    for format in ISO_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(stripped, format) {
            return Ok(parsed);
        }
    }

    // Explicit offsets keep their wall clock, the offset itself is dropped.
    if let Ok(parsed) = DateTime::parse_from_rfc3339(stripped) {
        return Ok(parsed.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(stripped, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(RsWikiError::decode(format!(
        "invalid ISO-8601 timestamp '{}'",
        raw
    )))
}

pub fn from_epoch(value: i64, unit: EpochUnit) -> Result<NaiveDateTime> {
    let converted = match unit {
        EpochUnit::Seconds => DateTime::from_timestamp(value, 0),
        EpochUnit::Millis => DateTime::from_timestamp_millis(value),
    };

    converted
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| RsWikiError::decode(format!("epoch value {} is out of range", value)))
}

/// Decodes a timestamp field that may be an ISO string or an epoch number.
pub fn timestamp_from_value(value: &Value, unit: EpochUnit) -> Result<NaiveDateTime> {
    match value {
        Value::String(s) => parse_iso_naive(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                from_epoch(i, unit)
            } else if let Some(f) = n.as_f64() {
                let millis = match unit {
                    EpochUnit::Seconds => f * 1000.0,
                    EpochUnit::Millis => f,
                };
                from_epoch(millis.trunc() as i64, EpochUnit::Millis)
            } else {
                Err(RsWikiError::decode(format!("unsupported timestamp {}", n)))
            }
        }
        other => Err(RsWikiError::decode(format!(
            "expected a timestamp, found {}",
            other
        ))),
    }
}

/// Same as [`timestamp_from_value`], with `null` and absent mapping to `None`.
pub fn optional_timestamp(value: Option<&Value>, unit: EpochUnit) -> Result<Option<NaiveDateTime>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => timestamp_from_value(v, unit).map(Some),
    }
}

/// Parses a "day Month year" date. English month names are tried first, then
/// the Portuguese "5 de julho de 2023" form.
pub fn parse_localized_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, LONG_DATE_FORMAT) {
        return Ok(date);
    }

    tracing::trace!(date = trimmed, "english date parse failed, trying portuguese");
    let english = translate_portuguese_date(trimmed)
        .ok_or_else(|| RsWikiError::decode(format!("unrecognized date '{}'", raw)))?;

    NaiveDate::parse_from_str(&english, LONG_DATE_FORMAT)
        .map_err(|e| RsWikiError::decode(format!("unrecognized date '{}': {}", raw, e)))
}

fn translate_portuguese_date(raw: &str) -> Option<String> {
    let captures = PORTUGUESE_DATE.captures(raw)?;
    let month = captures[2].to_lowercase();
    let (_, english) = PORTUGUESE_MONTHS.iter().find(|(pt, _)| *pt == month)?;
    Some(format!("{} {} {}", &captures[1], english, &captures[3]))
}
