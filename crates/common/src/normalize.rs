//! Total coercions from untrusted record fields to display strings.
//!
//! Every function here accepts whatever the backend sent (absent, `null`, the
//! wrong JSON type, a numeric string, a non-finite value) and returns a value
//! that is safe to put on screen. None of them fail.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde_json::Value;

pub const TIME_PLACEHOLDER: &str = "--:--:--";
pub const PRICE_PLACEHOLDER: &str = "0.00000";
pub const LOT_SIZE_PLACEHOLDER: &str = "0.00";
pub const TEXT_PLACEHOLDER: &str = "N/A";

const PRICE_DIGITS: usize = 5;
const LOT_SIZE_DIGITS: usize = 2;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    TimeOnly,
    DateTime,
}

impl TimeFormat {
    fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::TimeOnly => "%H:%M:%S",
            TimeFormat::DateTime => "%Y-%m-%d %H:%M:%S",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" | "time_only" => Ok(TimeFormat::TimeOnly),
            "datetime" | "date_time" => Ok(TimeFormat::DateTime),
            other => Err(format!("Unknown time format: {}", other)),
        }
    }
}

/// How instants are shown: which fields, and in which UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct TimeDisplay {
    pub format: TimeFormat,
    pub offset: FixedOffset,
}

impl TimeDisplay {
    pub fn new(format: TimeFormat, offset: FixedOffset) -> Self {
        Self { format, offset }
    }
}

impl Default for TimeDisplay {
    fn default() -> Self {
        Self {
            format: TimeFormat::default(),
            offset: Utc.fix(),
        }
    }
}

/// Reads an instant out of a raw field. Accepts RFC 3339, naive date-times
/// (taken as UTC), bare dates, and integer epoch milliseconds.
pub fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn normalize_timestamp(value: Option<&Value>, display: &TimeDisplay) -> String {
    match parse_timestamp(value) {
        Some(instant) => instant
            .with_timezone(&display.offset)
            .format(display.format.pattern())
            .to_string(),
        None => TIME_PLACEHOLDER.to_string(),
    }
}

/// Numeric value of a raw field, or `None` when absent, non-numeric or
/// non-finite. Numeric strings count as numbers.
pub fn coerce_decimal(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Fixed-point rendering with `digits` fractional digits. Non-finite input
/// yields `placeholder`; a result that rounds to zero is never signed.
pub fn format_fixed(value: f64, digits: usize, placeholder: &str) -> String {
    if !value.is_finite() {
        return placeholder.to_string();
    }
    let formatted = format!("{:.*}", digits, value);
    match formatted.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => formatted,
    }
}

pub fn normalize_price(value: Option<&Value>) -> String {
    coerce_decimal(value)
        .map(|v| format_fixed(v, PRICE_DIGITS, PRICE_PLACEHOLDER))
        .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string())
}

pub fn normalize_lot_size(value: Option<&Value>) -> String {
    coerce_decimal(value)
        .map(|v| format_fixed(v, LOT_SIZE_DIGITS, LOT_SIZE_PLACEHOLDER))
        .unwrap_or_else(|| LOT_SIZE_PLACEHOLDER.to_string())
}

/// Trimmed text of a scalar field, case preserved. Arrays, objects, absent
/// and blank values become `"N/A"`.
pub fn normalize_enum_text(value: Option<&Value>) -> String {
    field_text(value).unwrap_or_else(|| TEXT_PLACEHOLDER.to_string())
}

/// Trimmed, non-empty text of a scalar field.
pub fn field_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}
