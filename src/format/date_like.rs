//! Normalization of heterogeneous date representations to a single instant.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Epoch numbers below this (2000-01-01T00:00:00Z in milliseconds) are read
/// as seconds, everything else as milliseconds.
///
/// Known sharp edge: a genuine millisecond value before 2000 is misread as
/// seconds. Callers rely on this cutoff, so it is kept as is.
pub const EPOCH_SECONDS_CUTOFF_MS: f64 = 946_684_800_000.0;

/// Largest representable time value (±100,000,000 days), as for JS dates.
const MAX_EPOCH_MS: f64 = 8.64e15;

/// Any value that knows how to turn itself into an instant.
pub trait ToInstant: Send + Sync {
    fn to_instant(&self) -> Option<DateTime<Utc>>;
}

/// Document-store timestamp: `{seconds, nanoseconds}` (also accepts the
/// `_seconds`/`_nanoseconds` spelling used by serialized admin SDK values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirestoreTimestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl ToInstant for FirestoreTimestamp {
    fn to_instant(&self) -> Option<DateTime<Utc>> {
        seconds_to_instant(self.seconds, self.nanoseconds)
    }
}

/// A date in one of the shapes the view layer hands us.
#[derive(Clone, Default)]
pub enum DateLike {
    /// Null / undefined.
    #[default]
    Missing,
    /// Already an instant.
    Instant(DateTime<Utc>),
    /// Epoch number, seconds or milliseconds (see [`EPOCH_SECONDS_CUTOFF_MS`]).
    Epoch(f64),
    /// Calendar/time text.
    Text(String),
    /// Object carrying seconds since the epoch.
    Seconds { seconds: i64, nanoseconds: u32 },
    /// Object exposing its own conversion.
    Converter(Arc<dyn ToInstant>),
}

impl DateLike {
    /// Normalize to an instant. `None` for missing or unparsable input.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            DateLike::Missing => None,
            DateLike::Instant(instant) => Some(*instant),
            DateLike::Epoch(value) => epoch_to_instant(*value),
            DateLike::Text(text) => parse_text(text),
            DateLike::Seconds {
                seconds,
                nanoseconds,
            } => seconds_to_instant(*seconds, *nanoseconds),
            DateLike::Converter(converter) => converter.to_instant(),
        }
    }

    /// Classify a loosely typed document value.
    ///
    /// Numbers, strings and `{seconds}`/`{_seconds}` objects are recognized;
    /// anything else is `Missing`.
    pub fn from_json(value: &serde_json::Value) -> DateLike {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(DateLike::Epoch).unwrap_or_default(),
            serde_json::Value::String(s) => DateLike::Text(s.clone()),
            serde_json::Value::Object(_) => {
                serde_json::from_value::<FirestoreTimestamp>(value.clone())
                    .map(DateLike::from)
                    .unwrap_or_default()
            }
            _ => DateLike::Missing,
        }
    }
}

/// Normalize any accepted representation to an instant.
pub fn to_date(value: impl Into<DateLike>) -> Option<DateTime<Utc>> {
    value.into().to_instant()
}

fn epoch_to_instant(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value < EPOCH_SECONDS_CUTOFF_MS {
        value * 1000.0
    } else {
        value
    };
    if millis.abs() > MAX_EPOCH_MS {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

fn seconds_to_instant(seconds: i64, nanoseconds: u32) -> Option<DateTime<Utc>> {
    let millis = seconds
        .checked_mul(1000)?
        .checked_add(i64::from(nanoseconds / 1_000_000))?;
    DateTime::from_timestamp_millis(millis)
}

const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse calendar text. Offset-less values are taken as UTC.
fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl fmt::Debug for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateLike::Missing => f.write_str("Missing"),
            DateLike::Instant(i) => f.debug_tuple("Instant").field(i).finish(),
            DateLike::Epoch(n) => f.debug_tuple("Epoch").field(n).finish(),
            DateLike::Text(s) => f.debug_tuple("Text").field(s).finish(),
            DateLike::Seconds {
                seconds,
                nanoseconds,
            } => f
                .debug_struct("Seconds")
                .field("seconds", seconds)
                .field("nanoseconds", nanoseconds)
                .finish(),
            DateLike::Converter(_) => f.write_str("Converter(..)"),
        }
    }
}

// --- CONVERSIONS ---

impl From<DateTime<Utc>> for DateLike {
    fn from(instant: DateTime<Utc>) -> Self {
        DateLike::Instant(instant)
    }
}

impl From<DateTime<FixedOffset>> for DateLike {
    fn from(instant: DateTime<FixedOffset>) -> Self {
        DateLike::Instant(instant.with_timezone(&Utc))
    }
}

impl From<f64> for DateLike {
    fn from(value: f64) -> Self {
        DateLike::Epoch(value)
    }
}

impl From<i64> for DateLike {
    fn from(value: i64) -> Self {
        DateLike::Epoch(value as f64)
    }
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        DateLike::Text(text.to_string())
    }
}

impl From<String> for DateLike {
    fn from(text: String) -> Self {
        DateLike::Text(text)
    }
}

impl From<FirestoreTimestamp> for DateLike {
    fn from(ts: FirestoreTimestamp) -> Self {
        DateLike::Seconds {
            seconds: ts.seconds,
            nanoseconds: ts.nanoseconds,
        }
    }
}

impl From<Arc<dyn ToInstant>> for DateLike {
    fn from(converter: Arc<dyn ToInstant>) -> Self {
        DateLike::Converter(converter)
    }
}

impl From<&DateLike> for DateLike {
    fn from(value: &DateLike) -> Self {
        value.clone()
    }
}

impl<T: Into<DateLike>> From<Option<T>> for DateLike {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
