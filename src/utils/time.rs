//! Publish timestamp formatting.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::PublishTime;

const SHORT_FORMAT: &str = "%b %d, %I:%M %p %Z";
const LONG_FORMAT: &str = "%A, %B %d, %Y at %I:%M:%S %p %Z";

/// Parse an epoch value as embedded in the page.
///
/// Accepts integer or fractional seconds; values that only make sense as
/// milliseconds are scaled down.
pub fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let secs = if value >= 1e12 { value / 1000.0 } else { value };
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;

    Utc.timestamp_opt(whole, nanos.min(999_999_999)).single()
}

/// Format a UTC instant in the display zone, short and long.
pub fn format_publish_time(at: DateTime<Utc>, tz: Tz) -> PublishTime {
    let local = at.with_timezone(&tz);
    PublishTime {
        short: local.format(SHORT_FORMAT).to_string(),
        long: local.format(LONG_FORMAT).to_string(),
    }
}

/// Parse and format in one go, falling back to "Unknown time".
pub fn publish_time_from_epoch(raw: Option<&str>, tz: Tz) -> PublishTime {
    match raw.and_then(parse_epoch) {
        Some(at) => format_publish_time(at, tz),
        None => {
            if let Some(raw) = raw {
                log::warn!("Unparsable publish timestamp {:?}", raw);
            }
            PublishTime::unknown()
        }
    }
}
