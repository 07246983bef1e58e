//! The single timestamp representation shared by every encoder and by
//! crash dumps: `YYYY-MM-DD HH:MM:SS.mmm` in local time.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// strftime pattern behind [`format_time`]
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Format a timestamp with millisecond precision and zero-padded fields.
///
/// The timestamp is rendered in its own zone; records carry local time.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use rust_logger_facade::core::format_time;
///
/// let tz = FixedOffset::east_opt(0).unwrap();
/// let t = tz.with_ymd_and_hms(2025, 1, 8, 9, 5, 7).unwrap();
/// assert_eq!(format_time(&t), "2025-01-08 09:05:07.000");
/// ```
#[must_use]
pub fn format_time<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format(TIME_LAYOUT).to_string()
}
