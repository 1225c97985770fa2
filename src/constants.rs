//! Format constants and mean periods
//!
//! The mean periods only size scan windows; they are never used as event
//! timestamps.

/// Magic tag at offset 0 of every binary record ("FRAC" little-endian).
pub const RECORD_MAGIC: u32 = 0x4341_5246;

/// Size of the fixed binary record header in bytes.
pub const RECORD_HEADER_SIZE: usize = 16;

/// Size of one encoded timestamp in bytes.
pub const RECORD_ENTRY_SIZE: usize = 8;

/// Literals per row in generated C headers.
pub const HEADER_ROW_WIDTH: usize = 8;

/// Default number of events generated per kind.
pub const DEFAULT_EVENT_COUNT: usize = 512;

pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Mean synodic month in days (new moon to new moon).
pub const SYNODIC_MONTH_DAYS: f64 = 29.530589;

/// Mean anomalistic month in days (perigee to perigee).
pub const ANOMALISTIC_MONTH_DAYS: f64 = 27.554550;

/// Mean tropical year in days.
pub const TROPICAL_YEAR_DAYS: f64 = 365.24219;

/// Mean nodical (draconic) month in days.
pub const NODICAL_MONTH_DAYS: f64 = 27.212221;

/// Unix timestamp of J2000.0 (2000-01-01T12:00:00 TT, taken as UTC).
pub const J2000_UNIX: f64 = 946_728_000.0;

/// Convert a period in days to whole seconds.
pub fn days_to_seconds(days: f64) -> i64 {
    (days * SECONDS_PER_DAY as f64).round() as i64
}
