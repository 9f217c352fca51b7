//! Timestamp formatting in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a [`Timestamp`] as `YYYY-MM-DD HH:MM:SS TZ` in the system time
/// zone. Used for the draft save time and export headers.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}
