//! Timestamp display helpers.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a UTC [`Timestamp`] in the system time zone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
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

/// Formats only the calendar date of a [`Timestamp`] in the system time zone.
pub struct LocalDate<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.to_zoned(TimeZone::system()).strftime("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_is_prefix_of_datetime() {
        let ts: Timestamp = "2025-03-14T12:00:00Z".parse().unwrap();
        let full = LocalDateTime(&ts).to_string();
        let date = LocalDate(&ts).to_string();

        assert_eq!(date.len(), 10);
        assert!(full.starts_with(&date));
    }
}
