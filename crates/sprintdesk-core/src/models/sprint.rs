//! Sprint numbers and sprint keys.
//!
//! Agencies schedule work in sixteen sprints: sprint 0 is onboarding and
//! sprints 1 through 15 are delivery weeks. A client task records the sprint
//! it belongs to as a [`SprintKey`], written as `sprint-{N}`.
//!
//! Older rows may carry a calendar key (`YYYY-WW`). Those are still parsed so
//! the rows load, but nothing writes them any more.

use std::{fmt, str::FromStr};

use jiff::civil::{self, Date};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// A sprint number within a plan, bounded to `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SprintNumber(u8);

impl SprintNumber {
    /// The onboarding sprint.
    pub const ONBOARDING: SprintNumber = SprintNumber(0);

    /// The last delivery sprint; advancing stops here.
    pub const LAST: SprintNumber = SprintNumber(15);

    /// Validates a raw sprint number.
    pub fn new(value: i64) -> Result<Self> {
        if (0..=i64::from(Self::LAST.0)).contains(&value) {
            Ok(SprintNumber(value as u8))
        } else {
            Err(TrackerError::invalid_input("sprint").with_reason(format!(
                "Sprint {value} is out of range. Sprints run from {} to {}",
                Self::ONBOARDING.0,
                Self::LAST.0
            )))
        }
    }

    /// The raw sprint number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// The following sprint, or `None` when already at [`SprintNumber::LAST`].
    pub fn next(self) -> Option<SprintNumber> {
        (self < Self::LAST).then(|| SprintNumber(self.0 + 1))
    }

    /// The key that tasks generated for this sprint are filed under.
    pub fn key(self) -> SprintKey {
        SprintKey::Numbered(self)
    }
}

impl TryFrom<u8> for SprintNumber {
    type Error = TrackerError;

    fn try_from(value: u8) -> Result<Self> {
        SprintNumber::new(i64::from(value))
    }
}

impl From<SprintNumber> for u8 {
    fn from(value: SprintNumber) -> Self {
        value.0
    }
}

impl fmt::Display for SprintNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the sprint a client task belongs to.
///
/// `Display` renders the stored form (`sprint-3`); use [`SprintKey::label`]
/// for the human-facing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SprintKey {
    /// Agency-assigned sprint, `sprint-{N}`
    Numbered(SprintNumber),
    /// Legacy calendar week, `YYYY-WW`
    Calendar { year: i16, week: u8 },
}

impl SprintKey {
    /// Human-facing label, e.g. `Sprint 3` or `Week 2025-48`.
    pub fn label(&self) -> String {
        match self {
            SprintKey::Numbered(n) => format!("Sprint {n}"),
            SprintKey::Calendar { year, week } => format!("Week {year}-{week:02}"),
        }
    }

    /// Whether the key uses the retired calendar scheme.
    pub fn is_legacy(&self) -> bool {
        matches!(self, SprintKey::Calendar { .. })
    }
}

impl fmt::Display for SprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SprintKey::Numbered(n) => write!(f, "sprint-{n}"),
            SprintKey::Calendar { year, week } => write!(f, "{year}-{week:02}"),
        }
    }
}

impl FromStr for SprintKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || format!("Invalid sprint key: {s}");

        if let Some(number) = s.strip_prefix("sprint-") {
            let value: i64 = number.parse().map_err(|_| invalid())?;
            return SprintNumber::new(value)
                .map(SprintKey::Numbered)
                .map_err(|_| invalid());
        }

        let (year, week) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(invalid());
        }
        let year: i16 = year.parse().map_err(|_| invalid())?;
        let week: u8 = week.parse().map_err(|_| invalid())?;
        if !(1..=54).contains(&week) {
            return Err(invalid());
        }
        Ok(SprintKey::Calendar { year, week })
    }
}

impl TryFrom<String> for SprintKey {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SprintKey> for String {
    fn from(value: SprintKey) -> Self {
        value.to_string()
    }
}

/// Computes the retired calendar-week key for a date.
///
/// Weeks are counted from January 1st, shifted by the weekday January 1st
/// falls on (Sunday = 0), so this is not an ISO week number.
pub fn calendar_week_key(date: Date) -> SprintKey {
    let jan1 = civil::date(date.year(), 1, 1);
    let days = i32::from(date.day_of_year()) - 1;
    let offset = i32::from(jan1.weekday().to_sunday_zero_offset());
    let week = (days + offset + 1 + 6) / 7;
    SprintKey::Calendar {
        year: date.year(),
        week: week as u8,
    }
}
