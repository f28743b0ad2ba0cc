use std::fmt;
use std::str::FromStr;

use crate::days::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::error::CalendarError;

/// Calendar and clock units accepted by extract / floor / ceil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Quarter,
    /// ISO-8601 week number.
    Week,
    /// Day of week, Sunday = 1.
    Dow,
    /// Day of week, Monday = 1.
    IsoDow,
    /// Day of year, 1-based.
    Doy,
    /// ISO-8601 week-numbering year.
    IsoYear,
    Decade,
    Century,
    Millennium,
    /// Seconds since 1970-01-01 00:00:00.
    Epoch,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 17] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
        TimeUnit::Millisecond,
        TimeUnit::Quarter,
        TimeUnit::Week,
        TimeUnit::Dow,
        TimeUnit::IsoDow,
        TimeUnit::Doy,
        TimeUnit::IsoYear,
        TimeUnit::Decade,
        TimeUnit::Century,
        TimeUnit::Millennium,
        TimeUnit::Epoch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TimeUnit::Year => "YEAR",
            TimeUnit::Month => "MONTH",
            TimeUnit::Day => "DAY",
            TimeUnit::Hour => "HOUR",
            TimeUnit::Minute => "MINUTE",
            TimeUnit::Second => "SECOND",
            TimeUnit::Millisecond => "MILLISECOND",
            TimeUnit::Quarter => "QUARTER",
            TimeUnit::Week => "WEEK",
            TimeUnit::Dow => "DOW",
            TimeUnit::IsoDow => "ISODOW",
            TimeUnit::Doy => "DOY",
            TimeUnit::IsoYear => "ISOYEAR",
            TimeUnit::Decade => "DECADE",
            TimeUnit::Century => "CENTURY",
            TimeUnit::Millennium => "MILLENNIUM",
            TimeUnit::Epoch => "EPOCH",
        }
    }

    /// Length of one unit in milliseconds, for units of fixed length.
    pub fn millis(self) -> Option<i64> {
        match self {
            TimeUnit::Millisecond => Some(1),
            TimeUnit::Second => Some(MILLIS_PER_SECOND),
            TimeUnit::Minute => Some(MILLIS_PER_MINUTE),
            TimeUnit::Hour => Some(MILLIS_PER_HOUR),
            TimeUnit::Day => Some(MILLIS_PER_DAY),
            TimeUnit::Week => Some(7 * MILLIS_PER_DAY),
            _ => None,
        }
    }

    /// Length of one unit in months, for month-based units.
    pub fn months(self) -> Option<i32> {
        match self {
            TimeUnit::Month => Some(1),
            TimeUnit::Quarter => Some(3),
            TimeUnit::Year => Some(12),
            TimeUnit::Decade => Some(120),
            TimeUnit::Century => Some(1_200),
            TimeUnit::Millennium => Some(12_000),
            _ => None,
        }
    }

    /// `true` for units finer than a day.
    pub fn is_time(self) -> bool {
        matches!(
            self,
            TimeUnit::Hour | TimeUnit::Minute | TimeUnit::Second | TimeUnit::Millisecond
        )
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeUnit::ALL
            .into_iter()
            .find(|u| u.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CalendarError::UnknownUnit(s.to_string()))
    }
}
