//! Interval qualifiers and the text form of interval values.
//!
//! Year-month intervals are counted in months, day-time intervals in
//! milliseconds. Text is signed (`+1-01`, `-0 00:00:01.500`), with the
//! leading field unpadded and every later field zero-padded.

use std::fmt;

use crate::days::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::error::CalendarError;
use crate::format::MAX_PRECISION;
use crate::unit::TimeUnit;

/// A leading unit and an optional trailing unit, as in `DAY TO SECOND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnitRange {
    Year,
    YearToMonth,
    Month,
    Day,
    DayToHour,
    DayToMinute,
    DayToSecond,
    Hour,
    HourToMinute,
    HourToSecond,
    Minute,
    MinuteToSecond,
    Second,
    Millisecond,
    Quarter,
    Week,
    Dow,
    IsoDow,
    Doy,
    IsoYear,
    Decade,
    Century,
    Millennium,
    Epoch,
}

impl TimeUnitRange {
    /// The range spanning `start` to `end`; `None` when no such qualifier exists.
    pub fn of(start: TimeUnit, end: Option<TimeUnit>) -> Option<TimeUnitRange> {
        use TimeUnit as U;
        Some(match (start, end) {
            (U::Year, None) => TimeUnitRange::Year,
            (U::Year, Some(U::Month)) => TimeUnitRange::YearToMonth,
            (U::Month, None) => TimeUnitRange::Month,
            (U::Day, None) => TimeUnitRange::Day,
            (U::Day, Some(U::Hour)) => TimeUnitRange::DayToHour,
            (U::Day, Some(U::Minute)) => TimeUnitRange::DayToMinute,
            (U::Day, Some(U::Second)) => TimeUnitRange::DayToSecond,
            (U::Hour, None) => TimeUnitRange::Hour,
            (U::Hour, Some(U::Minute)) => TimeUnitRange::HourToMinute,
            (U::Hour, Some(U::Second)) => TimeUnitRange::HourToSecond,
            (U::Minute, None) => TimeUnitRange::Minute,
            (U::Minute, Some(U::Second)) => TimeUnitRange::MinuteToSecond,
            (U::Second, None) => TimeUnitRange::Second,
            (U::Millisecond, None) => TimeUnitRange::Millisecond,
            (U::Quarter, None) => TimeUnitRange::Quarter,
            (U::Week, None) => TimeUnitRange::Week,
            (U::Dow, None) => TimeUnitRange::Dow,
            (U::IsoDow, None) => TimeUnitRange::IsoDow,
            (U::Doy, None) => TimeUnitRange::Doy,
            (U::IsoYear, None) => TimeUnitRange::IsoYear,
            (U::Decade, None) => TimeUnitRange::Decade,
            (U::Century, None) => TimeUnitRange::Century,
            (U::Millennium, None) => TimeUnitRange::Millennium,
            (U::Epoch, None) => TimeUnitRange::Epoch,
            _ => return None,
        })
    }

    pub fn start(self) -> TimeUnit {
        match self {
            TimeUnitRange::Year | TimeUnitRange::YearToMonth => TimeUnit::Year,
            TimeUnitRange::Month => TimeUnit::Month,
            TimeUnitRange::Day
            | TimeUnitRange::DayToHour
            | TimeUnitRange::DayToMinute
            | TimeUnitRange::DayToSecond => TimeUnit::Day,
            TimeUnitRange::Hour | TimeUnitRange::HourToMinute | TimeUnitRange::HourToSecond => {
                TimeUnit::Hour
            }
            TimeUnitRange::Minute | TimeUnitRange::MinuteToSecond => TimeUnit::Minute,
            TimeUnitRange::Second => TimeUnit::Second,
            TimeUnitRange::Millisecond => TimeUnit::Millisecond,
            TimeUnitRange::Quarter => TimeUnit::Quarter,
            TimeUnitRange::Week => TimeUnit::Week,
            TimeUnitRange::Dow => TimeUnit::Dow,
            TimeUnitRange::IsoDow => TimeUnit::IsoDow,
            TimeUnitRange::Doy => TimeUnit::Doy,
            TimeUnitRange::IsoYear => TimeUnit::IsoYear,
            TimeUnitRange::Decade => TimeUnit::Decade,
            TimeUnitRange::Century => TimeUnit::Century,
            TimeUnitRange::Millennium => TimeUnit::Millennium,
            TimeUnitRange::Epoch => TimeUnit::Epoch,
        }
    }

    pub fn end(self) -> Option<TimeUnit> {
        match self {
            TimeUnitRange::YearToMonth => Some(TimeUnit::Month),
            TimeUnitRange::DayToHour => Some(TimeUnit::Hour),
            TimeUnitRange::DayToMinute | TimeUnitRange::HourToMinute => Some(TimeUnit::Minute),
            TimeUnitRange::DayToSecond | TimeUnitRange::HourToSecond | TimeUnitRange::MinuteToSecond => {
                Some(TimeUnit::Second)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TimeUnitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end() {
            Some(end) => write!(f, "{}_TO_{}", self.start(), end),
            None => write!(f, "{}", self.start()),
        }
    }
}

/// Round `value` to a multiple of `unit`, halves toward zero.
fn round_to(value: i64, unit: i64) -> i64 {
    let rest = value % unit;
    let value = value - rest;
    if rest * 2 > unit { value + unit } else { value }
}

fn sign(buf: &mut String, value: i64) -> i64 {
    buf.push(if value < 0 { '-' } else { '+' });
    value.saturating_abs()
}

/// Text of a year-month interval of `months` months.
pub fn interval_year_month_to_string(months: i32, range: TimeUnitRange) -> Result<String, CalendarError> {
    let mut buf = String::with_capacity(8);
    let v = sign(&mut buf, months as i64);
    match range {
        TimeUnitRange::Year => buf.push_str(&(round_to(v, 12) / 12).to_string()),
        TimeUnitRange::YearToMonth => buf.push_str(&format!("{}-{:02}", v / 12, v % 12)),
        TimeUnitRange::Month => buf.push_str(&v.to_string()),
        other => return Err(CalendarError::IntervalRange { range: other, kind: "year-month" }),
    }
    Ok(buf)
}

/// Text of a day-time interval of `millis` milliseconds, with `scale`
/// fractional second digits (at most 3) where the range ends in seconds.
pub fn interval_day_time_to_string(millis: i64, range: TimeUnitRange, scale: u32) -> Result<String, CalendarError> {
    let scale = scale.min(MAX_PRECISION);
    let mut buf = String::with_capacity(20);
    let v = sign(&mut buf, millis);
    let second_unit = 10i64.pow(MAX_PRECISION - scale);
    match range {
        TimeUnitRange::Day => buf.push_str(&(round_to(v, MILLIS_PER_DAY) / MILLIS_PER_DAY).to_string()),
        TimeUnitRange::DayToHour => {
            let v = round_to(v, MILLIS_PER_HOUR) / MILLIS_PER_HOUR;
            buf.push_str(&format!("{} {:02}", v / 24, v % 24));
        }
        TimeUnitRange::DayToMinute => {
            let v = round_to(v, MILLIS_PER_MINUTE) / MILLIS_PER_MINUTE;
            buf.push_str(&format!("{} {:02}:{:02}", v / 1_440, v / 60 % 24, v % 60));
        }
        TimeUnitRange::DayToSecond => {
            let v = round_to(v, second_unit);
            let s = v / MILLIS_PER_SECOND;
            buf.push_str(&format!("{} {:02}:{:02}:{:02}", s / 86_400, s / 3_600 % 24, s / 60 % 60, s % 60));
            fraction(&mut buf, scale, v % MILLIS_PER_SECOND);
        }
        TimeUnitRange::Hour => buf.push_str(&(round_to(v, MILLIS_PER_HOUR) / MILLIS_PER_HOUR).to_string()),
        TimeUnitRange::HourToMinute => {
            let v = round_to(v, MILLIS_PER_MINUTE) / MILLIS_PER_MINUTE;
            buf.push_str(&format!("{}:{:02}", v / 60, v % 60));
        }
        TimeUnitRange::HourToSecond => {
            let v = round_to(v, second_unit);
            let s = v / MILLIS_PER_SECOND;
            buf.push_str(&format!("{}:{:02}:{:02}", s / 3_600, s / 60 % 60, s % 60));
            fraction(&mut buf, scale, v % MILLIS_PER_SECOND);
        }
        TimeUnitRange::Minute => buf.push_str(&(round_to(v, MILLIS_PER_MINUTE) / MILLIS_PER_MINUTE).to_string()),
        TimeUnitRange::MinuteToSecond => {
            let v = round_to(v, second_unit);
            let s = v / MILLIS_PER_SECOND;
            buf.push_str(&format!("{}:{:02}", s / 60, s % 60));
            fraction(&mut buf, scale, v % MILLIS_PER_SECOND);
        }
        TimeUnitRange::Second => {
            let v = round_to(v, second_unit);
            buf.push_str(&(v / MILLIS_PER_SECOND).to_string());
            fraction(&mut buf, scale, v % MILLIS_PER_SECOND);
        }
        other => return Err(CalendarError::IntervalRange { range: other, kind: "day-time" }),
    }
    Ok(buf)
}

fn fraction(buf: &mut String, scale: u32, millis: i64) {
    if scale > 0 {
        let digits = format!("{millis:03}");
        buf.push('.');
        buf.push_str(&digits[..scale as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_from_units() {
        assert_eq!(TimeUnitRange::of(TimeUnit::Year, None), Some(TimeUnitRange::Year));
        assert_eq!(TimeUnitRange::of(TimeUnit::Year, Some(TimeUnit::Month)), Some(TimeUnitRange::YearToMonth));
        assert_eq!(TimeUnitRange::of(TimeUnit::Day, Some(TimeUnit::Second)), Some(TimeUnitRange::DayToSecond));
        assert_eq!(TimeUnitRange::of(TimeUnit::Minute, Some(TimeUnit::Second)), Some(TimeUnitRange::MinuteToSecond));
        assert_eq!(TimeUnitRange::of(TimeUnit::Month, Some(TimeUnit::Day)), None);
        for unit in TimeUnit::ALL {
            let range = TimeUnitRange::of(unit, None).unwrap();
            assert_eq!(range.start(), unit);
            assert_eq!(range.end(), None);
        }
        assert_eq!(TimeUnitRange::HourToSecond.to_string(), "HOUR_TO_SECOND");
    }

    #[test]
    fn year_month_text() {
        let range = TimeUnitRange::YearToMonth;
        assert_eq!(interval_year_month_to_string(0, range).unwrap(), "+0-00");
        assert_eq!(interval_year_month_to_string(12, range).unwrap(), "+1-00");
        assert_eq!(interval_year_month_to_string(13, range).unwrap(), "+1-01");
        assert_eq!(interval_year_month_to_string(-13, range).unwrap(), "-1-01");
        assert_eq!(interval_year_month_to_string(0, TimeUnitRange::Year).unwrap(), "+0");
        assert_eq!(interval_year_month_to_string(19, TimeUnitRange::Year).unwrap(), "+2");
        assert_eq!(interval_year_month_to_string(0, TimeUnitRange::Month).unwrap(), "+0");
        assert!(interval_year_month_to_string(1, TimeUnitRange::Day).is_err());
    }

    #[test]
    fn day_time_zero_in_every_range() {
        let cases = [
            (TimeUnitRange::Day, "+0"),
            (TimeUnitRange::DayToHour, "+0 00"),
            (TimeUnitRange::DayToMinute, "+0 00:00"),
            (TimeUnitRange::DayToSecond, "+0 00:00:00"),
            (TimeUnitRange::Hour, "+0"),
            (TimeUnitRange::HourToMinute, "+0:00"),
            (TimeUnitRange::HourToSecond, "+0:00:00"),
            (TimeUnitRange::Minute, "+0"),
            (TimeUnitRange::MinuteToSecond, "+0:00"),
            (TimeUnitRange::Second, "+0"),
        ];
        for (range, text) in cases {
            assert_eq!(interval_day_time_to_string(0, range, 0).unwrap(), text, "{range}");
        }
    }

    #[test]
    fn day_time_fields_and_fraction() {
        // 1 day 02:03:04.567
        let v = MILLIS_PER_DAY + 2 * MILLIS_PER_HOUR + 3 * MILLIS_PER_MINUTE + 4_567;
        assert_eq!(interval_day_time_to_string(v, TimeUnitRange::DayToSecond, 3).unwrap(), "+1 02:03:04.567");
        assert_eq!(interval_day_time_to_string(v, TimeUnitRange::DayToSecond, 1).unwrap(), "+1 02:03:04.6");
        assert_eq!(interval_day_time_to_string(-v, TimeUnitRange::HourToSecond, 0).unwrap(), "-26:03:05");
        assert_eq!(interval_day_time_to_string(v, TimeUnitRange::DayToMinute, 0).unwrap(), "+1 02:03");
        assert_eq!(interval_day_time_to_string(90_000, TimeUnitRange::MinuteToSecond, 2).unwrap(), "+1:30.00");
        assert_eq!(interval_day_time_to_string(1_500, TimeUnitRange::Second, 3).unwrap(), "+1.500");
        assert!(interval_day_time_to_string(1, TimeUnitRange::YearToMonth, 0).is_err());
    }
}
