//! Day-count arithmetic over the proleptic Gregorian calendar.
//!
//! A "unix date" is the number of days since 1970-01-01; a "unix timestamp"
//! is milliseconds since 1970-01-01 00:00:00. Both are zone-free.

use std::fmt;

pub const MILLIS_PER_SECOND: i64 = 1_000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Julian day number of 1970-01-01.
pub const EPOCH_JULIAN: i64 = 2_440_588;

/// Division rounding toward negative infinity.
pub fn floor_div(x: i64, y: i64) -> i64 {
    x.div_euclid(y) - if y < 0 && x.rem_euclid(y) != 0 { 1 } else { 0 }
}

/// Remainder with the sign of the divisor.
pub fn floor_mod(x: i64, y: i64) -> i64 {
    x - floor_div(x, y) * y
}

/// Year, month (1..=12) and day (1..=31) of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ymd {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Ymd {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn to_unix_date(self) -> i32 {
        ymd_to_unix_date(self.year, self.month, self.day)
    }

    pub fn from_unix_date(date: i32) -> Self {
        unix_date_to_ymd(date)
    }
}

impl fmt::Display for Ymd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}-{:02}", -(self.year as i64), self.month, self.day)
        } else {
            write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Julian day number of a proleptic Gregorian date.
pub fn ymd_to_julian(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + floor_div(y, 4) - floor_div(y, 100) + floor_div(y, 400)
        - 32045
}

/// Proleptic Gregorian date of a Julian day number.
pub fn julian_to_ymd(julian: i64) -> Ymd {
    let a = julian + 32044;
    let b = floor_div(4 * a + 3, 146_097);
    let c = a - floor_div(b * 146_097, 4);
    let d = (4 * c + 3) / 1461;
    let e = c - (1461 * d) / 4;
    let m = (5 * e + 2) / 153;
    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = b * 100 + d - 4800 + m / 10;
    Ymd::new(year as i32, month as u32, day as u32)
}

pub fn ymd_to_unix_date(year: i32, month: u32, day: u32) -> i32 {
    (ymd_to_julian(year, month, day) - EPOCH_JULIAN) as i32
}

pub fn unix_date_to_ymd(date: i32) -> Ymd {
    julian_to_ymd(date as i64 + EPOCH_JULIAN)
}

/// Milliseconds since epoch for a date and wall-clock time, no zone applied.
pub fn unix_timestamp(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
    ymd_to_unix_date(year, month, day) as i64 * MILLIS_PER_DAY
        + hour as i64 * MILLIS_PER_HOUR
        + minute as i64 * MILLIS_PER_MINUTE
        + second as i64 * MILLIS_PER_SECOND
}

/// Splits a timestamp into `(unix date, millis of day)`.
pub fn split_timestamp(timestamp: i64) -> (i32, i32) {
    (
        floor_div(timestamp, MILLIS_PER_DAY) as i32,
        floor_mod(timestamp, MILLIS_PER_DAY) as i32,
    )
}

/// Last day of the month that contains `date`.
pub fn last_day(date: i32) -> i32 {
    let ymd = unix_date_to_ymd(date);
    ymd_to_unix_date(ymd.year, ymd.month, days_in_month(ymd.year, ymd.month))
}

/// Adds `months` to a date, clamping the day to the end of the target month.
pub fn add_months(date: i32, months: i32) -> i32 {
    let ymd = unix_date_to_ymd(date);
    let total = ymd.year as i64 * 12 + (ymd.month as i64 - 1) + months as i64;
    let year = floor_div(total, 12) as i32;
    let month = (floor_mod(total, 12) + 1) as u32;
    let day = ymd.day.min(days_in_month(year, month));
    ymd_to_unix_date(year, month, day)
}

pub fn add_months_to_timestamp(timestamp: i64, months: i32) -> i64 {
    let (date, millis) = split_timestamp(timestamp);
    add_months(date, months) as i64 * MILLIS_PER_DAY + millis as i64
}

/// Whole months between two dates, counted on calendar fields.
///
/// Only an approximate inverse of [`add_months`]: around month-end clamping
/// the answer may differ by one from the `months` that produced `date0`.
pub fn subtract_months(date0: i32, date1: i32) -> i32 {
    if date0 < date1 {
        return -subtract_months(date1, date0);
    }
    let a = unix_date_to_ymd(date0);
    let b = unix_date_to_ymd(date1);
    let mut months = (a.year - b.year) * 12 + (a.month as i32 - b.month as i32);
    if a.day < b.day {
        months -= 1;
    }
    months
}

pub fn subtract_months_between_timestamps(t0: i64, t1: i64) -> i32 {
    let (d0, millis0) = split_timestamp(t0);
    let (d1, millis1) = split_timestamp(t1);
    let mut months = subtract_months(d0, d1);
    if add_months(d1, months) == d0 && millis0 < millis1 {
        months -= 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> i32 {
        ymd_to_unix_date(y, m, d)
    }

    #[test]
    fn julian_round_trip() {
        assert_eq!(ymd_to_julian(2000, 1, 1), 2_451_545);
        assert_eq!(julian_to_ymd(2_451_545), Ymd::new(2000, 1, 1));
        assert_eq!(ymd(1970, 1, 1), 0);
        assert_eq!(ymd(1900, 1, 1), -25567);
        assert_eq!(ymd(2000, 1, 1), 10957);
    }

    #[test]
    fn every_day_of_four_centuries_round_trips() {
        for year in [1, 4, 100, 1582, 1600, 1899, 1900, 2000, 2024, 9999] {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let d = ymd(year, month, day);
                    assert_eq!(unix_date_to_ymd(d), Ymd::new(year, month, day));
                }
            }
        }
    }

    #[test]
    fn non_positive_years() {
        let d = ymd(0, 3, 1);
        assert_eq!(unix_date_to_ymd(d), Ymd::new(0, 3, 1));
        assert_eq!(ymd(0, 3, 1) - ymd(0, 2, 28), 2, "year 0 is a leap year");
        let d = ymd(-2, 1, 1);
        assert_eq!(unix_date_to_ymd(d), Ymd::new(-2, 1, 1));
    }

    #[test]
    fn floor_helpers() {
        assert_eq!(floor_div(-1, 7), -1);
        assert_eq!(floor_mod(-1, 7), 6);
        assert_eq!(floor_div(7, 7), 1);
        assert_eq!(floor_mod(-86_400_001, MILLIS_PER_DAY), MILLIS_PER_DAY - 1);
    }

    #[test]
    fn unix_timestamps() {
        assert_eq!(unix_timestamp(1970, 1, 1, 23, 59, 59), 86_399_000);
        assert_eq!(unix_timestamp(1900, 2, 28, 0, 0, 0), -2_203_977_600_000);
        assert_eq!(unix_timestamp(2000, 2, 28, 0, 0, 0), 951_696_000_000);
    }

    #[test]
    fn last_day_of_month() {
        let cases = [
            ((2019, 2, 10), (2019, 2, 28)),
            ((2019, 6, 10), (2019, 6, 30)),
            ((2019, 12, 10), (2019, 12, 31)),
            ((9999, 12, 10), (9999, 12, 31)),
            ((2020, 2, 20), (2020, 2, 29)),
            ((2020, 2, 29), (2020, 2, 29)),
            ((1900, 2, 1), (1900, 2, 28)),
        ];
        for ((y, m, d), (ly, lm, ld)) in cases {
            assert_eq!(last_day(ymd(y, m, d)), ymd(ly, lm, ld), "{y}-{m}-{d}");
        }
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(ymd(2016, 1, 31), 1), ymd(2016, 2, 29));
        assert_eq!(add_months(ymd(2016, 1, 31), 3), ymd(2016, 4, 30));
        assert_eq!(add_months(ymd(2016, 3, 31), -1), ymd(2016, 2, 29));
        assert_eq!(add_months(ymd(2016, 1, 1), -12), ymd(2015, 1, 1));
        assert_eq!(add_months(ymd(2016, 1, 1), 33), ymd(2018, 10, 1));
        assert_eq!(add_months(ymd(2019, 9, 1), -37), ymd(2016, 8, 1));
        assert_eq!(add_months(ymd(2016, 2, 28), 1200), ymd(2116, 2, 28));
    }

    #[test]
    fn subtract_months_cases() {
        assert_eq!(subtract_months(ymd(2005, 9, 11), ymd(2004, 9, 11)), 12);
        assert_eq!(subtract_months(ymd(2003, 9, 11), ymd(2005, 9, 11)), -24);
        assert_eq!(subtract_months(ymd(2005, 2, 28), ymd(2004, 2, 29)), 11);
        assert_eq!(subtract_months(ymd(2005, 3, 28), ymd(2004, 3, 29)), 11);
        assert_eq!(subtract_months(ymd(2004, 2, 29), ymd(2003, 2, 28)), 12);
        assert_eq!(subtract_months(ymd(2001, 10, 10), ymd(1999, 9, 11)), 24);
        assert_eq!(subtract_months(ymd(2000, 2, 29), ymd(2000, 3, 28)), 0);
        assert_eq!(subtract_months(ymd(2000, 2, 29), ymd(1991, 3, 28)), 107);
    }

    #[test]
    fn subtract_months_tolerates_one_month_slack() {
        let cases = [((2016, 1, 31), 1), ((2016, 1, 31), 3), ((2016, 3, 31), -1), ((2019, 9, 1), -37)];
        for ((y, m, d), months) in cases {
            let date0 = ymd(y, m, d);
            let date1 = add_months(date0, months);
            let back = subtract_months(date1, date0);
            assert!((back - months).abs() <= 1, "{y}-{m}-{d} + {months} gave {back}");
            let ts = subtract_months_between_timestamps(
                date1 as i64 * MILLIS_PER_DAY,
                date0 as i64 * MILLIS_PER_DAY + 1,
            );
            assert!((ts - months).abs() <= 1);
        }
    }
}
