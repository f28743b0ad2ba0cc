//! Field extraction and unit rounding for dates, times and timestamps.

use crate::days::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, SECONDS_PER_DAY,
    add_months, floor_div, floor_mod, split_timestamp, unix_date_to_ymd, ymd_to_unix_date,
};
use crate::error::CalendarError;
use crate::unit::TimeUnit;

/// Day of week with Monday = 1 .. Sunday = 7.
fn iso_dow(date: i32) -> i64 {
    floor_mod(date as i64 + 3, 7) + 1
}

/// Day of week with Sunday = 1 .. Saturday = 7.
fn dow(date: i32) -> i64 {
    floor_mod(date as i64 + 4, 7) + 1
}

/// Thursday of the ISO week containing `date`; it decides the week-numbering year.
fn iso_thursday(date: i32) -> i32 {
    (date as i64 - iso_dow(date) + 4) as i32
}

fn iso_year(date: i32) -> i32 {
    unix_date_to_ymd(iso_thursday(date)).year
}

/// Monday that starts ISO week-numbering year `year`.
fn iso_year_start(year: i32) -> i32 {
    let jan4 = ymd_to_unix_date(year, 1, 4);
    (jan4 as i64 - (iso_dow(jan4) - 1)) as i32
}

fn day_of_year(date: i32) -> i64 {
    let ymd = unix_date_to_ymd(date);
    (date - ymd_to_unix_date(ymd.year, 1, 1)) as i64 + 1
}

/// Extracts a field from a unix date. Clock units are zero.
pub fn extract_from_date(unit: TimeUnit, date: i32) -> i64 {
    let ymd = unix_date_to_ymd(date);
    let year = ymd.year as i64;
    match unit {
        TimeUnit::Year => year,
        TimeUnit::Month => ymd.month as i64,
        TimeUnit::Day => ymd.day as i64,
        TimeUnit::Quarter => (ymd.month as i64 + 2) / 3,
        TimeUnit::Week => {
            let thursday = iso_thursday(date);
            (day_of_year(thursday) - 1) / 7 + 1
        }
        TimeUnit::IsoYear => iso_year(date) as i64,
        TimeUnit::Dow => dow(date),
        TimeUnit::IsoDow => iso_dow(date),
        TimeUnit::Doy => day_of_year(date),
        TimeUnit::Decade => year / 10,
        TimeUnit::Century => {
            if year > 0 { (year + 99) / 100 } else { (year - 99) / 100 }
        }
        TimeUnit::Millennium => {
            if year > 0 { (year + 999) / 1000 } else { (year - 999) / 1000 }
        }
        TimeUnit::Epoch => date as i64 * SECONDS_PER_DAY,
        TimeUnit::Hour | TimeUnit::Minute | TimeUnit::Second | TimeUnit::Millisecond => 0,
    }
}

/// Extracts a clock field from a millis-of-day value.
pub fn extract_from_time(unit: TimeUnit, time: i32) -> Result<i64, CalendarError> {
    let time = floor_mod(time as i64, MILLIS_PER_DAY);
    match unit {
        TimeUnit::Hour => Ok(time / MILLIS_PER_HOUR),
        TimeUnit::Minute => Ok(time % MILLIS_PER_HOUR / MILLIS_PER_MINUTE),
        TimeUnit::Second => Ok(time % MILLIS_PER_MINUTE / MILLIS_PER_SECOND),
        TimeUnit::Millisecond => Ok(time % MILLIS_PER_MINUTE),
        TimeUnit::Epoch => Ok(time / MILLIS_PER_SECOND),
        unit => Err(CalendarError::UnsupportedUnit { unit, operation: "time extract" }),
    }
}

pub fn extract_from_timestamp(unit: TimeUnit, timestamp: i64) -> i64 {
    let (date, time) = split_timestamp(timestamp);
    match unit {
        TimeUnit::Epoch => floor_div(timestamp, MILLIS_PER_SECOND),
        unit if unit.is_time() => extract_from_time(unit, time).unwrap_or_default(),
        unit => extract_from_date(unit, date),
    }
}

/// First day of a year-aligned period of `span` years, counting from year 1.
fn period_start_from_one(year: i32, span: i64) -> i32 {
    let year = year as i64;
    (year - floor_mod(year - 1, span)) as i32
}

/// Rounds a date down to the start of `unit`.
///
/// WEEK starts on Sunday, matching DOW numbering.
pub fn floor_date(unit: TimeUnit, date: i32) -> Result<i32, CalendarError> {
    let ymd = unix_date_to_ymd(date);
    let floored = match unit {
        TimeUnit::Millennium => ymd_to_unix_date(period_start_from_one(ymd.year, 1000), 1, 1),
        TimeUnit::Century => ymd_to_unix_date(period_start_from_one(ymd.year, 100), 1, 1),
        TimeUnit::Decade => {
            ymd_to_unix_date((ymd.year as i64 - floor_mod(ymd.year as i64, 10)) as i32, 1, 1)
        }
        TimeUnit::Year => ymd_to_unix_date(ymd.year, 1, 1),
        TimeUnit::IsoYear => iso_year_start(iso_year(date)),
        TimeUnit::Quarter => ymd_to_unix_date(ymd.year, (ymd.month - 1) / 3 * 3 + 1, 1),
        TimeUnit::Month => ymd_to_unix_date(ymd.year, ymd.month, 1),
        TimeUnit::Week => (date as i64 - (dow(date) - 1)) as i32,
        TimeUnit::Day
        | TimeUnit::Hour
        | TimeUnit::Minute
        | TimeUnit::Second
        | TimeUnit::Millisecond => date,
        unit => return Err(CalendarError::UnsupportedUnit { unit, operation: "floor" }),
    };
    Ok(floored)
}

/// Rounds a date up to the next start of `unit`, or returns it unchanged if already aligned.
pub fn ceil_date(unit: TimeUnit, date: i32) -> Result<i32, CalendarError> {
    let floored = floor_date(unit, date)?;
    if floored == date {
        return Ok(date);
    }
    next_period(unit, floored)
}

/// Start of the period after the one beginning at `start`.
fn next_period(unit: TimeUnit, start: i32) -> Result<i32, CalendarError> {
    if let Some(months) = unit.months() {
        return Ok(add_months(start, months));
    }
    match unit {
        TimeUnit::Week => Ok(start + 7),
        TimeUnit::IsoYear => Ok(iso_year_start(iso_year(start) + 1)),
        TimeUnit::Day => Ok(start + 1),
        unit => Err(CalendarError::UnsupportedUnit { unit, operation: "ceil" }),
    }
}

pub fn floor_timestamp(unit: TimeUnit, timestamp: i64) -> Result<i64, CalendarError> {
    if let Some(millis) = unit.millis().filter(|_| unit.is_time() || unit == TimeUnit::Day) {
        return Ok(floor_div(timestamp, millis) * millis);
    }
    let (date, _) = split_timestamp(timestamp);
    Ok(floor_date(unit, date)? as i64 * MILLIS_PER_DAY)
}

pub fn ceil_timestamp(unit: TimeUnit, timestamp: i64) -> Result<i64, CalendarError> {
    let floored = floor_timestamp(unit, timestamp)?;
    if floored == timestamp {
        return Ok(timestamp);
    }
    if let Some(millis) = unit.millis().filter(|_| unit.is_time() || unit == TimeUnit::Day) {
        return Ok(floored + millis);
    }
    let start = floor_div(floored, MILLIS_PER_DAY) as i32;
    Ok(next_period(unit, start)? as i64 * MILLIS_PER_DAY)
}
