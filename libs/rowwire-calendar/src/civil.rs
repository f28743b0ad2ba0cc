//! Bridge between the civil calendar and the proleptic Gregorian day count.
//!
//! The civil calendar reckons Julian before 1582-10-15 and Gregorian from
//! that day on. Client-facing date objects are instants in the civil calendar;
//! unix dates label days in the proleptic Gregorian calendar. Conversions keep
//! the *label* (year, month, day) and move the instant.

use crate::days::{
    EPOCH_JULIAN, MILLIS_PER_DAY, Ymd, floor_div, floor_mod, julian_to_ymd, split_timestamp,
    unix_date_to_ymd, ymd_to_julian,
};
use crate::zone::Zone;

/// Julian day number of 1582-10-15, the first Gregorian day.
pub const GREGORIAN_CUTOVER_JULIAN: i64 = 2_299_161;

fn julian_calendar_to_jdn(ymd: Ymd) -> i64 {
    let (year, month, day) = (ymd.year as i64, ymd.month as i64, ymd.day as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + floor_div(y, 4) - 32083
}

fn jdn_to_julian_calendar(jdn: i64) -> Ymd {
    let c = jdn + 32082;
    let d = floor_div(4 * c + 3, 1461);
    let e = c - floor_div(1461 * d, 4);
    let m = (5 * e + 2) / 153;
    let day = e - (153 * m + 2) / 5 + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = d - 4800 + m / 10;
    Ymd::new(year as i32, month as u32, day as u32)
}

/// Days since 1970-01-01 of a civil-calendar date.
///
/// 1582-10-05 through 1582-10-14 never happened; they land on 1582-10-15.
pub fn civil_day(ymd: Ymd) -> i64 {
    let gregorian = ymd_to_julian(ymd.year, ymd.month, ymd.day);
    if gregorian >= GREGORIAN_CUTOVER_JULIAN {
        return gregorian - EPOCH_JULIAN;
    }
    julian_calendar_to_jdn(ymd).min(GREGORIAN_CUTOVER_JULIAN) - EPOCH_JULIAN
}

/// Civil-calendar date of a day count since 1970-01-01.
pub fn civil_fields(day: i64) -> Ymd {
    let jdn = day + EPOCH_JULIAN;
    if jdn >= GREGORIAN_CUTOVER_JULIAN {
        julian_to_ymd(jdn)
    } else {
        jdn_to_julian_calendar(jdn)
    }
}

/// Unix date carrying the same label as a civil-calendar date.
pub fn civil_calendar_to_unix_date(ymd: Ymd) -> i32 {
    civil_fields(civil_day(ymd)).to_unix_date()
}

/// Civil-calendar date carrying the same label as a unix date.
pub fn unix_date_to_civil_calendar(date: i32) -> Ymd {
    civil_fields(civil_day(unix_date_to_ymd(date)))
}

fn local_offset(zone: Option<&Zone>, wall: i64) -> i64 {
    zone.map_or(0, |z| z.offset_at_local(wall))
}

fn utc_offset(zone: Option<&Zone>, instant: i64) -> i64 {
    zone.map_or(0, |z| z.offset_at_utc(instant))
}

/// Instant (millis since epoch) of local midnight of `date` in `zone`.
pub fn unix_date_to_civil_millis(date: i32, zone: Option<&Zone>) -> i64 {
    let wall = civil_day(unix_date_to_ymd(date)) * MILLIS_PER_DAY;
    wall - local_offset(zone, wall)
}

pub fn unix_timestamp_to_civil_millis(timestamp: i64, zone: Option<&Zone>) -> i64 {
    let (date, time) = split_timestamp(timestamp);
    let wall = civil_day(unix_date_to_ymd(date)) * MILLIS_PER_DAY + time as i64;
    wall - local_offset(zone, wall)
}

/// Instant of `time` (millis of day) on 1970-01-01 in `zone`.
pub fn unix_time_to_civil_millis(time: i32, zone: Option<&Zone>) -> i64 {
    let wall = time as i64;
    wall - local_offset(zone, wall)
}

/// Unix date of the civil day that contains `instant` in `zone`.
///
/// A partial day is truncated toward the epoch, so an instant just after a
/// midnight before 1970 rounds up to the following day.
pub fn civil_millis_to_unix_date(instant: i64, zone: Option<&Zone>) -> i32 {
    let wall = instant + utc_offset(zone, instant);
    civil_fields(wall / MILLIS_PER_DAY).to_unix_date()
}

pub fn civil_millis_to_unix_timestamp(instant: i64, zone: Option<&Zone>) -> i64 {
    let wall = instant + utc_offset(zone, instant);
    let day = floor_div(wall, MILLIS_PER_DAY);
    civil_fields(day).to_unix_date() as i64 * MILLIS_PER_DAY + floor_mod(wall, MILLIS_PER_DAY)
}

pub fn civil_millis_to_unix_time(instant: i64, zone: Option<&Zone>) -> i32 {
    floor_mod(instant + utc_offset(zone, instant), MILLIS_PER_DAY) as i32
}
