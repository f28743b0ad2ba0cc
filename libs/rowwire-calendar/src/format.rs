//! Text forms: `YYYY-MM-DD`, `HH:MM:SS[.fff]` and `YYYY-MM-DD HH:MM:SS[.fff]`.

use crate::days::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, days_in_month,
    floor_mod, split_timestamp, unix_date_to_ymd, ymd_to_unix_date,
};
use crate::error::CalendarError;

/// Fractional digits kept by the parsers. Finer digits are rounded away.
pub const MAX_PRECISION: u32 = 3;

pub fn unix_date_to_string(date: i32) -> String {
    unix_date_to_ymd(date).to_string()
}

/// Formats a millis-of-day value with `precision` fractional digits (0..=3).
pub fn unix_time_to_string(time: i32, precision: u32) -> String {
    let mut buf = String::with_capacity(12);
    write_time(&mut buf, floor_mod(time as i64, MILLIS_PER_DAY), precision);
    buf
}

pub fn unix_timestamp_to_string(timestamp: i64, precision: u32) -> String {
    let (date, time) = split_timestamp(timestamp);
    let mut buf = unix_date_to_string(date);
    buf.push(' ');
    write_time(&mut buf, time as i64, precision);
    buf
}

fn write_time(buf: &mut String, millis: i64, precision: u32) {
    let h = millis / MILLIS_PER_HOUR;
    let m = millis % MILLIS_PER_HOUR / MILLIS_PER_MINUTE;
    let s = millis % MILLIS_PER_MINUTE / MILLIS_PER_SECOND;
    buf.push_str(&format!("{h:02}:{m:02}:{s:02}"));
    let precision = precision.min(MAX_PRECISION);
    if precision > 0 {
        let fraction = format!("{:03}", millis % MILLIS_PER_SECOND);
        buf.push('.');
        buf.push_str(&fraction[..precision as usize]);
    }
}

/// Parses `[-]YYYY-MM-DD` into a unix date.
pub fn parse_date(text: &str) -> Result<i32, CalendarError> {
    let s = text.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let mut parts = body.splitn(3, '-');
    let year = parse_field::<i32>(parts.next(), "year", text)?;
    let month = parse_field::<u32>(parts.next(), "month", text)?;
    let day = parse_field::<u32>(parts.next(), "day", text)?;
    let year = if negative { -year } else { year };
    if !(1..=12).contains(&month) {
        return Err(CalendarError::parse("month", text));
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(CalendarError::parse("day", text));
    }
    Ok(ymd_to_unix_date(year, month, day))
}

/// Parses `HH[:MM[:SS[.f*]]]` into millis of day.
///
/// Fractional seconds are rounded half-up to `precision` digits (at most 3).
pub fn parse_time(text: &str, precision: u32) -> Result<i32, CalendarError> {
    let s = text.trim();
    let (clock, fraction) = match s.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (s, None),
    };
    let mut parts = clock.splitn(3, ':');
    let hour = parse_field::<u32>(parts.next(), "hour", text)?;
    let minute = match parts.next() {
        Some(p) => parse_field::<u32>(Some(p), "minute", text)?,
        None => 0,
    };
    let second = match parts.next() {
        Some(p) => parse_field::<u32>(Some(p), "second", text)?,
        None => 0,
    };
    if hour > 23 {
        return Err(CalendarError::parse("hour", text));
    }
    if minute > 59 {
        return Err(CalendarError::parse("minute", text));
    }
    if second > 59 {
        return Err(CalendarError::parse("second", text));
    }
    let millis = match fraction {
        Some(f) => round_fraction(f, precision).ok_or_else(|| CalendarError::parse("fraction", text))?,
        None => 0,
    };
    Ok((hour as i64 * MILLIS_PER_HOUR
        + minute as i64 * MILLIS_PER_MINUTE
        + second as i64 * MILLIS_PER_SECOND
        + millis) as i32)
}

/// Parses `YYYY-MM-DD[ HH:MM:SS[.f*]]` into a unix timestamp.
pub fn parse_timestamp(text: &str, precision: u32) -> Result<i64, CalendarError> {
    let s = text.trim();
    let (date, time) = match s.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time)),
        None => (s, None),
    };
    let date = parse_date(date).map_err(|e| relabel(e, text))?;
    let time = match time {
        Some(t) => parse_time(t, precision).map_err(|e| relabel(e, text))?,
        None => 0,
    };
    Ok(date as i64 * MILLIS_PER_DAY + time as i64)
}

fn relabel(err: CalendarError, text: &str) -> CalendarError {
    match err {
        CalendarError::Parse { field, .. } => CalendarError::parse(field, text),
        other => other,
    }
}

fn parse_field<T: std::str::FromStr>(
    part: Option<&str>,
    field: &'static str,
    text: &str,
) -> Result<T, CalendarError> {
    let part = part.ok_or_else(|| CalendarError::parse(field, text))?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalendarError::parse(field, text));
    }
    part.parse().map_err(|_| CalendarError::parse(field, text))
}

/// Millisecond value of a fraction-of-second digit string, rounded to `precision` digits.
fn round_fraction(digits: &str, precision: u32) -> Option<i64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let precision = precision.min(MAX_PRECISION) as usize;
    let digit = |i: usize| digits.as_bytes().get(i).map_or(0, |b| (b - b'0') as i64);
    let mut kept = 0i64;
    for i in 0..precision {
        kept = kept * 10 + digit(i);
    }
    if digit(precision) >= 5 {
        kept += 1;
    }
    Some(kept * 10i64.pow((MAX_PRECISION as usize - precision) as u32))
}
