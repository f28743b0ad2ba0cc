use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Offset, TimeZone};

use crate::days::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::error::CalendarError;

/// Time zone context for wall-clock conversions.
///
/// Offset lookups are pure functions of `(zone, instant)`; nothing here is mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    Utc,
    /// Fixed offset east of UTC, in milliseconds.
    Fixed(i64),
    Named(chrono_tz::Tz),
    /// The platform's local zone.
    #[default]
    Local,
}

impl Zone {
    /// Offset in milliseconds at the UTC instant `instant`.
    pub fn offset_at_utc(&self, instant: i64) -> i64 {
        match self {
            Zone::Utc => 0,
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => naive(instant)
                .map_or(0, |n| tz.offset_from_utc_datetime(&n).fix().local_minus_utc() as i64)
                * MILLIS_PER_SECOND,
            Zone::Local => naive(instant)
                .map_or(0, |n| chrono::Local.offset_from_utc_datetime(&n).local_minus_utc() as i64)
                * MILLIS_PER_SECOND,
        }
    }

    /// Offset in milliseconds for the wall-clock time `wall` (millis since the local epoch).
    ///
    /// Ambiguous wall times take the earlier offset. Wall times inside a gap
    /// fall back to the offset at the same numeric UTC instant.
    pub fn offset_at_local(&self, wall: i64) -> i64 {
        let seconds = match self {
            Zone::Utc => return 0,
            Zone::Fixed(offset) => return *offset,
            Zone::Named(tz) => naive(wall).and_then(|n| {
                tz.offset_from_local_datetime(&n)
                    .earliest()
                    .map(|o| o.fix().local_minus_utc())
            }),
            Zone::Local => naive(wall).and_then(|n| {
                chrono::Local
                    .offset_from_local_datetime(&n)
                    .earliest()
                    .map(|o| o.local_minus_utc())
            }),
        };
        match seconds {
            Some(s) => s as i64 * MILLIS_PER_SECOND,
            None => self.offset_at_utc(wall),
        }
    }
}

fn naive(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => f.write_str("UTC"),
            Zone::Fixed(offset) => {
                let sign = if *offset < 0 { '-' } else { '+' };
                let abs = offset.abs();
                write!(
                    f,
                    "{sign}{:02}:{:02}",
                    abs / MILLIS_PER_HOUR,
                    abs % MILLIS_PER_HOUR / MILLIS_PER_MINUTE
                )
            }
            Zone::Named(tz) => f.write_str(tz.name()),
            Zone::Local => f.write_str("local"),
        }
    }
}

impl FromStr for Zone {
    type Err = CalendarError;

    /// Accepts `UTC`/`Z`, `local`, `±HH:MM`/`±HHMM`/`±HH`, or an IANA zone name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            return Ok(Zone::Utc);
        }
        if s.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        if let Some(sign) = s.chars().next().filter(|c| *c == '+' || *c == '-') {
            return parse_fixed(&s[1..], sign == '-').ok_or_else(|| CalendarError::UnknownZone(s.to_string()));
        }
        s.parse::<chrono_tz::Tz>()
            .map(Zone::Named)
            .map_err(|_| CalendarError::UnknownZone(s.to_string()))
    }
}

fn parse_fixed(body: &str, negative: bool) -> Option<Zone> {
    let digits: String = body.chars().filter(|c| *c != ':').collect();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i64>().ok()?, 0),
        4 => (digits[..2].parse::<i64>().ok()?, digits[2..].parse::<i64>().ok()?),
        _ => return None,
    };
    if hours > 18 || minutes > 59 {
        return None;
    }
    let offset = hours * MILLIS_PER_HOUR + minutes * MILLIS_PER_MINUTE;
    Some(Zone::Fixed(if negative { -offset } else { offset }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zone_strings() {
        assert_eq!("UTC".parse::<Zone>().unwrap(), Zone::Utc);
        assert_eq!("local".parse::<Zone>().unwrap(), Zone::Local);
        assert_eq!("+05:30".parse::<Zone>().unwrap(), Zone::Fixed(19_800_000));
        assert_eq!("-0800".parse::<Zone>().unwrap(), Zone::Fixed(-28_800_000));
        assert_eq!(
            "Asia/Kolkata".parse::<Zone>().unwrap(),
            Zone::Named(chrono_tz::Tz::Asia__Kolkata)
        );
        assert!(matches!("Mars/Olympus".parse::<Zone>(), Err(CalendarError::UnknownZone(_))));
        assert!("+25:00".parse::<Zone>().is_err());
        assert_eq!(Zone::Fixed(-19_800_000).to_string(), "-05:30");
    }

    #[test]
    fn named_zone_follows_daylight_saving() {
        let la = Zone::Named(chrono_tz::Tz::America__Los_Angeles);
        // 2023-01-14 00:45:35.052 UTC, standard time
        assert_eq!(la.offset_at_utc(1_673_657_135_052), -8 * MILLIS_PER_HOUR);
        // 2023-07-14 07:45:23.052 UTC, daylight time
        assert_eq!(la.offset_at_utc(1_689_320_723_052), -7 * MILLIS_PER_HOUR);
        assert_eq!(la.offset_at_local(1_673_657_135_052), -8 * MILLIS_PER_HOUR);
    }

    #[test]
    fn local_gap_falls_back_to_utc_instant_offset() {
        let la = Zone::Named(chrono_tz::Tz::America__Los_Angeles);
        // 2023-03-12 02:30 does not exist in Los Angeles
        let wall = 1_678_588_200_000;
        assert_eq!(la.offset_at_local(wall), la.offset_at_utc(wall));
    }
}
