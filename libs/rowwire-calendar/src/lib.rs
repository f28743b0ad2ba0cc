//! Civil-calendar arithmetic for rowwire.
//!
//! Dates are counted in days since 1970-01-01 of the proleptic Gregorian
//! calendar ("unix date"), times in milliseconds since midnight, timestamps in
//! milliseconds since the epoch. [`civil`] bridges these to the historical
//! Julian/Gregorian calendar and to wall clocks in a [`Zone`].

pub mod civil;
pub mod days;
pub mod error;
pub mod extract;
pub mod format;
pub mod interval;
pub mod unit;
pub mod zone;

pub use civil::{
    civil_calendar_to_unix_date, civil_millis_to_unix_date, civil_millis_to_unix_time,
    civil_millis_to_unix_timestamp, unix_date_to_civil_calendar, unix_date_to_civil_millis,
    unix_time_to_civil_millis, unix_timestamp_to_civil_millis,
};
pub use days::{
    MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, Ymd, add_months,
    floor_div, floor_mod, last_day, subtract_months, unix_date_to_ymd, ymd_to_unix_date,
};
pub use error::CalendarError;
pub use extract::{
    ceil_date, ceil_timestamp, extract_from_date, extract_from_time, extract_from_timestamp,
    floor_date, floor_timestamp,
};
pub use format::{
    parse_date, parse_time, parse_timestamp, unix_date_to_string, unix_time_to_string,
    unix_timestamp_to_string,
};
pub use interval::{TimeUnitRange, interval_day_time_to_string, interval_year_month_to_string};
pub use unit::TimeUnit;
pub use zone::Zone;
