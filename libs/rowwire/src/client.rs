use bigdecimal::{BigDecimal, ToPrimitive};
use rowwire_calendar::{MILLIS_PER_SECOND, floor_div, floor_mod};

use crate::composite::{ArrayValue, StructValue};

/// A civil-calendar date: the instant of its midnight, in millis since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqlDate(pub i64);

/// A time of day as an instant on 1970-01-01, in millis since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqlTime(pub i64);

/// An instant with nanosecond precision.
///
/// `nanos` is the fraction of the second and always agrees with the
/// sub-second part of `millis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SqlTimestamp {
    millis: i64,
    nanos: u32,
}

impl SqlTimestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self { millis, nanos: (floor_mod(millis, MILLIS_PER_SECOND) * 1_000_000) as u32 }
    }

    /// Seconds since the epoch, keeping up to nine fractional digits.
    pub fn from_seconds(seconds: &BigDecimal) -> Option<Self> {
        let nanos_total = (seconds * BigDecimal::from(1_000_000_000)).with_scale(0);
        let nanos_total = nanos_total.to_i128()?;
        let secs = nanos_total.div_euclid(1_000_000_000);
        let nanos = nanos_total.rem_euclid(1_000_000_000) as u32;
        let millis = i64::try_from(secs).ok()?.checked_mul(MILLIS_PER_SECOND)?
            + (nanos / 1_000_000) as i64;
        Some(Self { millis, nanos })
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Move the instant by `delta` millis, keeping the sub-millisecond nanos.
    pub fn shifted(self, delta: i64) -> Self {
        let millis = self.millis + delta;
        let sub_milli = self.nanos % 1_000_000;
        Self { millis, nanos: (floor_mod(millis, MILLIS_PER_SECOND) * 1_000_000) as u32 + sub_milli }
    }

    pub fn epoch_seconds(&self) -> i64 {
        floor_div(self.millis, MILLIS_PER_SECOND)
    }
}

/// Client-facing form of a value, as handed to result readers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ClientValue {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Decimal(BigDecimal),
    Char(char),
    String(String),
    Bytes(Vec<u8>),
    Date(SqlDate),
    Time(SqlTime),
    Timestamp(SqlTimestamp),
    Array(ArrayValue),
    Struct(StructValue),
}

impl ClientValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ClientValue::Null)
    }

    pub fn shape(&self) -> &'static str {
        match self {
            ClientValue::Null => "null",
            ClientValue::Bool(_) => "bool",
            ClientValue::Byte(_) => "byte",
            ClientValue::Short(_) => "short",
            ClientValue::Int(_) => "int",
            ClientValue::Long(_) => "long",
            ClientValue::Float(_) => "float",
            ClientValue::Double(_) => "double",
            ClientValue::Decimal(_) => "decimal",
            ClientValue::Char(_) => "char",
            ClientValue::String(_) => "string",
            ClientValue::Bytes(_) => "bytes",
            ClientValue::Date(_) => "date",
            ClientValue::Time(_) => "time",
            ClientValue::Timestamp(_) => "timestamp",
            ClientValue::Array(_) => "array",
            ClientValue::Struct(_) => "struct",
        }
    }

    /// Millis since the epoch of any date/time/timestamp variant.
    pub fn instant_millis(&self) -> Option<i64> {
        match self {
            ClientValue::Date(d) => Some(d.0),
            ClientValue::Time(t) => Some(t.0),
            ClientValue::Timestamp(ts) => Some(ts.millis()),
            _ => None,
        }
    }
}
