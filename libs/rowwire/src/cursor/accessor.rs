use std::str::FromStr;
use std::sync::Arc;

use bigdecimal::{BigDecimal, ToPrimitive};
use rowwire_calendar::{
    MILLIS_PER_SECOND, Zone, civil_millis_to_unix_time,
    civil_millis_to_unix_timestamp, floor_mod, unix_date_to_civil_millis, unix_date_to_string,
    unix_time_to_civil_millis, unix_time_to_string, unix_timestamp_to_civil_millis,
    unix_timestamp_to_string,
};

use super::Cursor;
use super::getter::Getter;
use crate::client::{ClientValue, SqlDate, SqlTime, SqlTimestamp};
use crate::column::{ColumnMetaData, ColumnType};
use crate::composite::{ArrayFactory, ArrayValue, StructValue};
use crate::convert::{encode_base64, local_to_client, plain_local_to_serial};
use crate::error::{Result, RowwireError};
use crate::local::LocalValue;
use crate::rep::Rep;
use crate::serial::decimal_from_f64;

/// Reading discipline of a column, fixed by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Number,
    Char,
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
    InstantTime,
    InstantTimestamp,
    Array,
    Struct,
    Object,
}

impl Kind {
    fn of(rep: Rep) -> Kind {
        match rep.non_primitive() {
            Rep::Boolean => Kind::Boolean,
            Rep::Byte => Kind::Byte,
            Rep::Short => Kind::Short,
            Rep::Integer => Kind::Int,
            Rep::Long => Kind::Long,
            Rep::Float => Kind::Float,
            Rep::Double => Kind::Double,
            Rep::Number => Kind::Number,
            Rep::Character => Kind::Char,
            Rep::String => Kind::String,
            Rep::ByteString => Kind::Bytes,
            Rep::SqlDate => Kind::Date,
            Rep::SqlTime => Kind::Time,
            Rep::SqlTimestamp | Rep::UtilDate => Kind::Timestamp,
            Rep::InstantTime => Kind::InstantTime,
            Rep::InstantTimestamp => Kind::InstantTimestamp,
            Rep::Array => Kind::Array,
            Rep::Struct => Kind::Struct,
            _ => Kind::Object,
        }
    }
}

/// Typed reader of one column of a [`Cursor`]'s current row.
///
/// Holds no row state: every getter reads the row afresh and records
/// whether the value was null on the cursor.
pub struct Accessor {
    column: ColumnMetaData,
    getter: Getter,
    kind: Kind,
    zone: Option<Zone>,
    factory: Arc<dyn ArrayFactory>,
}

impl Accessor {
    pub fn new(column: ColumnMetaData, getter: Getter, zone: Option<Zone>, factory: Arc<dyn ArrayFactory>) -> Self {
        let kind = Kind::of(column.rep());
        Self { column, getter, kind, zone, factory }
    }

    pub fn column(&self) -> &ColumnMetaData {
        &self.column
    }

    pub fn rep(&self) -> Rep {
        self.column.rep()
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    pub fn was_null(&self, cursor: &Cursor) -> bool {
        cursor.was_null()
    }

    fn raw<'c>(&self, cursor: &'c Cursor) -> Result<&'c LocalValue> {
        let value = self
            .getter
            .get(cursor.row()?)
            .map_err(|e| e.with_context(format!("column '{}'", self.column.name)))?;
        cursor.set_was_null(value.is_null());
        Ok(value)
    }

    fn mismatch(&self, expected: &'static str, value: &LocalValue) -> RowwireError {
        RowwireError::mismatch(self.rep(), expected, value.shape())
            .with_context(format!("column '{}'", self.column.name))
    }

    // ---- numbers ----

    fn long_of(&self, value: &LocalValue) -> Result<Option<i64>> {
        Ok(Some(match value {
            LocalValue::Null => return Ok(None),
            LocalValue::Bool(b) => *b as i64,
            LocalValue::Float(f) => *f as i64,
            LocalValue::Double(f) => *f as i64,
            LocalValue::Decimal(d) => d.with_scale(0).to_i64().ok_or_else(|| self.mismatch("a long", value))?,
            other => other.as_i64().ok_or_else(|| self.mismatch("a number", other))?,
        }))
    }

    fn double_of(&self, value: &LocalValue) -> Result<Option<f64>> {
        Ok(Some(match value {
            LocalValue::Null => return Ok(None),
            LocalValue::Bool(b) => *b as i64 as f64,
            LocalValue::Float(f) => *f as f64,
            LocalValue::Double(f) => *f,
            LocalValue::Decimal(d) => d.to_f64().ok_or_else(|| self.mismatch("a double", value))?,
            other => other.as_i64().ok_or_else(|| self.mismatch("a number", other))? as f64,
        }))
    }

    fn decimal_of(&self, value: &LocalValue) -> Result<Option<BigDecimal>> {
        Ok(Some(match value {
            LocalValue::Null => return Ok(None),
            LocalValue::Bool(b) => BigDecimal::from(*b as i64),
            LocalValue::Decimal(d) => d.clone(),
            LocalValue::Float(f) => BigDecimal::from_str(&f.to_string()).map_err(|_| self.mismatch("a finite number", value))?,
            LocalValue::Double(f) => decimal_from_f64(*f).ok_or_else(|| self.mismatch("a finite number", value))?,
            other => BigDecimal::from(other.as_i64().ok_or_else(|| self.mismatch("a number", other))?),
        }))
    }

    pub fn get_long(&self, cursor: &Cursor) -> Result<Option<i64>> {
        self.long_of(self.raw(cursor)?)
    }

    /// Narrowing keeps the low 32 bits, so out-of-range values wrap
    /// rather than fail.
    pub fn get_int(&self, cursor: &Cursor) -> Result<Option<i32>> {
        Ok(self.get_long(cursor)?.map(|v| v as i32))
    }

    /// Keeps the low 16 bits; see [`Accessor::get_int`].
    pub fn get_short(&self, cursor: &Cursor) -> Result<Option<i16>> {
        Ok(self.get_long(cursor)?.map(|v| v as i16))
    }

    /// Keeps the low 8 bits: 300 reads as 44.
    pub fn get_byte(&self, cursor: &Cursor) -> Result<Option<i8>> {
        Ok(self.get_long(cursor)?.map(|v| v as i8))
    }

    pub fn get_double(&self, cursor: &Cursor) -> Result<Option<f64>> {
        self.double_of(self.raw(cursor)?)
    }

    pub fn get_float(&self, cursor: &Cursor) -> Result<Option<f32>> {
        Ok(self.get_double(cursor)?.map(|v| v as f32))
    }

    pub fn get_decimal(&self, cursor: &Cursor) -> Result<Option<BigDecimal>> {
        self.decimal_of(self.raw(cursor)?)
    }

    pub fn get_bool(&self, cursor: &Cursor) -> Result<Option<bool>> {
        match self.raw(cursor)? {
            LocalValue::Null => Ok(None),
            LocalValue::Bool(b) => Ok(Some(*b)),
            LocalValue::String(s) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            LocalValue::String(s) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            other => Ok(self.double_of(other)?.map(|v| v != 0.0)),
        }
    }

    pub fn get_bytes(&self, cursor: &Cursor) -> Result<Option<Vec<u8>>> {
        match self.raw(cursor)? {
            LocalValue::Null => Ok(None),
            LocalValue::Bytes(b) => Ok(Some(b.clone())),
            other => Err(self.mismatch("bytes", other)),
        }
    }

    // ---- text ----

    /// Text form. Dates render as `YYYY-MM-DD`, times as `HH:MM:SS`,
    /// timestamps as `YYYY-MM-DD HH:MM:SS[.fff]`, bytes as base64. Instant
    /// tags render in the accessor's zone.
    pub fn get_string(&self, cursor: &Cursor) -> Result<Option<String>> {
        let value = self.raw(cursor)?;
        if value.is_null() {
            return Ok(None);
        }
        let zone = self.zone.as_ref();
        let text = match self.kind {
            Kind::Date => unix_date_to_string(self.count(value)? as i32),
            Kind::Time => unix_time_to_string(self.count(value)? as i32, 0),
            Kind::Timestamp => timestamp_string(self.millis_of(value)?),
            Kind::InstantTime => unix_time_to_string(civil_millis_to_unix_time(self.count(value)?, zone), 0),
            Kind::InstantTimestamp => {
                timestamp_string(civil_millis_to_unix_timestamp(self.millis_of(value)?, zone))
            }
            _ => plain_text(value)?,
        };
        Ok(Some(text))
    }

    // ---- dates and times ----

    fn count(&self, value: &LocalValue) -> Result<i64> {
        self.long_of(value)?.ok_or_else(|| self.mismatch("a number", value))
    }

    /// Millis of a timestamp value: integer millis, or decimal seconds.
    fn millis_of(&self, value: &LocalValue) -> Result<i64> {
        Ok(self.timestamp_of(value)?.millis())
    }

    fn timestamp_of(&self, value: &LocalValue) -> Result<SqlTimestamp> {
        match value {
            LocalValue::Decimal(seconds) => {
                SqlTimestamp::from_seconds(seconds).ok_or_else(|| self.mismatch("seconds in range", value))
            }
            other => Ok(SqlTimestamp::from_millis(self.count(other)?)),
        }
    }

    /// Date of the value, at local midnight in `zone`.
    pub fn get_date(&self, cursor: &Cursor, zone: Option<&Zone>) -> Result<Option<SqlDate>> {
        let value = self.raw(cursor)?;
        if value.is_null() {
            return Ok(None);
        }
        let millis = match self.kind {
            Kind::Date => unix_date_to_civil_millis(self.count(value)? as i32, zone),
            Kind::Timestamp => unix_timestamp_to_civil_millis(self.millis_of(value)?, zone),
            Kind::InstantTimestamp => self.millis_of(value)?,
            _ => return Err(self.mismatch("a date", value)),
        };
        Ok(Some(SqlDate(millis)))
    }

    pub fn get_time(&self, cursor: &Cursor, zone: Option<&Zone>) -> Result<Option<SqlTime>> {
        let value = self.raw(cursor)?;
        if value.is_null() {
            return Ok(None);
        }
        let millis = match self.kind {
            Kind::Time => unix_time_to_civil_millis(self.count(value)? as i32, zone),
            Kind::Timestamp => unix_timestamp_to_civil_millis(self.millis_of(value)?, zone),
            Kind::InstantTime => self.count(value)?,
            Kind::InstantTimestamp => self.millis_of(value)?,
            _ => return Err(self.mismatch("a time", value)),
        };
        Ok(Some(SqlTime(millis)))
    }

    /// Timestamp of the value in `zone`. Decimal-second values keep their nanos.
    pub fn get_timestamp(&self, cursor: &Cursor, zone: Option<&Zone>) -> Result<Option<SqlTimestamp>> {
        let value = self.raw(cursor)?;
        if value.is_null() {
            return Ok(None);
        }
        let ts = match self.kind {
            Kind::Timestamp => {
                let ts = self.timestamp_of(value)?;
                ts.shifted(unix_timestamp_to_civil_millis(ts.millis(), zone) - ts.millis())
            }
            Kind::Date => SqlTimestamp::from_millis(unix_date_to_civil_millis(self.count(value)? as i32, zone)),
            Kind::Time => SqlTimestamp::from_millis(unix_time_to_civil_millis(self.count(value)? as i32, zone)),
            Kind::InstantTime => SqlTimestamp::from_millis(self.count(value)?),
            Kind::InstantTimestamp => self.timestamp_of(value)?,
            _ => return Err(self.mismatch("a timestamp", value)),
        };
        Ok(Some(ts))
    }

    // ---- composites ----

    fn component(&self, elements: &[LocalValue]) -> ColumnType {
        match &self.column.column_type {
            ColumnType::Array { component } => (**component).clone(),
            _ => ColumnType::scalar(
                elements.iter().find(|e| !e.is_null()).map_or(Rep::Object, Rep::of_local),
            ),
        }
    }

    pub fn get_array(&self, cursor: &Cursor) -> Result<Option<ArrayValue>> {
        match self.raw(cursor)? {
            LocalValue::Null => Ok(None),
            LocalValue::List(items) => Ok(Some(self.factory.create_array(self.component(items), items.clone()))),
            LocalValue::Array(array) => Ok(Some(array.clone())),
            other => Err(self.mismatch("an array", other)),
        }
    }

    /// Record value of the column. Lists, named-field records and structs
    /// are all accepted.
    pub fn get_struct(&self, cursor: &Cursor) -> Result<Option<StructValue>> {
        let value = self.raw(cursor)?;
        let fields: &[ColumnMetaData] = match &self.column.column_type {
            ColumnType::Struct { fields } => fields,
            _ => &[],
        };
        let record = match value {
            LocalValue::Null => return Ok(None),
            LocalValue::List(items) => StructValue::from_values(items.clone()).with_fields(fields),
            LocalValue::Record(named) => StructValue::from_fields(named.clone()),
            LocalValue::Struct(s) => StructValue::from_struct(s).with_fields(fields),
            other => return Err(self.mismatch("a record", other)),
        };
        if !fields.is_empty() && record.len() != fields.len() {
            return Err(self.mismatch("a record of the declared arity", value));
        }
        Ok(Some(record))
    }

    // ---- objects ----

    /// Client value of the column, read in the accessor's own zone.
    pub fn get_object(&self, cursor: &Cursor) -> Result<ClientValue> {
        let zone = self.zone.as_ref();
        let value = self.raw(cursor)?;
        if value.is_null() {
            return Ok(ClientValue::Null);
        }
        let object = match self.kind {
            Kind::Boolean => self.get_bool(cursor)?.map(ClientValue::Bool),
            Kind::Byte => self.long_of(value)?.map(|v| ClientValue::Byte(v as i8)),
            Kind::Short => self.long_of(value)?.map(|v| ClientValue::Short(v as i16)),
            Kind::Int => self.long_of(value)?.map(|v| ClientValue::Int(v as i32)),
            Kind::Long => self.long_of(value)?.map(ClientValue::Long),
            Kind::Float => self.double_of(value)?.map(|v| ClientValue::Float(v as f32)),
            Kind::Double => self.double_of(value)?.map(ClientValue::Double),
            Kind::Number => self.decimal_of(value)?.map(ClientValue::Decimal),
            Kind::Char => Some(ClientValue::Char(self.char_of(value)?)),
            Kind::String => self.get_string(cursor)?.map(ClientValue::String),
            Kind::Bytes => self.get_bytes(cursor)?.map(ClientValue::Bytes),
            Kind::Date => self.get_date(cursor, zone)?.map(ClientValue::Date),
            Kind::Time | Kind::InstantTime => self.get_time(cursor, zone)?.map(ClientValue::Time),
            Kind::Timestamp | Kind::InstantTimestamp => {
                self.get_timestamp(cursor, zone)?.map(ClientValue::Timestamp)
            }
            Kind::Array => self.get_array(cursor)?.map(ClientValue::Array),
            Kind::Struct => self.get_struct(cursor)?.map(ClientValue::Struct),
            Kind::Object => Some(local_to_client(value.clone())),
        };
        Ok(object.unwrap_or_default())
    }

    fn char_of(&self, value: &LocalValue) -> Result<char> {
        match value {
            LocalValue::Char(c) => Ok(*c),
            LocalValue::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(self.mismatch("a single character", value)),
                }
            }
            other => other
                .as_i64()
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32)
                .ok_or_else(|| self.mismatch("a character", other)),
        }
    }
}

fn timestamp_string(millis: i64) -> String {
    let precision = if floor_mod(millis, MILLIS_PER_SECOND) == 0 { 0 } else { 3 };
    unix_timestamp_to_string(millis, precision)
}

fn plain_text(value: &LocalValue) -> Result<String> {
    Ok(match value {
        LocalValue::Null => String::new(),
        LocalValue::Bool(b) => b.to_string(),
        LocalValue::Byte(v) => v.to_string(),
        LocalValue::Short(v) => v.to_string(),
        LocalValue::Int(v) => v.to_string(),
        LocalValue::Long(v) => v.to_string(),
        LocalValue::Float(v) => v.to_string(),
        LocalValue::Double(v) => v.to_string(),
        LocalValue::Decimal(v) => v.to_plain_string(),
        LocalValue::Char(c) => c.to_string(),
        LocalValue::String(s) => s.clone(),
        LocalValue::Bytes(b) => encode_base64(b),
        composite => plain_local_to_serial(composite)?.to_json()?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{ListRows, SingleValueRows};
    use crate::error::ConversionError;
    use rowwire_calendar::MILLIS_PER_DAY as DAY;

    fn single(value: LocalValue, rep: Rep, zone: Option<Zone>) -> (Cursor, Accessor) {
        let mut cursor = Cursor::new(SingleValueRows::new(vec![value]));
        let accessor = cursor
            .create_accessors(&[ColumnMetaData::scalar(0, "v", rep)], zone, None)
            .remove(0);
        assert!(cursor.next().unwrap());
        (cursor, accessor)
    }

    #[test]
    fn numbers_widen_and_narrow() {
        let (cursor, a) = single(LocalValue::Long(300), Rep::Long, None);
        assert_eq!(a.get_byte(&cursor).unwrap(), Some(44));
        assert_eq!(a.get_double(&cursor).unwrap(), Some(300.0));
        assert_eq!(a.get_decimal(&cursor).unwrap(), Some(BigDecimal::from(300)));
        assert_eq!(a.get_object(&cursor).unwrap(), ClientValue::Long(300));

        let (cursor, a) = single(LocalValue::Double(2.75), Rep::Double, None);
        assert_eq!(a.get_int(&cursor).unwrap(), Some(2));
        assert_eq!(a.get_decimal(&cursor).unwrap(), Some(BigDecimal::from_str("2.75").unwrap()));
    }

    #[test]
    fn text_is_not_a_number() {
        let (cursor, a) = single("abc".into(), Rep::String, None);
        let err = a.get_int(&cursor).unwrap_err();
        assert!(matches!(err.root(), RowwireError::Conversion(ConversionError::ShapeMismatch { .. })));
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn byte_object_narrows_int_payload() {
        let (cursor, a) = single(LocalValue::Int(5), Rep::PrimitiveByte, None);
        assert_eq!(a.get_object(&cursor).unwrap(), ClientValue::Byte(5));
    }

    #[test]
    fn was_null_tracks_the_last_read() {
        let mut cursor = Cursor::new(ListRows::new(vec![vec![LocalValue::Null, LocalValue::Int(2)]]));
        let accessors = cursor.create_accessors(
            &[ColumnMetaData::scalar(0, "a", Rep::Integer), ColumnMetaData::scalar(1, "b", Rep::Integer)],
            None,
            None,
        );
        assert!(cursor.next().unwrap());
        assert_eq!(accessors[0].get_int(&cursor).unwrap(), None);
        assert!(accessors[0].was_null(&cursor));
        assert_eq!(accessors[1].get_int(&cursor).unwrap(), Some(2));
        assert!(!accessors[1].was_null(&cursor));
    }

    #[test]
    fn date_from_number() {
        let (cursor, a) = single(LocalValue::Int(-1), Rep::SqlDate, None);
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("1969-12-31"));
        assert_eq!(a.get_date(&cursor, None).unwrap(), Some(SqlDate(-DAY)));
        let utc_minus_1 = Zone::Fixed(-3_600_000);
        assert_eq!(a.get_date(&cursor, Some(&utc_minus_1)).unwrap(), Some(SqlDate(-DAY + 3_600_000)));
        assert_eq!(a.get_timestamp(&cursor, None).unwrap(), Some(SqlTimestamp::from_millis(-DAY)));
    }

    #[test]
    fn time_from_number() {
        let (cursor, a) = single(LocalValue::Int(3_723_004), Rep::SqlTime, Some(Zone::Utc));
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("01:02:03"));
        assert_eq!(a.get_time(&cursor, None).unwrap(), Some(SqlTime(3_723_004)));
        assert_eq!(a.get_object(&cursor).unwrap(), ClientValue::Time(SqlTime(3_723_004)));
        assert!(a.get_date(&cursor, None).is_err());
    }

    #[test]
    fn timestamp_string_shows_millis_when_present() {
        let (cursor, a) = single(LocalValue::Long(1_500), Rep::SqlTimestamp, None);
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("1970-01-01 00:00:01.500"));
        let (cursor, a) = single(LocalValue::Long(0), Rep::SqlTimestamp, None);
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("1970-01-01 00:00:00"));
    }

    #[test]
    fn timestamp_from_decimal_seconds_keeps_nanos() {
        let seconds = BigDecimal::from_str("1.000000007").unwrap();
        let (cursor, a) = single(LocalValue::Decimal(seconds), Rep::SqlTimestamp, None);
        let ts = a.get_timestamp(&cursor, None).unwrap().unwrap();
        assert_eq!(ts.millis(), 1_000);
        assert_eq!(ts.nanos(), 7);
    }

    #[test]
    fn instant_time_renders_in_accessor_zone() {
        let ist = Zone::Fixed(19_800_000);
        let (cursor, a) = single(LocalValue::Int(0), Rep::InstantTime, Some(ist));
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("05:30:00"));
        assert_eq!(a.get_time(&cursor, Some(&ist)).unwrap(), Some(SqlTime(0)));

        let (cursor, a) = single(LocalValue::Int((DAY - 1_000) as i32), Rep::InstantTime, Some(ist));
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("05:29:59"));
    }

    #[test]
    fn instant_timestamp_applies_no_offset() {
        let ist = Zone::Fixed(19_800_000);
        let (cursor, a) = single(LocalValue::Long(0), Rep::InstantTimestamp, Some(ist));
        assert_eq!(a.get_timestamp(&cursor, Some(&ist)).unwrap(), Some(SqlTimestamp::from_millis(0)));
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("1970-01-01 05:30:00"));
    }

    #[test]
    fn bytes_render_as_base64() {
        let (cursor, a) = single(LocalValue::Bytes(vec![1, 2, 3]), Rep::ByteString, None);
        assert_eq!(a.get_string(&cursor).unwrap().as_deref(), Some("AQID"));
        assert_eq!(a.get_bytes(&cursor).unwrap(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn char_column_accepts_one_char_strings() {
        let (cursor, a) = single("x".into(), Rep::PrimitiveChar, None);
        assert_eq!(a.get_object(&cursor).unwrap(), ClientValue::Char('x'));
    }
}
