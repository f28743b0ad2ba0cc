use bigdecimal::BigDecimal;

use crate::composite::{ArrayValue, StructValue};

/// In-process form of a value, the shape rows carry and computations use.
///
/// Dates are [`LocalValue::Int`] days since the epoch, times `Int` millis of
/// day, timestamps [`LocalValue::Long`] millis since the epoch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LocalValue {
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
    /// Plain ordered sequence: an array's elements or a positional row.
    List(Vec<LocalValue>),
    /// Positional carrier with named fields, read by position or by name.
    Record(Vec<(String, LocalValue)>),
    Struct(StructValue),
    Array(ArrayValue),
}

impl LocalValue {
    pub fn is_null(&self) -> bool {
        matches!(self, LocalValue::Null)
    }

    /// Short description of the runtime shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            LocalValue::Null => "null",
            LocalValue::Bool(_) => "bool",
            LocalValue::Byte(_) => "byte",
            LocalValue::Short(_) => "short",
            LocalValue::Int(_) => "int",
            LocalValue::Long(_) => "long",
            LocalValue::Float(_) => "float",
            LocalValue::Double(_) => "double",
            LocalValue::Decimal(_) => "decimal",
            LocalValue::Char(_) => "char",
            LocalValue::String(_) => "string",
            LocalValue::Bytes(_) => "bytes",
            LocalValue::List(_) => "list",
            LocalValue::Record(_) => "record",
            LocalValue::Struct(_) => "struct",
            LocalValue::Array(_) => "array",
        }
    }

    /// Integer payload of any integral variant.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            LocalValue::Byte(v) => Some(v as i64),
            LocalValue::Short(v) => Some(v as i64),
            LocalValue::Int(v) => Some(v as i64),
            LocalValue::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Field `index` of a positional value (list, record, struct or array).
    pub fn field(&self, index: usize) -> Option<&LocalValue> {
        match self {
            LocalValue::List(values) => values.get(index),
            LocalValue::Record(fields) => fields.get(index).map(|(_, v)| v),
            LocalValue::Struct(s) => s.attributes().get(index),
            LocalValue::Array(a) => a.elements().get(index),
            _ => None,
        }
    }

    /// Number of positional fields, or `None` for scalars.
    pub fn width(&self) -> Option<usize> {
        match self {
            LocalValue::List(values) => Some(values.len()),
            LocalValue::Record(fields) => Some(fields.len()),
            LocalValue::Struct(s) => Some(s.len()),
            LocalValue::Array(a) => Some(a.len()),
            _ => None,
        }
    }

    /// Field named `name` of a record or a named struct.
    pub fn field_by_name(&self, name: &str) -> Option<&LocalValue> {
        match self {
            LocalValue::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            LocalValue::Struct(s) => s.get_by_name(name),
            _ => None,
        }
    }
}

impl From<bool> for LocalValue {
    fn from(v: bool) -> Self {
        LocalValue::Bool(v)
    }
}

impl From<i32> for LocalValue {
    fn from(v: i32) -> Self {
        LocalValue::Int(v)
    }
}

impl From<i64> for LocalValue {
    fn from(v: i64) -> Self {
        LocalValue::Long(v)
    }
}

impl From<f64> for LocalValue {
    fn from(v: f64) -> Self {
        LocalValue::Double(v)
    }
}

impl From<&str> for LocalValue {
    fn from(v: &str) -> Self {
        LocalValue::String(v.to_string())
    }
}

impl From<String> for LocalValue {
    fn from(v: String) -> Self {
        LocalValue::String(v)
    }
}

impl From<BigDecimal> for LocalValue {
    fn from(v: BigDecimal) -> Self {
        LocalValue::Decimal(v)
    }
}

impl From<Vec<u8>> for LocalValue {
    fn from(v: Vec<u8>) -> Self {
        LocalValue::Bytes(v)
    }
}

impl<T: Into<LocalValue>> From<Option<T>> for LocalValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(LocalValue::Null, Into::into)
    }
}
