use std::str::FromStr;

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::{Result, RowwireError};
use crate::rep::Rep;
use crate::typed::TypedValue;

/// JSON-compatible form of a value, the payload a [`TypedValue`] carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SerialValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    List(Vec<SerialValue>),
    /// A nested tagged value, as array elements decoded from the wire carry.
    Typed(Box<TypedValue>),
}

impl SerialValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SerialValue::Null)
    }

    pub fn shape(&self) -> &'static str {
        match self {
            SerialValue::Null => "null",
            SerialValue::Bool(_) => "bool",
            SerialValue::Integer(_) => "integer",
            SerialValue::Float(_) => "float",
            SerialValue::Decimal(_) => "decimal",
            SerialValue::String(_) => "string",
            SerialValue::List(_) => "list",
            SerialValue::Typed(_) => "typed value",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SerialValue::Integer(v) => Some(*v),
            SerialValue::Float(v) => Some(*v as i64),
            SerialValue::Decimal(v) => v.to_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SerialValue::Integer(v) => Some(*v as f64),
            SerialValue::Float(v) => Some(*v),
            SerialValue::Decimal(v) => v.to_f64(),
            _ => None,
        }
    }

    /// Any numeric payload as a decimal. Text is parsed, since large
    /// decimals travel as JSON strings.
    pub fn as_decimal(&self, rep: Rep) -> Result<BigDecimal> {
        match self {
            SerialValue::Integer(v) => Ok(BigDecimal::from(*v)),
            SerialValue::Float(v) => decimal_from_f64(*v)
                .ok_or_else(|| RowwireError::mismatch(rep, "a finite number", v.to_string())),
            SerialValue::Decimal(v) => Ok(v.clone()),
            SerialValue::String(s) => BigDecimal::from_str(s)
                .map_err(|_| RowwireError::mismatch(rep, "a decimal", format!("string '{s}'"))),
            other => Err(RowwireError::mismatch(rep, "a number", other.shape())),
        }
    }

    /// Read a JSON value. Objects are nested tagged values.
    pub fn from_json(value: &serde_json::Value) -> Result<SerialValue> {
        Ok(match value {
            serde_json::Value::Null => SerialValue::Null,
            serde_json::Value::Bool(b) => SerialValue::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SerialValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    SerialValue::Decimal(BigDecimal::from(u))
                } else {
                    SerialValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => SerialValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                SerialValue::List(items.iter().map(SerialValue::from_json).collect::<Result<_>>()?)
            }
            serde_json::Value::Object(_) => {
                SerialValue::Typed(Box::new(TypedValue::from_json(value.clone())?))
            }
        })
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The decimal a float prints as: shortest text that reads back to the same float.
pub(crate) fn decimal_from_f64(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}

/// Decimals go out as JSON integers when they are whole and fit in i64, as
/// JSON floats when the float reads back to the same decimal, and as text
/// otherwise.
fn serialize_decimal<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_integer() {
        if let Some(i) = value.to_i64() {
            return serializer.serialize_i64(i);
        }
    }
    if let Some(f) = value.to_f64() {
        if decimal_from_f64(f).is_some_and(|back| &back == value) {
            return serializer.serialize_f64(f);
        }
    }
    serializer.serialize_str(&value.to_plain_string())
}

impl Serialize for SerialValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SerialValue::Null => serializer.serialize_unit(),
            SerialValue::Bool(b) => serializer.serialize_bool(*b),
            SerialValue::Integer(i) => serializer.serialize_i64(*i),
            SerialValue::Float(f) => serializer.serialize_f64(*f),
            SerialValue::Decimal(d) => serialize_decimal(d, serializer),
            SerialValue::String(s) => serializer.serialize_str(s),
            SerialValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            SerialValue::Typed(tv) => tv.serialize(serializer),
        }
    }
}
