//! Per-tag conversions between the local, serial and client shapes.
//!
//! Every function dispatches on [`Rep`]. Temporal tags are the only ones that
//! consult a zone; instant tags ignore it.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rowwire_calendar::{
    MILLIS_PER_DAY, Zone, civil_millis_to_unix_date, civil_millis_to_unix_time,
    civil_millis_to_unix_timestamp, floor_mod, unix_date_to_civil_millis,
    unix_time_to_civil_millis, unix_timestamp_to_civil_millis,
};

use crate::client::{ClientValue, SqlDate, SqlTime, SqlTimestamp};
use crate::column::ColumnType;
use crate::composite::{ArrayValue, StructValue};
use crate::error::{Result, RowwireError};
use crate::local::LocalValue;
use crate::rep::Rep;
use crate::serial::SerialValue;
use crate::typed::TypedValue;

pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub(crate) fn decode_base64(rep: Rep, text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| RowwireError::mismatch(rep, "base64 text", format!("string ({e})")))
}

/// Verify that `value` has the serial shape `rep` mandates.
pub fn check_serial_shape(rep: Rep, value: &SerialValue) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    let rep = rep.non_primitive();
    let expected = match rep {
        Rep::Object | Rep::Null => return Err(RowwireError::unsupported(rep, value.shape())),
        Rep::Boolean => ("a bool", matches!(value, SerialValue::Bool(_))),
        r if r.is_integral() => ("an integer", matches!(value, SerialValue::Integer(_))),
        Rep::Float | Rep::Double => (
            "a number",
            matches!(value, SerialValue::Integer(_) | SerialValue::Float(_)),
        ),
        Rep::Number => (
            "a number",
            matches!(value, SerialValue::Integer(_) | SerialValue::Float(_) | SerialValue::Decimal(_)),
        ),
        Rep::Character => (
            "a single character",
            matches!(value, SerialValue::String(s) if s.chars().count() == 1),
        ),
        Rep::String => ("a string", matches!(value, SerialValue::String(_))),
        Rep::ByteString => ("base64 text", matches!(value, SerialValue::String(_))),
        _ => ("a list", matches!(value, SerialValue::List(_))),
    };
    match expected {
        (_, true) => Ok(()),
        (what, false) => Err(RowwireError::mismatch(rep, what, value.shape())),
    }
}

// ---- local -> serial ----

/// Serial form of a local value under `rep`. Array elements use `component`,
/// or their own deduced tag when no component is known.
pub fn local_to_serial(rep: Rep, component: Option<Rep>, value: &LocalValue) -> Result<SerialValue> {
    if value.is_null() {
        return Ok(SerialValue::Null);
    }
    let serial = match (rep.non_primitive(), value) {
        (Rep::Object | Rep::Null, _) => return Err(RowwireError::unsupported(rep, value.shape())),
        (Rep::ByteString, LocalValue::Bytes(bytes)) => SerialValue::String(encode_base64(bytes)),
        (Rep::ByteString, other) => {
            return Err(RowwireError::mismatch(rep, "bytes", other.shape()));
        }
        (Rep::Array, LocalValue::List(items)) => SerialValue::List(
            items.iter().map(|item| element_to_serial(component, item)).collect::<Result<_>>()?,
        ),
        (Rep::Array, LocalValue::Array(array)) => {
            let component = component.or(Some(array.component().rep()));
            SerialValue::List(
                array
                    .elements()
                    .iter()
                    .map(|item| element_to_serial(component, item))
                    .collect::<Result<_>>()?,
            )
        }
        (Rep::Array, other) => return Err(RowwireError::mismatch(rep, "a list", other.shape())),
        (Rep::Struct, LocalValue::List(_) | LocalValue::Record(_) | LocalValue::Struct(_)) => SerialValue::List(
            (0..value.width().unwrap_or_default())
                .filter_map(|index| value.field(index))
                .map(field_to_serial)
                .collect::<Result<_>>()?,
        ),
        (Rep::Struct, other) => return Err(RowwireError::mismatch(rep, "a record", other.shape())),
        (_, other) => plain_local_to_serial(other)?,
    };
    check_serial_shape(rep, &serial)?;
    Ok(serial)
}

fn element_to_serial(component: Option<Rep>, item: &LocalValue) -> Result<SerialValue> {
    let rep = component.unwrap_or_else(|| Rep::of_local(item));
    match rep {
        Rep::Null | Rep::Object => plain_local_to_serial(item),
        // Nested arrays keep their own element tag.
        Rep::Array if !item.is_null() => {
            Ok(SerialValue::Typed(Box::new(TypedValue::from_local(Rep::Array, item.clone())?)))
        }
        rep => local_to_serial(rep, None, item),
    }
}

/// Struct fields carry their own tag so that widths survive JSON and the wire.
fn field_to_serial(field: &LocalValue) -> Result<SerialValue> {
    Ok(match field {
        LocalValue::Null => SerialValue::Null,
        other => SerialValue::Typed(Box::new(TypedValue::from_local(Rep::of_local(other), other.clone())?)),
    })
}

/// Serial form without a tag: each variant maps to its natural JSON shape.
pub fn plain_local_to_serial(value: &LocalValue) -> Result<SerialValue> {
    Ok(match value {
        LocalValue::Null => SerialValue::Null,
        LocalValue::Bool(b) => SerialValue::Bool(*b),
        LocalValue::Byte(_) | LocalValue::Short(_) | LocalValue::Int(_) | LocalValue::Long(_) => {
            SerialValue::Integer(value.as_i64().unwrap_or_default())
        }
        LocalValue::Float(f) => SerialValue::Float(*f as f64),
        LocalValue::Double(f) => SerialValue::Float(*f),
        LocalValue::Decimal(d) => SerialValue::Decimal(d.clone()),
        LocalValue::Char(c) => SerialValue::String(c.to_string()),
        LocalValue::String(s) => SerialValue::String(s.clone()),
        LocalValue::Bytes(b) => SerialValue::String(encode_base64(b)),
        LocalValue::List(items) => {
            SerialValue::List(items.iter().map(plain_local_to_serial).collect::<Result<_>>()?)
        }
        LocalValue::Record(fields) => SerialValue::List(
            fields.iter().map(|(_, v)| plain_local_to_serial(v)).collect::<Result<_>>()?,
        ),
        LocalValue::Struct(s) => {
            SerialValue::List(s.attributes().iter().map(plain_local_to_serial).collect::<Result<_>>()?)
        }
        LocalValue::Array(a) => local_to_serial(Rep::Array, None, &LocalValue::Array(a.clone()))?,
    })
}

// ---- serial -> local ----

fn integral(rep: Rep, value: &SerialValue) -> Result<i64> {
    value.as_i64().ok_or_else(|| RowwireError::mismatch(rep, "a number", value.shape()))
}

fn floating(rep: Rep, value: &SerialValue) -> Result<f64> {
    value.as_f64().ok_or_else(|| RowwireError::mismatch(rep, "a number", value.shape()))
}

/// Local form of a serial value under `rep`. Numbers are cast to the width
/// the tag names; byte strings are decoded from base64.
pub fn serial_to_local(rep: Rep, component: Option<Rep>, value: &SerialValue) -> Result<LocalValue> {
    match value {
        SerialValue::Null => return Ok(LocalValue::Null),
        SerialValue::Typed(tv) => return tv.to_local(),
        _ => {}
    }
    Ok(match rep.non_primitive() {
        Rep::Object | Rep::Null => return Err(RowwireError::unsupported(rep, value.shape())),
        Rep::Boolean => match value {
            SerialValue::Bool(b) => LocalValue::Bool(*b),
            other => return Err(RowwireError::mismatch(rep, "a bool", other.shape())),
        },
        Rep::Byte => LocalValue::Byte(integral(rep, value)? as i8),
        Rep::Short => LocalValue::Short(integral(rep, value)? as i16),
        Rep::Integer | Rep::SqlDate | Rep::SqlTime | Rep::InstantTime => {
            LocalValue::Int(integral(rep, value)? as i32)
        }
        Rep::Long | Rep::SqlTimestamp | Rep::UtilDate | Rep::InstantTimestamp => {
            LocalValue::Long(integral(rep, value)?)
        }
        Rep::Float => LocalValue::Float(floating(rep, value)? as f32),
        Rep::Double => LocalValue::Double(floating(rep, value)?),
        Rep::Number => LocalValue::Decimal(value.as_decimal(rep)?),
        Rep::Character => match value {
            SerialValue::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => LocalValue::Char(c),
                    _ => return Err(RowwireError::mismatch(rep, "a single character", "string")),
                }
            }
            other => return Err(RowwireError::mismatch(rep, "a single character", other.shape())),
        },
        Rep::String => match value {
            SerialValue::String(s) => LocalValue::String(s.clone()),
            other => return Err(RowwireError::mismatch(rep, "a string", other.shape())),
        },
        Rep::ByteString => match value {
            SerialValue::String(s) => LocalValue::Bytes(decode_base64(rep, s)?),
            other => return Err(RowwireError::mismatch(rep, "base64 text", other.shape())),
        },
        Rep::Array => match value {
            SerialValue::List(items) => LocalValue::List(
                items
                    .iter()
                    .map(|item| match component {
                        Some(c) if !matches!(c, Rep::Object | Rep::Null) => serial_to_local(c, None, item),
                        _ => Ok(plain_serial_to_local(item)?),
                    })
                    .collect::<Result<_>>()?,
            ),
            other => return Err(RowwireError::mismatch(rep, "a list", other.shape())),
        },
        Rep::Struct => match value {
            SerialValue::List(items) => LocalValue::Struct(StructValue::from_values(
                items.iter().map(plain_serial_to_local).collect::<Result<_>>()?,
            )),
            other => return Err(RowwireError::mismatch(rep, "a list", other.shape())),
        },
        // Primitive tags were boxed above.
        _ => return Err(RowwireError::unsupported(rep, value.shape())),
    })
}

/// Local form without a tag: integers widen to long, floats to double.
pub fn plain_serial_to_local(value: &SerialValue) -> Result<LocalValue> {
    Ok(match value {
        SerialValue::Null => LocalValue::Null,
        SerialValue::Bool(b) => LocalValue::Bool(*b),
        SerialValue::Integer(i) => LocalValue::Long(*i),
        SerialValue::Float(f) => LocalValue::Double(*f),
        SerialValue::Decimal(d) => LocalValue::Decimal(d.clone()),
        SerialValue::String(s) => LocalValue::String(s.clone()),
        SerialValue::List(items) => {
            LocalValue::List(items.iter().map(plain_serial_to_local).collect::<Result<_>>()?)
        }
        SerialValue::Typed(tv) => tv.to_local()?,
    })
}

// ---- client <-> serial ----

/// Serial form of a client value. Date, time and timestamp instants are
/// moved from the civil calendar in `zone` to unix day/millis counts.
pub fn client_to_serial(rep: Rep, value: &ClientValue, zone: Option<&Zone>) -> Result<SerialValue> {
    if value.is_null() {
        return Ok(SerialValue::Null);
    }
    let rep = rep.non_primitive();
    if rep.is_temporal() {
        if let Some(millis) = value.instant_millis() {
            let count = match rep {
                Rep::SqlDate => civil_millis_to_unix_date(millis, zone) as i64,
                Rep::SqlTime => civil_millis_to_unix_time(millis, zone) as i64,
                Rep::InstantTime => floor_mod(millis, MILLIS_PER_DAY),
                Rep::InstantTimestamp => millis,
                _ => civil_millis_to_unix_timestamp(millis, zone),
            };
            return Ok(SerialValue::Integer(count));
        }
    }
    match value {
        ClientValue::Array(array) => {
            if rep != Rep::Array {
                return Err(RowwireError::mismatch(rep, "a scalar", "array"));
            }
            let component = array.component().rep().non_primitive();
            let items = array
                .client_values()?
                .iter()
                .map(|item| match component {
                    Rep::Object | Rep::Null => client_to_serial(Rep::of_client(item), item, zone),
                    c => client_to_serial(c, item, zone),
                })
                .collect::<Result<_>>()?;
            Ok(SerialValue::List(items))
        }
        other => match client_to_local(other) {
            Some(local) => local_to_serial(rep, None, &local),
            None => Err(RowwireError::mismatch(rep, "a non-temporal value", other.shape())),
        },
    }
}

/// Client form of a serial value. Date, time and timestamp counts become
/// civil-calendar instants in `zone`; arrays become [`ArrayValue`]s whose
/// elements are read back through `zone`.
pub fn serial_to_client(
    rep: Rep,
    component: Option<Rep>,
    value: &SerialValue,
    zone: Option<&Zone>,
) -> Result<ClientValue> {
    match value {
        SerialValue::Null => return Ok(ClientValue::Null),
        SerialValue::Typed(tv) => return tv.to_client_value(zone),
        _ => {}
    }
    let rep = rep.non_primitive();
    Ok(match rep {
        Rep::SqlDate => {
            let date = integral(rep, value)? as i32;
            ClientValue::Date(SqlDate(unix_date_to_civil_millis(date, zone)))
        }
        Rep::SqlTime => {
            let time = integral(rep, value)? as i32;
            ClientValue::Time(SqlTime(unix_time_to_civil_millis(time, zone)))
        }
        Rep::SqlTimestamp | Rep::UtilDate => {
            let ts = integral(rep, value)?;
            ClientValue::Timestamp(SqlTimestamp::from_millis(unix_timestamp_to_civil_millis(ts, zone)))
        }
        Rep::InstantTime => ClientValue::Time(SqlTime(integral(rep, value)?)),
        Rep::InstantTimestamp => ClientValue::Timestamp(SqlTimestamp::from_millis(integral(rep, value)?)),
        Rep::Array => {
            let component = component.unwrap_or(Rep::Object);
            let LocalValue::List(elements) = serial_to_local(rep, Some(component), value)? else {
                return Err(RowwireError::mismatch(rep, "a list", value.shape()));
            };
            ClientValue::Array(ArrayValue::new(ColumnType::scalar(component), elements, zone.copied()))
        }
        _ => local_to_client(serial_to_local(rep, component, value)?),
    })
}

/// Client form of a local value that needs no zone. Temporal counts stay numbers.
pub fn local_to_client(value: LocalValue) -> ClientValue {
    match value {
        LocalValue::Null => ClientValue::Null,
        LocalValue::Bool(v) => ClientValue::Bool(v),
        LocalValue::Byte(v) => ClientValue::Byte(v),
        LocalValue::Short(v) => ClientValue::Short(v),
        LocalValue::Int(v) => ClientValue::Int(v),
        LocalValue::Long(v) => ClientValue::Long(v),
        LocalValue::Float(v) => ClientValue::Float(v),
        LocalValue::Double(v) => ClientValue::Double(v),
        LocalValue::Decimal(v) => ClientValue::Decimal(v),
        LocalValue::Char(v) => ClientValue::Char(v),
        LocalValue::String(v) => ClientValue::String(v),
        LocalValue::Bytes(v) => ClientValue::Bytes(v),
        LocalValue::List(items) => {
            let component = items
                .iter()
                .find(|item| !item.is_null())
                .map_or(Rep::Object, Rep::of_local);
            ClientValue::Array(ArrayValue::new(ColumnType::scalar(component), items, None))
        }
        LocalValue::Record(fields) => ClientValue::Struct(StructValue::from_fields(fields)),
        LocalValue::Struct(s) => ClientValue::Struct(s),
        LocalValue::Array(a) => ClientValue::Array(a),
    }
}

/// Local form of a client value, or `None` for instants, which need a zone.
pub fn client_to_local(value: &ClientValue) -> Option<LocalValue> {
    Some(match value {
        ClientValue::Null => LocalValue::Null,
        ClientValue::Bool(v) => LocalValue::Bool(*v),
        ClientValue::Byte(v) => LocalValue::Byte(*v),
        ClientValue::Short(v) => LocalValue::Short(*v),
        ClientValue::Int(v) => LocalValue::Int(*v),
        ClientValue::Long(v) => LocalValue::Long(*v),
        ClientValue::Float(v) => LocalValue::Float(*v),
        ClientValue::Double(v) => LocalValue::Double(*v),
        ClientValue::Decimal(v) => LocalValue::Decimal(v.clone()),
        ClientValue::Char(v) => LocalValue::Char(*v),
        ClientValue::String(v) => LocalValue::String(v.clone()),
        ClientValue::Bytes(v) => LocalValue::Bytes(v.clone()),
        ClientValue::Array(a) => LocalValue::Array(a.clone()),
        ClientValue::Struct(s) => LocalValue::Struct(s.clone()),
        ClientValue::Date(_) | ClientValue::Time(_) | ClientValue::Timestamp(_) => return None,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    #[test]
    fn bytes_travel_as_base64() {
        let serial = local_to_serial(Rep::ByteString, None, &LocalValue::Bytes(b"hi!".to_vec())).unwrap();
        assert_eq!(serial, SerialValue::String("aGkh".into()));
        let back = serial_to_local(Rep::ByteString, None, &serial).unwrap();
        assert_eq!(back, LocalValue::Bytes(b"hi!".to_vec()));
    }

    #[test]
    fn numbers_narrow_to_the_tag_width() {
        let serial = SerialValue::Integer(300);
        assert_eq!(serial_to_local(Rep::Byte, None, &serial).unwrap(), LocalValue::Byte(44));
        assert_eq!(serial_to_local(Rep::PrimitiveShort, None, &serial).unwrap(), LocalValue::Short(300));
        assert_eq!(serial_to_local(Rep::Float, None, &serial).unwrap(), LocalValue::Float(300.0));
        assert_eq!(
            serial_to_local(Rep::Number, None, &serial).unwrap(),
            LocalValue::Decimal(BigDecimal::from(300))
        );
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = serial_to_local(Rep::Integer, None, &SerialValue::String("x".into())).unwrap_err();
        assert_eq!(err.to_string(), "INTEGER expects a number, got string");

        let err = local_to_serial(Rep::Integer, None, &LocalValue::Double(2.5)).unwrap_err();
        assert_eq!(err.to_string(), "INTEGER expects an integer, got float");
    }

    #[test]
    fn object_tag_only_holds_null() {
        assert_eq!(local_to_serial(Rep::Object, None, &LocalValue::Null).unwrap(), SerialValue::Null);
        let err = local_to_serial(Rep::Object, None, &LocalValue::Int(1)).unwrap_err();
        assert!(err.to_string().starts_with("no conversion defined for OBJECT"));
    }

    #[test]
    fn array_elements_use_component_tag() {
        let local = LocalValue::List(vec![LocalValue::Int(1), LocalValue::Null, LocalValue::Int(3)]);
        let serial = local_to_serial(Rep::Array, Some(Rep::Integer), &local).unwrap();
        assert_eq!(
            serial,
            SerialValue::List(vec![SerialValue::Integer(1), SerialValue::Null, SerialValue::Integer(3)])
        );
        assert_eq!(serial_to_local(Rep::Array, Some(Rep::Integer), &serial).unwrap(), local);
    }

    #[test]
    fn dates_shift_through_the_zone() {
        let zone = Zone::Fixed(-3_600_000);
        let client = serial_to_client(Rep::SqlDate, None, &SerialValue::Integer(1), Some(&zone)).unwrap();
        assert_eq!(client, ClientValue::Date(SqlDate(MILLIS_PER_DAY + 3_600_000)));
        assert_eq!(client_to_serial(Rep::SqlDate, &client, Some(&zone)).unwrap(), SerialValue::Integer(1));
    }

    #[test]
    fn instants_ignore_the_zone() {
        let zone = Zone::Fixed(19_800_000);
        let client = serial_to_client(Rep::InstantTimestamp, None, &SerialValue::Integer(5), Some(&zone)).unwrap();
        assert_eq!(client, ClientValue::Timestamp(SqlTimestamp::from_millis(5)));
        assert_eq!(
            client_to_serial(Rep::InstantTimestamp, &client, Some(&zone)).unwrap(),
            SerialValue::Integer(5)
        );
    }

    #[test]
    fn decimal_text_is_accepted_for_number() {
        let local = serial_to_local(Rep::Number, None, &SerialValue::String("1e3".into())).unwrap();
        assert_eq!(local, LocalValue::Decimal(BigDecimal::from_str("1000").unwrap()));
    }
}
