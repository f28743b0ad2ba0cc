//! Protobuf encoding of [`TypedValue`], one message per value.

use bigdecimal::BigDecimal;
use bigdecimal::num_bigint::BigInt;
use rowwire_calendar::Zone;
use tracing::debug;

use crate::client::ClientValue;
use crate::convert::{decode_base64, encode_base64};
use crate::error::{Result, RowwireError};
use crate::local::LocalValue;
use crate::rep::Rep;
use crate::serial::SerialValue;
use crate::typed::TypedValue;

/// Wire tag numbers. BIG_INTEGER and BIG_DECIMAL exist only on the wire
/// and read back as [`Rep::Number`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum WireRep {
    PrimitiveBoolean = 0,
    PrimitiveByte = 1,
    PrimitiveChar = 2,
    PrimitiveShort = 3,
    PrimitiveInt = 4,
    PrimitiveLong = 5,
    PrimitiveFloat = 6,
    PrimitiveDouble = 7,
    Boolean = 8,
    Byte = 9,
    Character = 10,
    Short = 11,
    Integer = 12,
    Long = 13,
    Float = 14,
    Double = 15,
    JavaSqlTime = 16,
    JavaSqlTimestamp = 17,
    JavaSqlDate = 18,
    JavaUtilDate = 19,
    ByteString = 20,
    String = 21,
    Number = 22,
    Object = 23,
    Null = 24,
    BigInteger = 25,
    BigDecimal = 26,
    Array = 27,
    Struct = 28,
    Multiset = 29,
    TimeWithLocalTimeZone = 30,
    TimestampWithLocalTimeZone = 31,
}

impl From<Rep> for WireRep {
    fn from(rep: Rep) -> Self {
        match rep {
            Rep::PrimitiveBoolean => WireRep::PrimitiveBoolean,
            Rep::PrimitiveByte => WireRep::PrimitiveByte,
            Rep::PrimitiveChar => WireRep::PrimitiveChar,
            Rep::PrimitiveShort => WireRep::PrimitiveShort,
            Rep::PrimitiveInt => WireRep::PrimitiveInt,
            Rep::PrimitiveLong => WireRep::PrimitiveLong,
            Rep::PrimitiveFloat => WireRep::PrimitiveFloat,
            Rep::PrimitiveDouble => WireRep::PrimitiveDouble,
            Rep::Boolean => WireRep::Boolean,
            Rep::Byte => WireRep::Byte,
            Rep::Character => WireRep::Character,
            Rep::Short => WireRep::Short,
            Rep::Integer => WireRep::Integer,
            Rep::Long => WireRep::Long,
            Rep::Float => WireRep::Float,
            Rep::Double => WireRep::Double,
            Rep::SqlTime => WireRep::JavaSqlTime,
            Rep::SqlTimestamp => WireRep::JavaSqlTimestamp,
            Rep::SqlDate => WireRep::JavaSqlDate,
            Rep::UtilDate => WireRep::JavaUtilDate,
            Rep::InstantTime => WireRep::TimeWithLocalTimeZone,
            Rep::InstantTimestamp => WireRep::TimestampWithLocalTimeZone,
            Rep::ByteString => WireRep::ByteString,
            Rep::String => WireRep::String,
            Rep::Number => WireRep::Number,
            Rep::Array => WireRep::Array,
            Rep::Struct => WireRep::Struct,
            Rep::Object => WireRep::Object,
            Rep::Null => WireRep::Null,
        }
    }
}

impl WireRep {
    pub fn to_rep(self) -> Result<Rep> {
        Ok(match self {
            WireRep::PrimitiveBoolean => Rep::PrimitiveBoolean,
            WireRep::PrimitiveByte => Rep::PrimitiveByte,
            WireRep::PrimitiveChar => Rep::PrimitiveChar,
            WireRep::PrimitiveShort => Rep::PrimitiveShort,
            WireRep::PrimitiveInt => Rep::PrimitiveInt,
            WireRep::PrimitiveLong => Rep::PrimitiveLong,
            WireRep::PrimitiveFloat => Rep::PrimitiveFloat,
            WireRep::PrimitiveDouble => Rep::PrimitiveDouble,
            WireRep::Boolean => Rep::Boolean,
            WireRep::Byte => Rep::Byte,
            WireRep::Character => Rep::Character,
            WireRep::Short => Rep::Short,
            WireRep::Integer => Rep::Integer,
            WireRep::Long => Rep::Long,
            WireRep::Float => Rep::Float,
            WireRep::Double => Rep::Double,
            WireRep::JavaSqlTime => Rep::SqlTime,
            WireRep::JavaSqlTimestamp => Rep::SqlTimestamp,
            WireRep::JavaSqlDate => Rep::SqlDate,
            WireRep::JavaUtilDate => Rep::UtilDate,
            WireRep::TimeWithLocalTimeZone => Rep::InstantTime,
            WireRep::TimestampWithLocalTimeZone => Rep::InstantTimestamp,
            WireRep::ByteString => Rep::ByteString,
            WireRep::String => Rep::String,
            WireRep::Number | WireRep::BigInteger | WireRep::BigDecimal => Rep::Number,
            WireRep::Object => Rep::Object,
            WireRep::Null => Rep::Null,
            WireRep::Array => Rep::Array,
            WireRep::Struct => Rep::Struct,
            WireRep::Multiset => return Err(RowwireError::unsupported(Rep::Object, "MULTISET wire tag")),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            WireRep::BigInteger => "BIG_INTEGER",
            WireRep::BigDecimal => "BIG_DECIMAL",
            WireRep::Multiset => "MULTISET",
            other => other.to_rep().map_or("MULTISET", Rep::name),
        }
    }

    fn decode(raw: i32, field: &'static str) -> Result<WireRep> {
        WireRep::try_from(raw).map_err(|_| RowwireError::malformed(format!("tag {raw}"), field))
    }
}

/// One value on the wire. `string_value` also carries base64 for byte strings
/// and `number_value` the scale of a legacy decimal.
///
/// Peers following plain proto3 leave default payloads off the wire, so an
/// absent payload field reads as `0`, `""` or empty bytes.
#[derive(Clone, PartialEq, prost::Message)]
pub struct WireValue {
    #[prost(enumeration = "WireRep", tag = "1")]
    pub r#type: i32,

    #[prost(bool, tag = "2")]
    pub bool_value: bool,

    #[prost(string, optional, tag = "3")]
    pub string_value: Option<String>,

    /// Zig-zag encoded; float bits and day/millis counts also land here.
    #[prost(sint64, optional, tag = "4")]
    pub number_value: Option<i64>,

    #[prost(bytes = "vec", optional, tag = "5")]
    pub bytes_value: Option<Vec<u8>>,

    #[prost(double, tag = "6")]
    pub double_value: f64,

    #[prost(bool, tag = "7")]
    pub null: bool,

    #[prost(message, repeated, tag = "8")]
    pub array_value: Vec<WireValue>,

    #[prost(enumeration = "WireRep", tag = "9")]
    pub component_type: i32,

    /// The value was absent upstream, as opposed to an explicit null.
    #[prost(bool, tag = "10")]
    pub implicitly_null: bool,
}

impl WireValue {
    pub fn implicit_null() -> WireValue {
        WireValue { implicitly_null: true, ..WireValue::default() }
    }

    fn tagged(rep: WireRep) -> WireValue {
        WireValue { r#type: rep as i32, ..WireValue::default() }
    }

    fn null_of(rep: WireRep) -> WireValue {
        WireValue { null: true, ..WireValue::tagged(rep) }
    }
}

/// Best guess at the tag of an untagged serial value.
fn serial_rep(value: &SerialValue) -> Rep {
    match value {
        SerialValue::Null => Rep::Null,
        SerialValue::Bool(_) => Rep::Boolean,
        SerialValue::Integer(_) => Rep::Long,
        SerialValue::Float(_) => Rep::Double,
        SerialValue::Decimal(_) => Rep::Number,
        SerialValue::String(_) => Rep::String,
        SerialValue::List(_) => Rep::Array,
        SerialValue::Typed(tv) => tv.rep(),
    }
}

fn write_value(rep: Rep, component: Option<Rep>, value: &SerialValue) -> Result<WireValue> {
    let mut out = WireValue::tagged(WireRep::from(rep));
    match value {
        SerialValue::Null => {
            out.null = true;
            return Ok(out);
        }
        SerialValue::Typed(tv) => return tv.to_wire(),
        _ => {}
    }
    let mismatch = |expected| RowwireError::mismatch(rep, expected, value.shape());
    match rep.non_primitive() {
        Rep::Array => {
            let SerialValue::List(items) = value else {
                return Err(mismatch("a list"));
            };
            let component = component
                .or_else(|| items.iter().find(|item| !item.is_null()).map(serial_rep))
                .unwrap_or(Rep::Object);
            out.component_type = WireRep::from(component) as i32;
            out.array_value = items
                .iter()
                .map(|item| write_element(component, item))
                .collect::<Result<_>>()?;
        }
        Rep::Struct => {
            let SerialValue::List(fields) = value else {
                return Err(mismatch("a list"));
            };
            out.array_value = fields
                .iter()
                .map(|field| match field {
                    SerialValue::Null => Ok(WireValue::null_of(WireRep::Null)),
                    other => write_value(serial_rep(other), None, other),
                })
                .collect::<Result<_>>()?;
        }
        Rep::Number => match value {
            SerialValue::Integer(n) => out.number_value = Some(*n),
            other => {
                out.r#type = WireRep::BigDecimal as i32;
                out.string_value = Some(other.as_decimal(rep)?.to_plain_string());
            }
        },
        Rep::Boolean => match value {
            SerialValue::Bool(b) => out.bool_value = *b,
            _ => return Err(mismatch("a bool")),
        },
        Rep::Character | Rep::String => match value {
            SerialValue::String(s) => out.string_value = Some(s.clone()),
            _ => return Err(mismatch("a string")),
        },
        Rep::ByteString => match value {
            SerialValue::String(s) => {
                out.bytes_value = Some(decode_base64(rep, s)?);
                out.string_value = Some(s.clone());
            }
            _ => return Err(mismatch("base64 text")),
        },
        Rep::Float => {
            let f = value.as_f64().ok_or_else(|| mismatch("a number"))? as f32;
            out.number_value = Some(f.to_bits() as i32 as i64);
        }
        Rep::Double => out.double_value = value.as_f64().ok_or_else(|| mismatch("a number"))?,
        r if r.is_integral() => out.number_value = Some(value.as_i64().ok_or_else(|| mismatch("an integer"))?),
        _ => return Err(RowwireError::unsupported(rep, value.shape())),
    }
    Ok(out)
}

fn write_element(component: Rep, item: &SerialValue) -> Result<WireValue> {
    match item {
        SerialValue::Null => Ok(WireValue::null_of(WireRep::Null)),
        SerialValue::List(_) => write_value(Rep::Array, None, item),
        _ => write_value(component, None, item),
    }
}

fn decimal_text(text: Option<&str>, rep: WireRep) -> Result<SerialValue> {
    match text.unwrap_or_default() {
        "" => Ok(SerialValue::Decimal(BigDecimal::from(0))),
        text => text
            .parse()
            .map(SerialValue::Decimal)
            .map_err(|_| RowwireError::malformed(rep.name(), "string_value")),
    }
}

fn legacy_decimal(msg: &WireValue, scale: i64) -> SerialValue {
    let unscaled = BigInt::from_signed_bytes_be(msg.bytes_value.as_deref().unwrap_or_default());
    SerialValue::Decimal(BigDecimal::new(unscaled, scale))
}

fn read_value(msg: &WireValue) -> Result<TypedValue> {
    let wire_rep = WireRep::decode(msg.r#type, "type")?;
    let rep = wire_rep.to_rep()?;
    let component = match rep {
        Rep::Array => Some(WireRep::decode(msg.component_type, "component_type")?.to_rep()?),
        _ => None,
    };
    if msg.null {
        return Ok(TypedValue::from_parts(rep, SerialValue::Null, component));
    }
    let value = match wire_rep {
        WireRep::ByteString => match (&msg.string_value, &msg.bytes_value) {
            (Some(text), None) => {
                debug!(rep = %rep, "legacy wire value: bare base64 byte string");
                SerialValue::String(text.clone())
            }
            (_, bytes) => SerialValue::String(encode_base64(bytes.as_deref().unwrap_or_default())),
        },
        WireRep::BigDecimal => match (msg.number_value, &msg.string_value) {
            (Some(scale), _) => {
                debug!(rep = %rep, scale, "legacy wire value: decimal as unscaled bytes");
                legacy_decimal(msg, scale)
            }
            (None, text) => decimal_text(text.as_deref(), wire_rep)?,
        },
        WireRep::Number => match (msg.number_value, &msg.bytes_value) {
            (Some(scale), Some(_)) => {
                debug!(rep = %rep, scale, "legacy wire value: decimal as unscaled bytes");
                legacy_decimal(msg, scale)
            }
            (Some(n), None) => SerialValue::Integer(n),
            (None, _) => match &msg.string_value {
                Some(text) => decimal_text(Some(text.as_str()), wire_rep)?,
                None => SerialValue::Integer(0),
            },
        },
        WireRep::BigInteger => {
            let bytes = msg.bytes_value.as_deref().unwrap_or_default();
            SerialValue::Decimal(BigDecimal::from(BigInt::from_signed_bytes_be(bytes)))
        }
        WireRep::PrimitiveFloat | WireRep::Float => {
            let bits = msg.number_value.unwrap_or_default();
            SerialValue::Float(f32::from_bits(bits as i32 as u32) as f64)
        }
        WireRep::PrimitiveDouble | WireRep::Double => SerialValue::Float(msg.double_value),
        WireRep::PrimitiveBoolean | WireRep::Boolean => SerialValue::Bool(msg.bool_value),
        WireRep::PrimitiveChar | WireRep::Character | WireRep::String => {
            SerialValue::String(msg.string_value.clone().unwrap_or_default())
        }
        WireRep::Array => {
            let component = component.unwrap_or(Rep::Object);
            let items = msg
                .array_value
                .iter()
                .map(|item| {
                    let element = read_value(item)?;
                    Ok(if element.is_null() {
                        SerialValue::Null
                    } else if element.rep() == component && component != Rep::Array {
                        element.value().clone()
                    } else {
                        SerialValue::Typed(Box::new(element))
                    })
                })
                .collect::<Result<_>>()?;
            SerialValue::List(items)
        }
        WireRep::Struct => SerialValue::List(
            msg.array_value
                .iter()
                .map(|field| {
                    let field = read_value(field)?;
                    Ok(if field.is_null() { SerialValue::Null } else { SerialValue::Typed(Box::new(field)) })
                })
                .collect::<Result<_>>()?,
        ),
        WireRep::Null | WireRep::Object | WireRep::Multiset => {
            return Err(RowwireError::unsupported(rep, "non-null wire value"));
        }
        _ => {
            let n = msg.number_value.unwrap_or_default();
            SerialValue::Integer(match rep.non_primitive() {
                Rep::Byte => n as i8 as i64,
                Rep::Short => n as i16 as i64,
                Rep::Integer | Rep::SqlDate | Rep::SqlTime | Rep::InstantTime => n as i32 as i64,
                _ => n,
            })
        }
    };
    Ok(TypedValue::from_parts(rep, value, component))
}

impl TypedValue {
    pub fn to_wire(&self) -> Result<WireValue> {
        let mut out = write_value(self.rep(), self.component(), self.value())?;
        out.implicitly_null = false;
        Ok(out)
    }

    /// Decimals in the older layout: NUMBER with the unscaled value as
    /// big-endian two's-complement bytes and the scale in `number_value`.
    /// Other values are written as by [`TypedValue::to_wire`].
    pub fn to_wire_legacy(&self) -> Result<WireValue> {
        match (self.rep().non_primitive(), self.value()) {
            (Rep::Number, SerialValue::Decimal(_) | SerialValue::Float(_) | SerialValue::String(_)) => {
                let decimal = self.value().as_decimal(self.rep())?;
                let (unscaled, scale) = decimal.as_bigint_and_exponent();
                Ok(WireValue {
                    bytes_value: Some(unscaled.to_signed_bytes_be()),
                    number_value: Some(scale),
                    ..WireValue::tagged(WireRep::Number)
                })
            }
            _ => self.to_wire(),
        }
    }

    /// Decode a wire message. An implicitly-null message reads as
    /// [`TypedValue::EXPLICIT_NULL`]; use [`TypedValue::from_wire_parameter`]
    /// to tell the two apart.
    pub fn from_wire(msg: &WireValue) -> Result<TypedValue> {
        if msg.implicitly_null {
            return Ok(TypedValue::EXPLICIT_NULL);
        }
        read_value(msg)
    }

    /// Decode a wire message, returning `None` for an absent value.
    pub fn from_wire_parameter(msg: &WireValue) -> Result<Option<TypedValue>> {
        if msg.implicitly_null {
            return Ok(None);
        }
        read_value(msg).map(Some)
    }
}

/// Encode a raw row value, deducing its wire tag. Lists become arrays whose
/// component tag is that of the first non-null element.
pub fn encode_local(value: &LocalValue) -> Result<WireValue> {
    match value {
        LocalValue::Null => Ok(WireValue::null_of(WireRep::Null)),
        other => TypedValue::from_local(Rep::of_local(other), other.clone())?.to_wire(),
    }
}

/// Decode a wire message straight to client form.
pub fn wire_to_client(msg: &WireValue, zone: Option<&Zone>) -> Result<ClientValue> {
    TypedValue::from_wire(msg)?.to_client_value(zone)
}
