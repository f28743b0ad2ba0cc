use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::ClientValue;
use crate::error::{ConversionError, RowwireError};
use crate::local::LocalValue;

/// Representation tag: the logical type of a value and the shape it takes
/// locally, in serial form and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rep {
    PrimitiveBoolean,
    PrimitiveByte,
    PrimitiveChar,
    PrimitiveShort,
    PrimitiveInt,
    PrimitiveLong,
    PrimitiveFloat,
    PrimitiveDouble,
    Boolean,
    Byte,
    Character,
    Short,
    Integer,
    Long,
    Float,
    Double,
    /// Milliseconds since midnight, zone-adjusted on the client side.
    SqlTime,
    /// Milliseconds since the epoch, zone-adjusted on the client side.
    SqlTimestamp,
    /// Days since the epoch, zone-adjusted on the client side.
    SqlDate,
    UtilDate,
    /// Time of day that is already an instant; never zone-adjusted.
    InstantTime,
    /// Timestamp that is already an instant; never zone-adjusted.
    InstantTimestamp,
    ByteString,
    String,
    Number,
    Array,
    Struct,
    Object,
    Null,
}

impl Rep {
    pub const ALL: [Rep; 29] = [
        Rep::PrimitiveBoolean,
        Rep::PrimitiveByte,
        Rep::PrimitiveChar,
        Rep::PrimitiveShort,
        Rep::PrimitiveInt,
        Rep::PrimitiveLong,
        Rep::PrimitiveFloat,
        Rep::PrimitiveDouble,
        Rep::Boolean,
        Rep::Byte,
        Rep::Character,
        Rep::Short,
        Rep::Integer,
        Rep::Long,
        Rep::Float,
        Rep::Double,
        Rep::SqlTime,
        Rep::SqlTimestamp,
        Rep::SqlDate,
        Rep::UtilDate,
        Rep::InstantTime,
        Rep::InstantTimestamp,
        Rep::ByteString,
        Rep::String,
        Rep::Number,
        Rep::Array,
        Rep::Struct,
        Rep::Object,
        Rep::Null,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rep::PrimitiveBoolean => "PRIMITIVE_BOOLEAN",
            Rep::PrimitiveByte => "PRIMITIVE_BYTE",
            Rep::PrimitiveChar => "PRIMITIVE_CHAR",
            Rep::PrimitiveShort => "PRIMITIVE_SHORT",
            Rep::PrimitiveInt => "PRIMITIVE_INT",
            Rep::PrimitiveLong => "PRIMITIVE_LONG",
            Rep::PrimitiveFloat => "PRIMITIVE_FLOAT",
            Rep::PrimitiveDouble => "PRIMITIVE_DOUBLE",
            Rep::Boolean => "BOOLEAN",
            Rep::Byte => "BYTE",
            Rep::Character => "CHARACTER",
            Rep::Short => "SHORT",
            Rep::Integer => "INTEGER",
            Rep::Long => "LONG",
            Rep::Float => "FLOAT",
            Rep::Double => "DOUBLE",
            Rep::SqlTime => "JAVA_SQL_TIME",
            Rep::SqlTimestamp => "JAVA_SQL_TIMESTAMP",
            Rep::SqlDate => "JAVA_SQL_DATE",
            Rep::UtilDate => "JAVA_UTIL_DATE",
            Rep::InstantTime => "TIME_WITH_LOCAL_TIME_ZONE",
            Rep::InstantTimestamp => "TIMESTAMP_WITH_LOCAL_TIME_ZONE",
            Rep::ByteString => "BYTE_STRING",
            Rep::String => "STRING",
            Rep::Number => "NUMBER",
            Rep::Array => "ARRAY",
            Rep::Struct => "STRUCT",
            Rep::Object => "OBJECT",
            Rep::Null => "NULL",
        }
    }

    /// Boxed counterpart of a primitive tag; other tags map to themselves.
    pub fn non_primitive(self) -> Rep {
        match self {
            Rep::PrimitiveBoolean => Rep::Boolean,
            Rep::PrimitiveByte => Rep::Byte,
            Rep::PrimitiveChar => Rep::Character,
            Rep::PrimitiveShort => Rep::Short,
            Rep::PrimitiveInt => Rep::Integer,
            Rep::PrimitiveLong => Rep::Long,
            Rep::PrimitiveFloat => Rep::Float,
            Rep::PrimitiveDouble => Rep::Double,
            other => other,
        }
    }

    pub fn is_primitive(self) -> bool {
        self.non_primitive() != self
    }

    /// Tags whose serial form is an integer count (days, millis, or a plain integer).
    pub fn is_integral(self) -> bool {
        matches!(
            self.non_primitive(),
            Rep::Byte
                | Rep::Short
                | Rep::Integer
                | Rep::Long
                | Rep::SqlTime
                | Rep::SqlTimestamp
                | Rep::SqlDate
                | Rep::UtilDate
                | Rep::InstantTime
                | Rep::InstantTimestamp
        )
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            Rep::SqlTime
                | Rep::SqlTimestamp
                | Rep::SqlDate
                | Rep::UtilDate
                | Rep::InstantTime
                | Rep::InstantTimestamp
        )
    }

    /// Deduce the tag of a local value. Nulls deduce to [`Rep::Null`].
    pub fn of_local(value: &LocalValue) -> Rep {
        match value {
            LocalValue::Null => Rep::Null,
            LocalValue::Bool(_) => Rep::Boolean,
            LocalValue::Byte(_) => Rep::Byte,
            LocalValue::Short(_) => Rep::Short,
            LocalValue::Int(_) => Rep::Integer,
            LocalValue::Long(_) => Rep::Long,
            LocalValue::Float(_) => Rep::Float,
            LocalValue::Double(_) => Rep::Double,
            LocalValue::Decimal(_) => Rep::Number,
            LocalValue::Char(_) => Rep::Character,
            LocalValue::String(_) => Rep::String,
            LocalValue::Bytes(_) => Rep::ByteString,
            LocalValue::List(_) | LocalValue::Array(_) => Rep::Array,
            LocalValue::Record(_) | LocalValue::Struct(_) => Rep::Struct,
        }
    }

    /// Deduce the tag of a client value. Nulls deduce to [`Rep::Object`].
    pub fn of_client(value: &ClientValue) -> Rep {
        match value {
            ClientValue::Null => Rep::Object,
            ClientValue::Bool(_) => Rep::Boolean,
            ClientValue::Byte(_) => Rep::Byte,
            ClientValue::Short(_) => Rep::Short,
            ClientValue::Int(_) => Rep::Integer,
            ClientValue::Long(_) => Rep::Long,
            ClientValue::Float(_) => Rep::Float,
            ClientValue::Double(_) => Rep::Double,
            ClientValue::Decimal(_) => Rep::Number,
            ClientValue::Char(_) => Rep::Character,
            ClientValue::String(_) => Rep::String,
            ClientValue::Bytes(_) => Rep::ByteString,
            ClientValue::Date(_) => Rep::SqlDate,
            ClientValue::Time(_) => Rep::SqlTime,
            ClientValue::Timestamp(_) => Rep::SqlTimestamp,
            ClientValue::Array(_) => Rep::Array,
            ClientValue::Struct(_) => Rep::Struct,
        }
    }
}

impl fmt::Display for Rep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rep {
    type Err = RowwireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rep::ALL
            .iter()
            .copied()
            .find(|rep| rep.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ConversionError::UnsupportedTag { rep: Rep::Object, shape: format!("tag name '{s}'") }
                    .into()
            })
    }
}

impl Serialize for Rep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Rep {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for rep in Rep::ALL {
            assert_eq!(rep.name().parse::<Rep>().unwrap(), rep);
        }
        assert_eq!("java_sql_date".parse::<Rep>().unwrap(), Rep::SqlDate);
        assert!("DATETIME".parse::<Rep>().is_err());
    }

    #[test]
    fn primitives_box() {
        assert_eq!(Rep::PrimitiveInt.non_primitive(), Rep::Integer);
        assert_eq!(Rep::PrimitiveChar.non_primitive(), Rep::Character);
        assert_eq!(Rep::SqlDate.non_primitive(), Rep::SqlDate);
        assert!(Rep::PrimitiveDouble.is_primitive());
        assert!(!Rep::Double.is_primitive());
    }

    #[test]
    fn deduces_from_local_values() {
        assert_eq!(Rep::of_local(&LocalValue::Int(1)), Rep::Integer);
        assert_eq!(Rep::of_local(&LocalValue::Bytes(vec![1])), Rep::ByteString);
        assert_eq!(Rep::of_local(&LocalValue::List(vec![])), Rep::Array);
        assert_eq!(Rep::of_local(&LocalValue::Null), Rep::Null);
    }

    #[test]
    fn serde_uses_upper_case_names() {
        let json = serde_json::to_string(&Rep::InstantTimestamp).unwrap();
        assert_eq!(json, "\"TIMESTAMP_WITH_LOCAL_TIME_ZONE\"");
        let back: Rep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rep::InstantTimestamp);
    }
}
