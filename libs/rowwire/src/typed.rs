use rowwire_calendar::Zone;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::client::ClientValue;
use crate::convert::{
    check_serial_shape, client_to_serial, local_to_serial, serial_to_client, serial_to_local,
};
use crate::error::Result;
use crate::local::LocalValue;
use crate::rep::Rep;
use crate::serial::SerialValue;

/// A value paired with its representation tag, held in serial form.
///
/// `component` names the element tag and is set only for [`Rep::Array`].
/// Equality compares the tag and the value.
#[derive(Debug, Clone)]
pub struct TypedValue {
    rep: Rep,
    value: SerialValue,
    component: Option<Rep>,
}

impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        self.rep == other.rep && self.value == other.value
    }
}

impl TypedValue {
    /// Explicit null, tagged OBJECT.
    pub const EXPLICIT_NULL: TypedValue =
        TypedValue { rep: Rep::Object, value: SerialValue::Null, component: None };

    pub fn rep(&self) -> Rep {
        self.rep
    }

    pub fn value(&self) -> &SerialValue {
        &self.value
    }

    pub fn component(&self) -> Option<Rep> {
        self.component
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Wrap a value that is already in serial shape.
    ///
    /// The shape is only checked in debug builds; a mismatch surfaces later
    /// from [`TypedValue::to_local`]. Use [`TypedValue::try_from_serial`] for
    /// values from outside the crate.
    pub fn from_serial(rep: Rep, value: SerialValue) -> TypedValue {
        debug_assert!(check_serial_shape(rep, &value).is_ok(), "{rep} given {}", value.shape());
        TypedValue { rep, value, component: None }
    }

    /// Like [`TypedValue::from_serial`], rejecting a value whose shape does
    /// not fit `rep`.
    pub fn try_from_serial(rep: Rep, value: SerialValue) -> Result<TypedValue> {
        check_serial_shape(rep, &value)?;
        Ok(TypedValue { rep, value, component: None })
    }

    /// Serial form of a local value. For arrays the element tag comes from
    /// the array wrapper, or from the first non-null element of a list.
    pub fn from_local(rep: Rep, value: LocalValue) -> Result<TypedValue> {
        let component = match (&value, rep) {
            (LocalValue::Array(array), Rep::Array) => Some(array.component().rep()),
            (LocalValue::List(items), Rep::Array) => Some(
                items
                    .iter()
                    .find(|item| !item.is_null())
                    .map_or(Rep::Object, Rep::of_local),
            ),
            _ => None,
        };
        let serial = local_to_serial(rep, component, &value)?;
        Ok(TypedValue { rep, value: serial, component })
    }

    /// Serial form of a local array with an explicit element tag.
    pub fn from_local_array(component: Rep, elements: Vec<LocalValue>) -> Result<TypedValue> {
        let serial = local_to_serial(Rep::Array, Some(component), &LocalValue::List(elements))?;
        Ok(TypedValue { rep: Rep::Array, value: serial, component: Some(component) })
    }

    /// Serial form of a client value. Temporal instants are read in `zone`.
    pub fn from_client_value(rep: Rep, value: &ClientValue, zone: Option<&Zone>) -> Result<TypedValue> {
        let component = match value {
            ClientValue::Array(array) => Some(array.component().rep()),
            _ => None,
        };
        let serial = client_to_serial(rep, value, zone)?;
        Ok(TypedValue { rep, value: serial, component })
    }

    /// Like [`TypedValue::from_client_value`], deducing the tag from the value.
    pub fn from_client_value_deduced(value: &ClientValue, zone: Option<&Zone>) -> Result<TypedValue> {
        if value.is_null() {
            return Ok(TypedValue::EXPLICIT_NULL);
        }
        TypedValue::from_client_value(Rep::of_client(value), value, zone)
    }

    pub(crate) fn from_parts(rep: Rep, value: SerialValue, component: Option<Rep>) -> TypedValue {
        TypedValue { rep, value, component }
    }

    pub fn with_component(mut self, component: Rep) -> TypedValue {
        if self.rep == Rep::Array {
            self.component = Some(component);
        }
        self
    }

    pub fn to_local(&self) -> Result<LocalValue> {
        serial_to_local(self.rep, self.component, &self.value)
    }

    /// Client form, with temporal tags placed on the civil calendar in `zone`.
    pub fn to_client_value(&self, zone: Option<&Zone>) -> Result<ClientValue> {
        serial_to_client(self.rep, self.component, &self.value, zone)
    }

    /// Local forms of a parameter list.
    pub fn values(values: &[TypedValue]) -> Result<Vec<LocalValue>> {
        values.iter().map(TypedValue::to_local).collect()
    }

    /// Read `{"type": .., "value": .., "componentType": ..}`. A null value
    /// reads as [`TypedValue::EXPLICIT_NULL`] whatever the tag.
    pub fn from_json(json: serde_json::Value) -> Result<TypedValue> {
        let raw: RawTypedValue = serde_json::from_value(json)?;
        raw.into_typed()
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Deserialize)]
struct RawTypedValue {
    #[serde(rename = "type")]
    rep: Rep,
    #[serde(default)]
    value: serde_json::Value,
    #[serde(rename = "componentType", default)]
    component: Option<Rep>,
}

impl RawTypedValue {
    fn into_typed(self) -> Result<TypedValue> {
        if self.value.is_null() {
            return Ok(TypedValue::EXPLICIT_NULL);
        }
        let serial = SerialValue::from_json(&self.value)?;
        let local = serial_to_local(self.rep, self.component, &serial)?;
        let typed = match (self.rep, self.component) {
            (Rep::Array, Some(component)) => match local {
                LocalValue::List(elements) => TypedValue::from_local_array(component, elements)?,
                other => TypedValue::from_local(Rep::Array, other)?,
            },
            (rep, _) => TypedValue::from_local(rep, local)?,
        };
        Ok(typed)
    }
}

impl Serialize for TypedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.component.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("TypedValue", len)?;
        state.serialize_field("type", &self.rep)?;
        state.serialize_field("value", &self.value)?;
        if let Some(component) = &self.component {
            state.serialize_field("componentType", component)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for TypedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawTypedValue::deserialize(deserializer)?;
        raw.into_typed().map_err(D::Error::custom)
    }
}
