use rowwire_calendar::Zone;

use crate::client::ClientValue;
use crate::column::ColumnMetaData;
use crate::cursor::{Cursor, ListRows};
use crate::error::{Result, RowwireError};
use crate::local::LocalValue;
use crate::rep::Rep;

/// Fixed-arity record. Fields are positional; names are optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    names: Option<Vec<String>>,
    values: Vec<LocalValue>,
}

impl StructValue {
    /// Record from a plain ordered value list.
    pub fn from_values(values: Vec<LocalValue>) -> Self {
        Self { names: None, values }
    }

    /// Record from a positional carrier of named fields.
    pub fn from_fields(fields: Vec<(String, LocalValue)>) -> Self {
        let (names, values) = fields.into_iter().unzip();
        Self { names: Some(names), values }
    }

    pub fn from_struct(other: &StructValue) -> Self {
        other.clone()
    }

    /// Name the fields after `fields` when the record has no names yet and
    /// the arity matches.
    pub fn with_fields(mut self, fields: &[ColumnMetaData]) -> Self {
        if self.names.is_none() && !fields.is_empty() && fields.len() == self.values.len() {
            self.names = Some(fields.iter().map(|f| f.name.clone()).collect());
        }
        self
    }

    pub fn attributes(&self) -> &[LocalValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Result<&LocalValue> {
        self.values.get(index).ok_or(RowwireError::Column { index, count: self.values.len() })
    }

    pub fn get_by_name(&self, name: &str) -> Option<&LocalValue> {
        let index = self.names.as_ref()?.iter().position(|n| n == name)?;
        self.values.get(index)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.as_ref()?.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Client form of every field. `fields` types the attributes; when it is
    /// empty each attribute's tag is deduced from its value.
    pub fn client_attributes(&self, fields: &[ColumnMetaData], zone: Option<Zone>) -> Result<Vec<ClientValue>> {
        let columns = if fields.is_empty() {
            self.values
                .iter()
                .enumerate()
                .map(|(i, v)| ColumnMetaData::scalar(i, self.name(i).unwrap_or_default(), Rep::of_local(v)))
                .collect()
        } else {
            fields.to_vec()
        };
        let mut cursor = Cursor::new(ListRows::new(vec![self.values.clone()]));
        let accessors = cursor.create_accessors(&columns, zone, None);
        if !cursor.next()? {
            return Ok(Vec::new());
        }
        accessors.iter().map(|a| a.get_object(&cursor)).collect()
    }
}
