use serde::{Deserialize, Serialize};

use crate::error::{Result, RowwireError};
use crate::rep::Rep;

/// Type of a column: a scalar tag, an array of some element type, or a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnType {
    Scalar {
        rep: Rep,
    },
    Array {
        component: Box<ColumnType>,
    },
    Struct {
        fields: Vec<ColumnMetaData>,
    },
}

impl ColumnType {
    pub fn scalar(rep: Rep) -> Self {
        match rep {
            Rep::Array => ColumnType::Array { component: Box::new(ColumnType::scalar(Rep::Object)) },
            Rep::Struct => ColumnType::Struct { fields: Vec::new() },
            rep => ColumnType::Scalar { rep },
        }
    }

    pub fn array(component: ColumnType) -> Self {
        ColumnType::Array { component: Box::new(component) }
    }

    pub fn record(fields: Vec<ColumnMetaData>) -> Self {
        ColumnType::Struct { fields }
    }

    pub fn rep(&self) -> Rep {
        match self {
            ColumnType::Scalar { rep } => *rep,
            ColumnType::Array { .. } => Rep::Array,
            ColumnType::Struct { .. } => Rep::Struct,
        }
    }
}

/// A column as a result reader sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetaData {
    #[serde(default)]
    pub ordinal: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnMetaData {
    pub fn new(ordinal: usize, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self { ordinal, name: name.into(), column_type, nullable: true }
    }

    pub fn scalar(ordinal: usize, name: impl Into<String>, rep: Rep) -> Self {
        Self::new(ordinal, name, ColumnType::scalar(rep))
    }

    pub fn rep(&self) -> Rep {
        self.column_type.rep()
    }
}

/// Binding of requested columns to ordinals in a wider native field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    ordinals: Vec<usize>,
}

impl Projection {
    /// Native ordinal of each requested name, in request order.
    pub fn deduce<S: AsRef<str>>(requested: &[S], native: &[ColumnMetaData]) -> Result<Projection> {
        let ordinals = requested
            .iter()
            .map(|name| {
                let name = name.as_ref();
                native
                    .iter()
                    .position(|c| c.name == name)
                    .ok_or_else(|| RowwireError::UnknownField(name.to_string()))
            })
            .collect::<Result<_>>()?;
        Ok(Projection { ordinals })
    }

    /// Projection that keeps every native field in place.
    pub fn identity(width: usize) -> Projection {
        Projection { ordinals: (0..width).collect() }
    }

    pub fn ordinals(&self) -> &[usize] {
        &self.ordinals
    }

    /// The native columns this projection selects, renumbered from zero.
    pub fn columns(&self, native: &[ColumnMetaData]) -> Vec<ColumnMetaData> {
        self.ordinals
            .iter()
            .enumerate()
            .filter_map(|(i, &ordinal)| {
                native.get(ordinal).map(|c| ColumnMetaData { ordinal: i, ..c.clone() })
            })
            .collect()
    }
}
