//! Array and record values held by a single column.

mod array;
mod record;

use rowwire_calendar::Zone;

pub use array::ArrayValue;
pub use record::StructValue;

use crate::column::ColumnType;
use crate::cursor::ResultSet;
use crate::local::LocalValue;

/// Builds the array values handed out by array accessors.
pub trait ArrayFactory: Send + Sync {
    fn create_array(&self, component: ColumnType, elements: Vec<LocalValue>) -> ArrayValue;

    /// Tabular view of `elements`: one `(INDEX, VALUE)` row per element,
    /// with 1-based indices.
    fn create_result_set(&self, component: ColumnType, elements: Vec<LocalValue>) -> ResultSet {
        self.create_array(component, elements).result_set()
    }
}

/// Array factory whose arrays read temporal elements in a fixed zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultArrayFactory {
    zone: Option<Zone>,
}

impl DefaultArrayFactory {
    pub fn new(zone: Option<Zone>) -> Self {
        Self { zone }
    }
}

impl ArrayFactory for DefaultArrayFactory {
    fn create_array(&self, component: ColumnType, elements: Vec<LocalValue>) -> ArrayValue {
        ArrayValue::new(component, elements, self.zone)
    }
}
