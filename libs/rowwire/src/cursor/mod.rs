//! Pull-based iteration over rows with per-column typed readers.
//!
//! A [`Cursor`] advances over a [`RowSource`]; [`Accessor`]s are built once
//! per column list and read the cursor's current row on every call.

mod accessor;
mod getter;
mod source;

use std::cell::Cell;
use std::sync::Arc;

use rowwire_calendar::Zone;
use tracing::{debug, trace};

pub use accessor::Accessor;
pub use getter::Getter;
pub use source::{
    IteratorRows, JsonRows, ListRows, MapRows, RecordRows, RowShape, RowSource, SingleValueRows,
};

use crate::client::ClientValue;
use crate::column::{ColumnMetaData, Projection};
use crate::composite::{ArrayFactory, DefaultArrayFactory};
use crate::error::{CursorState, Result, RowwireError};
use crate::local::LocalValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPhase {
    Unopened,
    Iterating,
    Exhausted,
    Closed,
}

/// Position over a row source. Not for concurrent use.
pub struct Cursor {
    source: Box<dyn RowSource>,
    phase: CursorPhase,
    position: u64,
    current: Option<LocalValue>,
    was_null: Cell<bool>,
}

impl Cursor {
    pub fn new(source: impl RowSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            phase: CursorPhase::Unopened,
            position: 0,
            current: None,
            was_null: Cell::new(false),
        }
    }

    /// Advance to the next row. Returns `false` once the source runs dry,
    /// and keeps returning `false` after that.
    pub fn next(&mut self) -> Result<bool> {
        match self.phase {
            CursorPhase::Closed => return Err(CursorState::Closed.into()),
            CursorPhase::Exhausted => return Ok(false),
            CursorPhase::Unopened | CursorPhase::Iterating => {}
        }
        match self.source.next_row()? {
            Some(row) => {
                self.position += 1;
                self.current = Some(row);
                self.phase = CursorPhase::Iterating;
                trace!(position = self.position, "cursor advanced");
                Ok(true)
            }
            None => {
                self.current = None;
                self.phase = CursorPhase::Exhausted;
                trace!(rows = self.position, "cursor exhausted");
                Ok(false)
            }
        }
    }

    /// Release the row source. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.phase == CursorPhase::Closed {
            return;
        }
        self.source.close();
        self.current = None;
        self.phase = CursorPhase::Closed;
        debug!(rows = self.position, "cursor closed");
    }

    pub fn state(&self) -> CursorPhase {
        self.phase
    }

    /// 1-based number of the current row; 0 before the first row.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the most recently read column value was null.
    pub fn was_null(&self) -> bool {
        self.was_null.get()
    }

    pub(crate) fn row(&self) -> Result<&LocalValue> {
        match (self.phase, &self.current) {
            (CursorPhase::Iterating, Some(row)) => Ok(row),
            (CursorPhase::Unopened, _) => Err(CursorState::NotPositioned.into()),
            (CursorPhase::Closed, _) => Err(CursorState::Closed.into()),
            _ => Err(CursorState::Exhausted.into()),
        }
    }

    pub(crate) fn set_was_null(&self, was_null: bool) {
        self.was_null.set(was_null);
    }

    /// One accessor per column, bound by position in `columns` (or by name
    /// for keyed sources). Temporal columns read through `zone`; array
    /// columns build their values with `factory`.
    pub fn create_accessors(
        &self,
        columns: &[ColumnMetaData],
        zone: Option<Zone>,
        factory: Option<Arc<dyn ArrayFactory>>,
    ) -> Vec<Accessor> {
        let shape = self.source.shape();
        let accessors = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let getter = match shape {
                    RowShape::Positional => Getter::Position(i),
                    RowShape::Keyed => Getter::Field(column.name.clone()),
                    RowShape::Single => Getter::Row,
                };
                Accessor::new(column.clone(), getter, zone, factory_or_default(&factory, zone))
            })
            .collect::<Vec<_>>();
        debug!(columns = accessors.len(), ?shape, "accessors created");
        accessors
    }

    /// Accessors for the columns `projection` selects out of `native`.
    /// Positional rows are read at the native ordinal, keyed rows by the
    /// native column's name.
    pub fn create_projected_accessors(
        &self,
        projection: &Projection,
        native: &[ColumnMetaData],
        zone: Option<Zone>,
        factory: Option<Arc<dyn ArrayFactory>>,
    ) -> Vec<Accessor> {
        let shape = self.source.shape();
        let accessors = projection
            .ordinals()
            .iter()
            .filter_map(|&ordinal| native.get(ordinal).map(|column| (ordinal, column)))
            .enumerate()
            .map(|(i, (ordinal, column))| {
                let getter = match shape {
                    RowShape::Keyed => Getter::Field(column.name.clone()),
                    RowShape::Positional | RowShape::Single => Getter::Position(ordinal),
                };
                let column = ColumnMetaData { ordinal: i, ..column.clone() };
                Accessor::new(column, getter, zone, factory_or_default(&factory, zone))
            })
            .collect::<Vec<_>>();
        debug!(columns = accessors.len(), native = native.len(), ?shape, "projected accessors created");
        accessors
    }
}

fn factory_or_default(factory: &Option<Arc<dyn ArrayFactory>>, zone: Option<Zone>) -> Arc<dyn ArrayFactory> {
    match factory {
        Some(factory) => Arc::clone(factory),
        None => Arc::new(DefaultArrayFactory::new(zone)),
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.close();
    }
}

/// A cursor bundled with the accessors for its columns.
pub struct ResultSet {
    cursor: Cursor,
    columns: Vec<ColumnMetaData>,
    accessors: Vec<Accessor>,
}

impl ResultSet {
    pub fn new(
        source: impl RowSource + 'static,
        columns: Vec<ColumnMetaData>,
        zone: Option<Zone>,
        factory: Option<Arc<dyn ArrayFactory>>,
    ) -> Self {
        let cursor = Cursor::new(source);
        let accessors = cursor.create_accessors(&columns, zone, factory);
        Self { cursor, columns, accessors }
    }

    pub fn next(&mut self) -> Result<bool> {
        self.cursor.next()
    }

    pub fn close(&mut self) {
        self.cursor.close();
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn columns(&self) -> &[ColumnMetaData] {
        &self.columns
    }

    pub fn accessor(&self, index: usize) -> Result<&Accessor> {
        self.accessors
            .get(index)
            .ok_or(RowwireError::Column { index, count: self.accessors.len() })
    }

    pub fn get_object(&self, index: usize) -> Result<ClientValue> {
        self.accessor(index)?.get_object(&self.cursor)
    }

    pub fn get_string(&self, index: usize) -> Result<Option<String>> {
        self.accessor(index)?.get_string(&self.cursor)
    }

    pub fn was_null(&self) -> bool {
        self.cursor.was_null()
    }

    /// Client values of every remaining row.
    pub fn collect_rows(&mut self) -> Result<Vec<Vec<ClientValue>>> {
        let mut rows = Vec::new();
        while self.next()? {
            let row = (0..self.accessors.len()).map(|i| self.get_object(i)).collect::<Result<_>>()?;
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rep::Rep;

    fn int_rows() -> Cursor {
        Cursor::new(ListRows::new(vec![vec![LocalValue::Int(1)], vec![LocalValue::Int(2)]]))
    }

    #[test]
    fn reading_before_first_row_fails() {
        let cursor = int_rows();
        let accessors = cursor.create_accessors(&[ColumnMetaData::scalar(0, "n", Rep::Integer)], None, None);
        let err = accessors[0].get_int(&cursor).unwrap_err();
        assert!(matches!(err, RowwireError::CursorState(CursorState::NotPositioned)));
    }

    #[test]
    fn exhaustion_is_sticky() {
        let mut cursor = int_rows();
        assert!(cursor.next().unwrap());
        assert!(cursor.next().unwrap());
        assert!(!cursor.next().unwrap());
        assert!(!cursor.next().unwrap());
        assert_eq!(cursor.state(), CursorPhase::Exhausted);
        assert_eq!(cursor.position(), 2);
        assert!(matches!(cursor.row(), Err(RowwireError::CursorState(CursorState::Exhausted))));
    }

    #[test]
    fn close_is_idempotent() {
        let mut cursor = int_rows();
        assert!(cursor.next().unwrap());
        cursor.close();
        cursor.close();
        assert_eq!(cursor.state(), CursorPhase::Closed);
        assert!(matches!(cursor.next(), Err(RowwireError::CursorState(CursorState::Closed))));
        assert!(matches!(cursor.row(), Err(RowwireError::CursorState(CursorState::Closed))));
    }

    #[test]
    fn projection_reads_native_positions() {
        let native = vec![
            ColumnMetaData::scalar(0, "a", Rep::Integer),
            ColumnMetaData::scalar(1, "b", Rep::String),
            ColumnMetaData::scalar(2, "c", Rep::Boolean),
        ];
        let mut cursor = Cursor::new(ListRows::new(vec![vec![
            LocalValue::Int(7),
            "x".into(),
            LocalValue::Bool(true),
        ]]));
        let projection = Projection::deduce(&["c", "a"], &native).unwrap();
        let accessors = cursor.create_projected_accessors(&projection, &native, None, None);
        assert!(cursor.next().unwrap());
        assert_eq!(accessors[0].get_bool(&cursor).unwrap(), Some(true));
        assert_eq!(accessors[1].get_int(&cursor).unwrap(), Some(7));
        assert_eq!(accessors[0].column().name, "c");
    }

    #[test]
    fn result_set_collects_rows() {
        let mut rs = ResultSet::new(
            SingleValueRows::new(vec!["a".into(), LocalValue::Null]),
            vec![ColumnMetaData::scalar(0, "s", Rep::String)],
            None,
            None,
        );
        let rows = rs.collect_rows().unwrap();
        assert_eq!(rows, vec![vec![ClientValue::String("a".into())], vec![ClientValue::Null]]);
        assert!(rs.was_null());
    }
}
