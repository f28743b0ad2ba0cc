use std::collections::BTreeMap;

use rowwire_calendar::{parse_date, parse_time, parse_timestamp};

use crate::column::{ColumnMetaData, ColumnType};
use crate::convert::serial_to_local;
use crate::error::{Result, RowwireError};
use crate::local::LocalValue;
use crate::rep::Rep;
use crate::serial::SerialValue;

/// How a row source lays out its rows, and so how columns are read from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// Rows are lists, records or structs; column *i* is field *i*.
    Positional,
    /// Rows are records; columns are read by name.
    Keyed,
    /// Each row is a single value.
    Single,
}

/// Supplier of rows for a [`Cursor`](super::Cursor).
///
/// `next_row` may block; `close` must release whatever the source holds and
/// may be called more than once.
pub trait RowSource {
    fn next_row(&mut self) -> Result<Option<LocalValue>>;

    fn close(&mut self) {}

    fn shape(&self) -> RowShape {
        RowShape::Positional
    }
}

/// Rows given as ordered value lists.
pub struct ListRows {
    rows: std::vec::IntoIter<Vec<LocalValue>>,
}

impl ListRows {
    pub fn new(rows: Vec<Vec<LocalValue>>) -> Self {
        Self { rows: rows.into_iter() }
    }
}

impl RowSource for ListRows {
    fn next_row(&mut self) -> Result<Option<LocalValue>> {
        Ok(self.rows.next().map(LocalValue::List))
    }

    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }
}

/// Rows given as positional carriers of named fields.
pub struct RecordRows {
    rows: std::vec::IntoIter<Vec<(String, LocalValue)>>,
}

impl RecordRows {
    pub fn new(rows: Vec<Vec<(String, LocalValue)>>) -> Self {
        Self { rows: rows.into_iter() }
    }
}

impl RowSource for RecordRows {
    fn next_row(&mut self) -> Result<Option<LocalValue>> {
        Ok(self.rows.next().map(LocalValue::Record))
    }

    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }
}

/// Rows given as maps, read by column name. Absent keys read as null.
pub struct MapRows {
    rows: std::vec::IntoIter<BTreeMap<String, LocalValue>>,
}

impl MapRows {
    pub fn new(rows: Vec<BTreeMap<String, LocalValue>>) -> Self {
        Self { rows: rows.into_iter() }
    }
}

impl RowSource for MapRows {
    fn next_row(&mut self) -> Result<Option<LocalValue>> {
        Ok(self.rows.next().map(|row| LocalValue::Record(row.into_iter().collect())))
    }

    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }

    fn shape(&self) -> RowShape {
        RowShape::Keyed
    }
}

/// One value per row.
pub struct SingleValueRows {
    rows: std::vec::IntoIter<LocalValue>,
}

impl SingleValueRows {
    pub fn new(values: Vec<LocalValue>) -> Self {
        Self { rows: values.into_iter() }
    }
}

impl RowSource for SingleValueRows {
    fn next_row(&mut self) -> Result<Option<LocalValue>> {
        Ok(self.rows.next())
    }

    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }

    fn shape(&self) -> RowShape {
        RowShape::Single
    }
}

/// Adapts any iterator of rows with a declared shape.
pub struct IteratorRows<I> {
    rows: Option<I>,
    shape: RowShape,
}

impl<I: Iterator<Item = LocalValue>> IteratorRows<I> {
    pub fn new(rows: I, shape: RowShape) -> Self {
        Self { rows: Some(rows), shape }
    }
}

impl<I: Iterator<Item = LocalValue>> RowSource for IteratorRows<I> {
    fn next_row(&mut self) -> Result<Option<LocalValue>> {
        Ok(self.rows.as_mut().and_then(Iterator::next))
    }

    fn close(&mut self) {
        self.rows = None;
    }

    fn shape(&self) -> RowShape {
        self.shape
    }
}

/// JSON rows decoded against a column list.
///
/// Objects are read by column name, arrays by position. Each row becomes a
/// record named after the columns.
pub struct JsonRows {
    rows: std::vec::IntoIter<serde_json::Value>,
    columns: Vec<ColumnMetaData>,
    read: usize,
}

impl JsonRows {
    pub fn new(rows: Vec<serde_json::Value>, columns: Vec<ColumnMetaData>) -> Self {
        Self { rows: rows.into_iter(), columns, read: 0 }
    }

    /// Parse a JSON array of rows.
    pub fn parse(text: &str, columns: Vec<ColumnMetaData>) -> Result<Self> {
        let rows: Vec<serde_json::Value> = serde_json::from_str(text)?;
        Ok(Self::new(rows, columns))
    }

    fn decode(&self, row: &serde_json::Value) -> Result<LocalValue> {
        let mut fields = Vec::with_capacity(self.columns.len());
        for (i, column) in self.columns.iter().enumerate() {
            let raw = match row {
                serde_json::Value::Object(map) => map.get(&column.name),
                serde_json::Value::Array(items) => items.get(i),
                other => {
                    return Err(RowwireError::mismatch(column.rep(), "a JSON object or array", json_shape(other)));
                }
            };
            let value = match raw {
                None | Some(serde_json::Value::Null) => LocalValue::Null,
                Some(serde_json::Value::String(text)) if column.rep().is_temporal() => {
                    temporal_from_text(column.rep(), text)
                        .map_err(|e| e.with_context(format!("column '{}'", column.name)))?
                }
                Some(json) => {
                    let component = match &column.column_type {
                        ColumnType::Array { component } => Some(component.rep()),
                        _ => None,
                    };
                    serial_to_local(column.rep(), component, &SerialValue::from_json(json)?)
                        .map_err(|e| e.with_context(format!("column '{}'", column.name)))?
                }
            };
            fields.push((column.name.clone(), value));
        }
        Ok(LocalValue::Record(fields))
    }
}

/// Dates, times and timestamps may be written as text in JSON rows.
fn temporal_from_text(rep: Rep, text: &str) -> Result<LocalValue> {
    Ok(match rep {
        Rep::SqlDate => LocalValue::Int(parse_date(text)?),
        Rep::SqlTime | Rep::InstantTime => LocalValue::Int(parse_time(text, 3)?),
        _ => LocalValue::Long(parse_timestamp(text, 3)?),
    })
}

fn json_shape(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl RowSource for JsonRows {
    fn next_row(&mut self) -> Result<Option<LocalValue>> {
        let Some(row) = self.rows.next() else {
            return Ok(None);
        };
        self.read += 1;
        self.decode(&row).map(Some).map_err(|e| e.with_context(format!("row {}", self.read)))
    }

    fn close(&mut self) {
        self.rows = Vec::new().into_iter();
    }

    fn shape(&self) -> RowShape {
        RowShape::Keyed
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_rows_decode_against_columns() {
        let columns = vec![
            ColumnMetaData::scalar(0, "c1", Rep::Integer),
            ColumnMetaData::scalar(1, "c2", Rep::String),
        ];
        let mut rows = JsonRows::new(vec![json!({"c1": 1, "c2": "a"}), json!([null, "b"])], columns);
        assert_eq!(
            rows.next_row().unwrap(),
            Some(LocalValue::Record(vec![("c1".into(), LocalValue::Int(1)), ("c2".into(), "a".into())]))
        );
        assert_eq!(
            rows.next_row().unwrap(),
            Some(LocalValue::Record(vec![("c1".into(), LocalValue::Null), ("c2".into(), "b".into())]))
        );
        assert_eq!(rows.next_row().unwrap(), None);
    }

    #[test]
    fn json_rows_name_the_failing_row_and_column() {
        let columns = vec![ColumnMetaData::scalar(0, "c1", Rep::Integer)];
        let mut rows = JsonRows::new(vec![json!({"c1": "x"})], columns);
        let err = rows.next_row().unwrap_err();
        assert_eq!(err.to_string(), "row 1: column 'c1': INTEGER expects a number, got string");
    }

    #[test]
    fn json_rows_read_temporal_text() {
        let columns = vec![
            ColumnMetaData::scalar(0, "d", Rep::SqlDate),
            ColumnMetaData::scalar(1, "ts", Rep::SqlTimestamp),
        ];
        let mut rows = JsonRows::new(vec![json!(["1970-01-02", "1970-01-01 00:00:01.5"])], columns);
        let row = rows.next_row().unwrap().unwrap();
        assert_eq!(row.field(0), Some(&LocalValue::Int(1)));
        assert_eq!(row.field(1), Some(&LocalValue::Long(1_500)));
    }

    #[test]
    fn closed_sources_yield_nothing() {
        let mut rows = ListRows::new(vec![vec![LocalValue::Int(1)], vec![LocalValue::Int(2)]]);
        assert!(rows.next_row().unwrap().is_some());
        rows.close();
        assert_eq!(rows.next_row().unwrap(), None);

        let mut iter = IteratorRows::new((0..3).map(LocalValue::Int), RowShape::Single);
        iter.close();
        assert_eq!(iter.next_row().unwrap(), None);
    }
}
