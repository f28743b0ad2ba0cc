use std::sync::Arc;

use rowwire_calendar::Zone;

use super::DefaultArrayFactory;
use crate::client::ClientValue;
use crate::column::{ColumnMetaData, ColumnType};
use crate::cursor::{Accessor, Cursor, Getter, ListRows, ResultSet, SingleValueRows};
use crate::error::{Result, RowwireError};
use crate::local::LocalValue;
use crate::rep::Rep;

/// Ordered elements of one component type.
///
/// Elements stay in local form; client values are produced on demand and
/// read temporal elements in the array's zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    component: ColumnType,
    elements: Vec<LocalValue>,
    zone: Option<Zone>,
}

impl ArrayValue {
    pub fn new(component: ColumnType, elements: Vec<LocalValue>, zone: Option<Zone>) -> Self {
        Self { component, elements, zone }
    }

    pub fn component(&self) -> &ColumnType {
        &self.component
    }

    pub fn elements(&self) -> &[LocalValue] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn zone(&self) -> Option<&Zone> {
        self.zone.as_ref()
    }

    fn range(&self, offset: usize, len: usize) -> Result<std::ops::Range<usize>> {
        let size = self.elements.len();
        offset
            .checked_sub(1)
            .and_then(|start| start.checked_add(len).filter(|end| *end <= size).map(|end| start..end))
            .ok_or(RowwireError::Slice { offset, len, size })
    }

    /// `len` elements starting at the 1-based `offset`.
    pub fn slice(&self, offset: usize, len: usize) -> Result<ArrayValue> {
        let range = self.range(offset, len)?;
        Ok(Self::new(self.component.clone(), self.elements[range].to_vec(), self.zone))
    }

    /// Client form of every element.
    pub fn client_values(&self) -> Result<Vec<ClientValue>> {
        let accessor = Accessor::new(
            ColumnMetaData::new(0, "VALUE", self.component.clone()),
            Getter::Row,
            self.zone,
            Arc::new(DefaultArrayFactory::new(self.zone)),
        );
        let mut cursor = Cursor::new(SingleValueRows::new(self.elements.clone()));
        let mut values = Vec::with_capacity(self.elements.len());
        while cursor.next()? {
            values.push(accessor.get_object(&cursor)?);
        }
        Ok(values)
    }

    /// Rows `(INDEX, VALUE)` for every element, indices from 1.
    pub fn result_set(&self) -> ResultSet {
        self.rows(0..self.elements.len())
    }

    /// Rows `(INDEX, VALUE)` for `len` elements from the 1-based `offset`.
    /// Indices keep their position in the whole array.
    pub fn result_set_slice(&self, offset: usize, len: usize) -> Result<ResultSet> {
        Ok(self.rows(self.range(offset, len)?))
    }

    fn rows(&self, range: std::ops::Range<usize>) -> ResultSet {
        let start = range.start;
        let rows = self.elements[range]
            .iter()
            .enumerate()
            .map(|(i, element)| vec![LocalValue::Long((start + i + 1) as i64), element.clone()])
            .collect();
        let columns = vec![
            ColumnMetaData::scalar(0, "INDEX", Rep::Long),
            ColumnMetaData::new(1, "VALUE", self.component.clone()),
        ];
        ResultSet::new(ListRows::new(rows), columns, self.zone, None)
    }

    /// The elements as a plain list, nested arrays included.
    pub fn to_local(&self) -> LocalValue {
        LocalValue::List(
            self.elements
                .iter()
                .map(|element| match element {
                    LocalValue::Array(inner) => inner.to_local(),
                    other => other.clone(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use rowwire_calendar::MILLIS_PER_DAY;

    use super::*;
    use crate::client::SqlDate;

    fn ints(values: &[i32]) -> ArrayValue {
        ArrayValue::new(
            ColumnType::scalar(Rep::Integer),
            values.iter().copied().map(LocalValue::Int).collect(),
            None,
        )
    }

    #[test]
    fn slice_is_one_based() {
        let array = ints(&[10, 20, 30, 40]);
        assert_eq!(array.slice(2, 2).unwrap().elements(), &[LocalValue::Int(20), LocalValue::Int(30)]);
        assert!(array.slice(5, 0).unwrap().is_empty());
        assert!(array.slice(0, 1).is_err());
        let err = array.slice(4, 2).unwrap_err();
        assert_eq!(err.to_string(), "slice at 4 of length 2 out of range for array of length 4");
    }

    #[test]
    fn oversized_slice_is_an_error() {
        let array = ints(&[10, 20, 30]);
        assert!(matches!(array.slice(2, usize::MAX), Err(RowwireError::Slice { offset: 2, .. })));
        assert!(array.result_set_slice(usize::MAX, 1).is_err());
    }

    #[test]
    fn result_set_pairs_index_with_value() {
        let mut rs = ints(&[10, 20]).result_set();
        assert_eq!(rs.columns()[0].name, "INDEX");
        let rows = rs.collect_rows().unwrap();
        assert_eq!(
            rows,
            vec![
                vec![ClientValue::Long(1), ClientValue::Int(10)],
                vec![ClientValue::Long(2), ClientValue::Int(20)],
            ]
        );
    }

    #[test]
    fn result_set_slice_keeps_absolute_indices() {
        let mut rs = ints(&[10, 20, 30]).result_set_slice(2, 2).unwrap();
        let rows = rs.collect_rows().unwrap();
        assert_eq!(rows[0], vec![ClientValue::Long(2), ClientValue::Int(20)]);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn client_values_read_dates_in_zone() {
        let array = ArrayValue::new(
            ColumnType::scalar(Rep::SqlDate),
            vec![LocalValue::Int(1), LocalValue::Null],
            Some(Zone::Utc),
        );
        assert_eq!(
            array.client_values().unwrap(),
            vec![ClientValue::Date(SqlDate(MILLIS_PER_DAY)), ClientValue::Null]
        );
    }

    #[test]
    fn nested_arrays_keep_their_component() {
        let array = ArrayValue::new(
            ColumnType::array(ColumnType::scalar(Rep::Integer)),
            vec![LocalValue::List(vec![LocalValue::Int(1), LocalValue::Int(2)]), LocalValue::Null],
            None,
        );
        let values = array.client_values().unwrap();
        assert_eq!(
            values[0],
            ClientValue::Array(ArrayValue::new(
                ColumnType::scalar(Rep::Integer),
                vec![LocalValue::Int(1), LocalValue::Int(2)],
                None,
            ))
        );
        assert_eq!(values[1], ClientValue::Null);
    }

    #[test]
    fn to_local_unwraps_nested_arrays() {
        let inner = ints(&[1]);
        let outer = ArrayValue::new(
            ColumnType::array(ColumnType::scalar(Rep::Integer)),
            vec![LocalValue::Array(inner)],
            None,
        );
        assert_eq!(outer.to_local(), LocalValue::List(vec![LocalValue::List(vec![LocalValue::Int(1)])]));
    }
}
