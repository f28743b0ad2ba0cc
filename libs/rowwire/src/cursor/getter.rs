use crate::error::{Result, RowwireError};
use crate::local::LocalValue;

static NULL: LocalValue = LocalValue::Null;

/// Reads one column's raw value out of the current row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Getter {
    /// Field at a position of a list, record or struct row. A scalar row
    /// answers position 0 with itself.
    Position(usize),
    /// Field of a record row by name; absent names read as null.
    Field(String),
    /// The whole row.
    Row,
}

impl Getter {
    pub fn get<'r>(&self, row: &'r LocalValue) -> Result<&'r LocalValue> {
        match self {
            Getter::Row => Ok(row),
            Getter::Position(index) => match row.width() {
                Some(count) => row.field(*index).ok_or(RowwireError::Column { index: *index, count }),
                None if *index == 0 => Ok(row),
                None => Err(RowwireError::Column { index: *index, count: 1 }),
            },
            Getter::Field(name) => match row {
                LocalValue::Record(_) | LocalValue::Struct(_) => Ok(row.field_by_name(name).unwrap_or(&NULL)),
                _ => Err(RowwireError::UnknownField(name.clone())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_reads_lists_and_records() {
        let list = LocalValue::List(vec![LocalValue::Int(1), "a".into()]);
        assert_eq!(Getter::Position(1).get(&list).unwrap(), &LocalValue::from("a"));

        let record = LocalValue::Record(vec![("x".into(), LocalValue::Long(5))]);
        assert_eq!(Getter::Position(0).get(&record).unwrap(), &LocalValue::Long(5));
        assert_eq!(Getter::Field("x".into()).get(&record).unwrap(), &LocalValue::Long(5));
        assert_eq!(Getter::Field("y".into()).get(&record).unwrap(), &LocalValue::Null);
    }

    #[test]
    fn out_of_range_position_is_an_error() {
        let list = LocalValue::List(vec![LocalValue::Int(1)]);
        let err = Getter::Position(3).get(&list).unwrap_err();
        assert_eq!(err.to_string(), "column 3 out of range for row of width 1");
    }

    #[test]
    fn scalar_rows_answer_position_zero() {
        let row = LocalValue::Double(2.5);
        assert_eq!(Getter::Position(0).get(&row).unwrap(), &row);
        assert_eq!(Getter::Row.get(&row).unwrap(), &row);
        assert!(Getter::Field("a".into()).get(&row).is_err());
    }
}
