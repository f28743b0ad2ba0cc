use std::collections::BTreeMap;

use rowwire::cursor::{JsonRows, MapRows, RecordRows};
use rowwire::{
    ClientValue, ColumnMetaData, ColumnType, Cursor, CursorState, LocalValue, Projection, Rep, ResultSet, RowwireError,
};

fn columns() -> Vec<ColumnMetaData> {
    vec![ColumnMetaData::scalar(0, "c1", Rep::Integer), ColumnMetaData::scalar(1, "c2", Rep::String)]
}

#[test]
fn json_rows_scenario() {
    let source = JsonRows::parse(r#"[{"c1": 1, "c2": "a"}, {"c1": null, "c2": "b"}]"#, columns()).unwrap();
    let mut cursor = Cursor::new(source);
    let accessors = cursor.create_accessors(&columns(), None, None);

    assert!(cursor.next().unwrap());
    assert_eq!(accessors[0].get_int(&cursor).unwrap(), Some(1));
    assert!(!cursor.was_null());
    assert_eq!(accessors[1].get_string(&cursor).unwrap().as_deref(), Some("a"));
    assert!(!cursor.was_null());

    assert!(cursor.next().unwrap());
    assert_eq!(accessors[0].get_int(&cursor).unwrap(), None);
    assert!(cursor.was_null());
    assert_eq!(accessors[1].get_string(&cursor).unwrap().as_deref(), Some("b"));
    assert!(!cursor.was_null());

    assert!(!cursor.next().unwrap());
    assert!(!cursor.next().unwrap());
    let err = accessors[0].get_int(&cursor).unwrap_err();
    assert!(matches!(err, RowwireError::CursorState(CursorState::Exhausted)));
}

#[test]
fn map_rows_scenario() {
    let rows = vec![
        BTreeMap::from([("c1".to_string(), LocalValue::Int(1)), ("c2".to_string(), "a".into())]),
        BTreeMap::from([("c2".to_string(), LocalValue::from("b"))]),
    ];
    let mut rs = ResultSet::new(MapRows::new(rows), columns(), None, None);
    let rows = rs.collect_rows().unwrap();
    assert_eq!(
        rows,
        vec![
            vec![ClientValue::Int(1), ClientValue::String("a".into())],
            vec![ClientValue::Null, ClientValue::String("b".into())],
        ]
    );
}

#[test]
fn getter_before_first_row_fails_with_message() {
    let rs = ResultSet::new(RecordRows::new(vec![]), columns(), None, None);
    let err = rs.get_object(0).unwrap_err();
    assert_eq!(err.to_string(), "cursor not positioned on a row (before first row)");
}

#[test]
fn closed_result_set_rejects_reads() {
    let mut rs = ResultSet::new(
        RecordRows::new(vec![vec![("c1".into(), LocalValue::Int(3)), ("c2".into(), "z".into())]]),
        columns(),
        None,
        None,
    );
    assert!(rs.next().unwrap());
    assert_eq!(rs.get_object(0).unwrap(), ClientValue::Int(3));
    rs.close();
    rs.close();
    assert!(matches!(rs.get_object(0), Err(RowwireError::CursorState(CursorState::Closed))));
    assert!(rs.next().is_err());
}

#[test]
fn array_column_yields_array_value_with_tabular_view() {
    let columns = vec![ColumnMetaData::new(0, "tags", ColumnType::array(ColumnType::scalar(Rep::String)))];
    let source = JsonRows::parse(r#"[{"tags": ["x", null, "z"]}]"#, columns.clone()).unwrap();
    let mut rs = ResultSet::new(source, columns, None, None);
    assert!(rs.next().unwrap());

    let array = rs.accessor(0).unwrap().get_array(rs.cursor()).unwrap().unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.component(), &ColumnType::scalar(Rep::String));

    let mut view = array.result_set_slice(2, 2).unwrap();
    assert!(view.next().unwrap());
    assert_eq!(view.get_object(0).unwrap(), ClientValue::Long(2));
    assert_eq!(view.get_object(1).unwrap(), ClientValue::Null);
    assert!(view.was_null());
    assert!(view.next().unwrap());
    assert_eq!(view.get_string(1).unwrap().as_deref(), Some("z"));
    assert!(!view.next().unwrap());

    assert_eq!(rs.get_string(0).unwrap().as_deref(), Some(r#"["x",null,"z"]"#));
}

#[test]
fn struct_column_accepts_each_row_shape() {
    let fields = vec![ColumnMetaData::scalar(0, "n", Rep::Integer), ColumnMetaData::scalar(1, "s", Rep::String)];
    let column = ColumnMetaData::new(0, "rec", ColumnType::record(fields));
    let rows = vec![
        LocalValue::List(vec![LocalValue::Int(1), "a".into()]),
        LocalValue::Record(vec![("n".into(), LocalValue::Int(2)), ("s".into(), "b".into())]),
        LocalValue::Null,
        LocalValue::List(vec![LocalValue::Int(3)]),
    ];
    let mut cursor = Cursor::new(rowwire::cursor::SingleValueRows::new(rows));
    let accessors = cursor.create_accessors(&[column], None, None);

    assert!(cursor.next().unwrap());
    let first = accessors[0].get_struct(&cursor).unwrap().unwrap();
    assert_eq!(first.get_by_name("s"), Some(&LocalValue::from("a")));

    assert!(cursor.next().unwrap());
    let second = accessors[0].get_struct(&cursor).unwrap().unwrap();
    assert_eq!(second.get(0).unwrap(), &LocalValue::Int(2));

    assert!(cursor.next().unwrap());
    assert_eq!(accessors[0].get_struct(&cursor).unwrap(), None);
    assert!(accessors[0].was_null(&cursor));

    assert!(cursor.next().unwrap());
    assert!(accessors[0].get_struct(&cursor).is_err());
}

#[test]
fn projection_over_keyed_rows_reads_by_name() {
    let native = vec![ColumnMetaData::scalar(0, "b", Rep::Integer), ColumnMetaData::scalar(1, "a", Rep::Integer)];
    let rows = vec![
        BTreeMap::from([("b".to_string(), LocalValue::Int(1)), ("a".to_string(), LocalValue::Int(2))]),
        BTreeMap::from([("a".to_string(), LocalValue::Int(3))]),
    ];
    let mut cursor = Cursor::new(MapRows::new(rows));
    let projection = Projection::deduce(&["a", "b"], &native).unwrap();
    let accessors = cursor.create_projected_accessors(&projection, &native, None, None);
    assert_eq!(accessors[0].column().ordinal, 0);

    assert!(cursor.next().unwrap());
    assert_eq!(accessors[0].get_int(&cursor).unwrap(), Some(2));
    assert_eq!(accessors[1].get_int(&cursor).unwrap(), Some(1));

    assert!(cursor.next().unwrap());
    assert_eq!(accessors[0].get_int(&cursor).unwrap(), Some(3));
    assert_eq!(accessors[1].get_int(&cursor).unwrap(), None);
    assert!(cursor.was_null());
}
