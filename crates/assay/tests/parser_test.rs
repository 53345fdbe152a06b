//! Integration tests for loading delimited files into datasets.

use std::io::Write;
use tempfile::NamedTempFile;

use assay::{
    AssayError, ColumnType, DataDefinition, Dataset, Parser, ParserConfig, StorageKind, Value,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Orders with ids, amounts, a low-cardinality status and a free-text note.
fn create_orders_csv() -> NamedTempFile {
    let mut content = String::from("order_id,amount,status,placed_at,note\n");
    let notes = [
        "left at door",
        "call first",
        "gift wrap",
        "fragile",
        "no plastic",
        "ring bell twice",
        "back entrance",
        "weekend only",
        "leave with neighbour",
        "office hours",
        "use side gate",
        "urgent",
    ];
    for (i, note) in notes.iter().enumerate() {
        let status = if i % 3 == 0 { "shipped" } else { "pending" };
        content.push_str(&format!(
            "{},{}.5,{},2024-03-{:02},{}\n",
            1000 + i,
            i * 10,
            status,
            i + 1,
            note
        ));
    }
    create_test_file(&content)
}

#[test]
fn test_parse_file_to_dataset() {
    let file = create_orders_csv();
    let table = Parser::new().parse_file(file.path()).unwrap();

    assert_eq!(table.row_count(), 12);
    assert_eq!(table.column("order_id").unwrap().storage(), StorageKind::Integer);
    assert_eq!(table.column("amount").unwrap().storage(), StorageKind::Float);
    assert_eq!(table.column("placed_at").unwrap().storage(), StorageKind::DateTime);

    let dataset = Dataset::new(table, None).unwrap();
    let definition = dataset.data_definition();

    // Twelve distinct integers exceed the categorical limit.
    assert_eq!(definition.get_column_type("order_id"), ColumnType::Numerical);
    assert_eq!(definition.get_column_type("amount"), ColumnType::Numerical);
    assert_eq!(definition.get_column_type("status"), ColumnType::Categorical);
    assert_eq!(definition.get_column_type("note"), ColumnType::Text);
    // The only datetime column becomes the timestamp.
    assert_eq!(definition.timestamp.as_deref(), Some("placed_at"));
    assert_eq!(definition.get_column_type("placed_at"), ColumnType::Date);
}

#[test]
fn test_declared_id_from_file() {
    let file = create_orders_csv();
    let table = Parser::new().parse_file(file.path()).unwrap();
    let declared = DataDefinition::new().with_id_column("order_id");

    let dataset = Dataset::new(table, Some(declared)).unwrap();
    assert_eq!(
        dataset.data_definition().get_column_type("order_id"),
        ColumnType::Id
    );
    assert_eq!(
        dataset.data_definition().numerical_columns,
        Some(vec!["amount".to_string()])
    );
}

#[test]
fn test_tsv_with_missing_values() {
    let file = create_test_file("group\tvalue\nA\t1.5\nB\tNA\nA\t\nC\t4.0\n");
    let table = Parser::new().parse_file(file.path()).unwrap();
    let dataset = Dataset::new(table, None).unwrap();

    let value = dataset.column("value").unwrap();
    assert_eq!(value.column_type, ColumnType::Numerical);
    assert_eq!(value.data.missing_count(), 2);

    let sub = dataset.subdataset("group", &Value::from("A")).unwrap();
    assert_eq!(sub.row_count(), 2);
}

#[test]
fn test_max_rows_limits_input() {
    let file = create_orders_csv();
    let parser = Parser::with_config(ParserConfig {
        max_rows: Some(4),
        ..ParserConfig::default()
    });
    let table = parser.parse_file(file.path()).unwrap();
    assert_eq!(table.row_count(), 4);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Parser::new()
        .parse_file("/definitely/not/here.csv")
        .unwrap_err();
    assert!(matches!(err, AssayError::Io { .. }));
}
