//! Tests for loading metadata and documents from disk.

use std::fs;

use doctype_model::{FieldKind, ModelError, load_document, load_fields, load_sub_tables};

#[test]
fn load_fields_from_doctype_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("task.json");
    fs::write(
        &path,
        r#"{
            "name": "Task",
            "fields": [
                {"fieldname": "details", "fieldtype": "Section Break", "label": "Details", "collapsible": 1},
                {"fieldname": "subject", "fieldtype": "Data", "label": "Subject", "reqd": 1},
                {"fieldname": "items", "fieldtype": "Table", "label": "Items", "options": "Task Item"}
            ]
        }"#,
    )
    .unwrap();

    let fields = load_fields(&path).unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].kind, FieldKind::SectionBreak);
    assert!(fields[0].collapsible);
    assert!(fields[1].required);
    assert_eq!(fields[2].options.as_deref(), Some("Task Item"));
}

#[test]
fn load_fields_from_bare_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");
    fs::write(
        &path,
        r#"[{"fieldname": "rating", "fieldtype": "Rating", "label": "Rating"}]"#,
    )
    .unwrap();

    let fields = load_fields(&path).unwrap();
    assert_eq!(fields[0].kind, FieldKind::Other("Rating".to_string()));
}

#[test]
fn load_fields_rejects_scalar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "42").unwrap();

    let error = load_fields(&path).unwrap_err();
    assert!(matches!(error, ModelError::Shape { .. }));
}

#[test]
fn load_fields_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let error = load_fields(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(error, ModelError::Io { .. }));
    assert!(error.to_string().contains("absent.json"));
}

#[test]
fn load_document_unwraps_data_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    fs::write(&path, r#"{"data": {"status": "Open", "priority": 2}}"#).unwrap();

    let doc = load_document(&path).unwrap();
    assert_eq!(doc.text("status").as_deref(), Some("Open"));
    assert_eq!(doc.text("priority").as_deref(), Some("2"));
}

#[test]
fn load_document_keeps_plain_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    fs::write(&path, r#"{"data": "raw", "status": "Closed"}"#).unwrap();

    let doc = load_document(&path).unwrap();
    assert_eq!(doc.text("data").as_deref(), Some("raw"));
    assert_eq!(doc.text("status").as_deref(), Some("Closed"));
}

#[test]
fn load_sub_tables_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("task_item.json"),
        r#"{"name": "Task Item", "fields": [{"fieldname": "qty", "fieldtype": "Int", "label": "Qty"}]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let registry = load_sub_tables(dir.path()).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("Task Item").unwrap()[0].kind, FieldKind::Int);
}

#[test]
fn load_sub_tables_from_mapping_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.json");
    fs::write(
        &path,
        r#"{"Task Item": [{"fieldname": "qty", "fieldtype": "Int", "label": "Qty"}]}"#,
    )
    .unwrap();

    let registry = load_sub_tables(&path).unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Task Item"]);
}
