//! Loading field lists, documents and sub-table definitions from JSON files.
//!
//! Field lists are accepted either as a bare array of field rows or as a
//! DocType object carrying a `fields` array (as exported by the backend).

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::document::DocumentSnapshot;
use crate::error::{ModelError, Result};
use crate::field::FieldDefinition;
use crate::registry::SubTableRegistry;

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| ModelError::io(path, source))?;
    serde_json::from_str(&content).map_err(|source| ModelError::json(path, source))
}

fn fields_from_value(path: &Path, value: Value) -> Result<Vec<FieldDefinition>> {
    let rows = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("fields") {
            Some(rows @ Value::Array(_)) => rows,
            _ => {
                return Err(ModelError::Shape {
                    path: path.to_path_buf(),
                    expected: "an array of fields or an object with a `fields` array",
                });
            }
        },
        _ => {
            return Err(ModelError::Shape {
                path: path.to_path_buf(),
                expected: "an array of fields or an object with a `fields` array",
            });
        }
    };
    serde_json::from_value(rows).map_err(|source| ModelError::json(path, source))
}

/// Load an ordered field list.
pub fn load_fields(path: &Path) -> Result<Vec<FieldDefinition>> {
    let value = read_json(path)?;
    let fields = fields_from_value(path, value)?;
    debug!(path = %path.display(), field_count = fields.len(), "loaded field list");
    Ok(fields)
}

/// Load a document snapshot from a JSON object.
///
/// A `{"data": {...}}` envelope, as returned by resource endpoints, is unwrapped.
pub fn load_document(path: &Path) -> Result<DocumentSnapshot> {
    let value = read_json(path)?;
    let object = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Object(inner)) if map.is_empty() => inner,
            Some(other) => {
                map.insert("data".to_string(), other);
                map
            }
            None => map,
        },
        _ => {
            return Err(ModelError::Shape {
                path: path.to_path_buf(),
                expected: "a JSON object",
            });
        }
    };
    let doc: DocumentSnapshot = object.into_iter().collect();
    debug!(path = %path.display(), value_count = doc.len(), "loaded document");
    Ok(doc)
}

/// Load sub-table definitions.
///
/// `path` may be a directory of DocType JSON files (each with `name` and
/// `fields`) or a single JSON object mapping DocType name to field list.
pub fn load_sub_tables(path: &Path) -> Result<SubTableRegistry> {
    let mut registry = SubTableRegistry::new();
    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| ModelError::io(path, source))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ModelError::io(path, source))?;
            let file = entry.path();
            if file.extension().and_then(|ext| ext.to_str()) == Some("json") {
                files.push(file);
            }
        }
        files.sort();
        for file in files {
            let value = read_json(&file)?;
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| {
                    file.file_stem()
                        .and_then(|stem| stem.to_str())
                        .map(str::to_string)
                })
                .unwrap_or_default();
            let fields = fields_from_value(&file, value)?;
            registry.insert(name, fields);
        }
    } else {
        let value = read_json(path)?;
        let Value::Object(map) = value else {
            return Err(ModelError::Shape {
                path: path.to_path_buf(),
                expected: "an object mapping DocType names to field lists",
            });
        };
        for (name, fields) in map {
            registry.insert(name, fields_from_value(path, fields)?);
        }
    }
    debug!(path = %path.display(), table_count = registry.len(), "loaded sub-tables");
    Ok(registry)
}
