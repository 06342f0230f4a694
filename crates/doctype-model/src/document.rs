//! Read-only view of a document's current field values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name reserved for role checks; never looked up in a document.
pub const LOGIN_USER_ROLE: &str = "login_user_role";

/// Mapping from field name to current value, owned by the caller's form state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSnapshot {
    values: BTreeMap<String, Value>,
}

impl DocumentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the value as comparison text, or `None` when it is absent or null.
    ///
    /// Boolean `false` renders as the empty string.
    pub fn text(&self, name: &str) -> Option<String> {
        self.values.get(name).and_then(value_text)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl From<BTreeMap<String, Value>> for DocumentSnapshot {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for DocumentSnapshot {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Render a JSON value as the text used in comparisons and display.
///
/// - null → `None`
/// - `false` → `""`, `true` → `"true"`
/// - integral numbers render without a fractional part
/// - arrays render their elements comma-joined
/// - objects render as compact JSON
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(number) => Some(number_text(number)),
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => String::new(),
                    Value::Bool(flag) => flag.to_string(),
                    other => value_text(other).unwrap_or_default(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(int) = number.as_i64() {
        return int.to_string();
    }
    if let Some(int) = number.as_u64() {
        return int.to_string();
    }
    match number.as_f64() {
        Some(float) if float.is_finite() && float.fract() == 0.0 && float.abs() < 1e15 => {
            format!("{}", float as i64)
        }
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}
