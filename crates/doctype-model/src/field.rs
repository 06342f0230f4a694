//! Field definitions as supplied by the metadata source.

use serde::{Deserialize, Deserializer, Serialize};

use crate::kind::FieldKind;

/// One row of form-schema metadata: an ordinary field or a layout marker.
///
/// Deserializes from the metadata source's JSON shape (`fieldname`,
/// `fieldtype`, `reqd`, `depends_on`, ...). Boolean attributes accept
/// `0`/`1`, `true`/`false` and `"0"`/`"1"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Stable identifier, unique within a document type.
    #[serde(rename = "fieldname", default)]
    pub name: String,
    /// Display label. Often empty for layout markers.
    #[serde(default, deserialize_with = "string_or_null")]
    pub label: String,
    #[serde(rename = "fieldtype")]
    pub kind: FieldKind,
    /// Static requirement, overridden at runtime by `mandatory_depends_on`.
    #[serde(rename = "reqd", default, deserialize_with = "flag")]
    pub required: bool,
    /// Opaque reference; for tables it names the sub-table DocType.
    #[serde(default, deserialize_with = "non_empty")]
    pub options: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub hidden: bool,
    /// Visibility expression.
    #[serde(default, deserialize_with = "non_empty")]
    pub depends_on: Option<String>,
    /// Requiredness expression.
    #[serde(default, deserialize_with = "non_empty")]
    pub mandatory_depends_on: Option<String>,
    /// Read-only expression.
    #[serde(default, deserialize_with = "non_empty")]
    pub read_only_depends_on: Option<String>,
    /// Only meaningful on section breaks.
    #[serde(default, deserialize_with = "flag")]
    pub collapsible: bool,
    #[serde(default, deserialize_with = "non_empty")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub in_standard_filter: bool,
    /// Nested field list for sub-table fields, when already resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_fields: Option<Vec<FieldDefinition>>,
}

impl FieldDefinition {
    /// Create a field with the given name, label and kind and every flag off.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: None,
            hidden: false,
            depends_on: None,
            mandatory_depends_on: None,
            read_only_depends_on: None,
            collapsible: false,
            description: None,
            in_standard_filter: false,
            child_fields: None,
        }
    }

    pub fn tab_break(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::TabBreak)
    }

    pub fn section_break(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::SectionBreak)
    }

    pub fn column_break(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::ColumnBreak)
    }

    pub fn data(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Data)
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    #[must_use]
    pub fn with_depends_on(mut self, expr: impl Into<String>) -> Self {
        self.depends_on = Some(expr.into());
        self
    }

    #[must_use]
    pub fn with_mandatory_depends_on(mut self, expr: impl Into<String>) -> Self {
        self.mandatory_depends_on = Some(expr.into());
        self
    }

    #[must_use]
    pub fn with_read_only_depends_on(mut self, expr: impl Into<String>) -> Self {
        self.read_only_depends_on = Some(expr.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_in_standard_filter(mut self, in_standard_filter: bool) -> Self {
        self.in_standard_filter = in_standard_filter;
        self
    }

    #[must_use]
    pub fn with_child_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.child_fields = Some(fields);
        self
    }
}

/// Accepts bool, integer, float, `"0"`/`"1"`/`"true"`/`"false"` strings and null.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => flag,
        serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(text) => {
            let trimmed = text.trim();
            trimmed == "1" || trimmed.eq_ignore_ascii_case("true")
        }
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => false,
    })
}

/// Maps null and blank strings to `None`.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
