//! Type-safe field kinds for DocType metadata.
//!
//! The metadata source sends field types as display strings
//! (`"Section Break"`, `"Attach Image"`, ...). [`FieldKind`] closes the
//! known set into variants and keeps anything else as [`FieldKind::Other`]
//! so unknown types are carried through rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Field type of a [`FieldDefinition`](crate::FieldDefinition).
///
/// The three layout markers carry no data; they only drive grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// Opens a new tab.
    TabBreak,
    /// Opens a new section inside the current tab.
    SectionBreak,
    /// Starts the next column inside the current section.
    ColumnBreak,

    Data,
    Select,
    Link,
    DynamicLink,
    Check,
    Int,
    Float,
    Currency,
    Percent,
    Date,
    Datetime,
    Time,
    Duration,
    Text,
    SmallText,
    LongText,
    TextEditor,
    /// Child table; `options` names the sub-table DocType.
    Table,
    TableMultiSelect,
    Attach,
    AttachImage,
    Signature,
    Geolocation,
    ReadOnly,
    Button,
    Html,

    /// Any type this crate does not know. Treated as an ordinary field.
    Other(String),
}

impl FieldKind {
    /// Returns the display name as sent by the metadata source.
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::TabBreak => "Tab Break",
            FieldKind::SectionBreak => "Section Break",
            FieldKind::ColumnBreak => "Column Break",
            FieldKind::Data => "Data",
            FieldKind::Select => "Select",
            FieldKind::Link => "Link",
            FieldKind::DynamicLink => "Dynamic Link",
            FieldKind::Check => "Check",
            FieldKind::Int => "Int",
            FieldKind::Float => "Float",
            FieldKind::Currency => "Currency",
            FieldKind::Percent => "Percent",
            FieldKind::Date => "Date",
            FieldKind::Datetime => "Datetime",
            FieldKind::Time => "Time",
            FieldKind::Duration => "Duration",
            FieldKind::Text => "Text",
            FieldKind::SmallText => "Small Text",
            FieldKind::LongText => "Long Text",
            FieldKind::TextEditor => "Text Editor",
            FieldKind::Table => "Table",
            FieldKind::TableMultiSelect => "Table MultiSelect",
            FieldKind::Attach => "Attach",
            FieldKind::AttachImage => "Attach Image",
            FieldKind::Signature => "Signature",
            FieldKind::Geolocation => "Geolocation",
            FieldKind::ReadOnly => "Read Only",
            FieldKind::Button => "Button",
            FieldKind::Html => "HTML",
            FieldKind::Other(name) => name,
        }
    }

    /// Returns true for tab, section and column breaks.
    pub fn is_layout_marker(&self) -> bool {
        matches!(
            self,
            FieldKind::TabBreak | FieldKind::SectionBreak | FieldKind::ColumnBreak
        )
    }

    /// Returns true for kinds whose `options` names a sub-table DocType.
    pub fn is_table(&self) -> bool {
        matches!(self, FieldKind::Table | FieldKind::TableMultiSelect)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = std::convert::Infallible;

    /// Parse a field type string. Matching ignores case and surrounding
    /// whitespace; unknown names become [`FieldKind::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let kind = match trimmed.to_ascii_uppercase().as_str() {
            "TAB BREAK" => FieldKind::TabBreak,
            "SECTION BREAK" => FieldKind::SectionBreak,
            "COLUMN BREAK" => FieldKind::ColumnBreak,
            "DATA" => FieldKind::Data,
            "SELECT" => FieldKind::Select,
            "LINK" => FieldKind::Link,
            "DYNAMIC LINK" => FieldKind::DynamicLink,
            "CHECK" => FieldKind::Check,
            "INT" => FieldKind::Int,
            "FLOAT" => FieldKind::Float,
            "CURRENCY" => FieldKind::Currency,
            "PERCENT" => FieldKind::Percent,
            "DATE" => FieldKind::Date,
            "DATETIME" => FieldKind::Datetime,
            "TIME" => FieldKind::Time,
            "DURATION" => FieldKind::Duration,
            "TEXT" => FieldKind::Text,
            "SMALL TEXT" => FieldKind::SmallText,
            "LONG TEXT" => FieldKind::LongText,
            "TEXT EDITOR" => FieldKind::TextEditor,
            "TABLE" => FieldKind::Table,
            "TABLE MULTISELECT" => FieldKind::TableMultiSelect,
            "ATTACH" => FieldKind::Attach,
            "ATTACH IMAGE" => FieldKind::AttachImage,
            "SIGNATURE" => FieldKind::Signature,
            "GEOLOCATION" => FieldKind::Geolocation,
            "READ ONLY" => FieldKind::ReadOnly,
            "BUTTON" => FieldKind::Button,
            "HTML" => FieldKind::Html,
            _ => FieldKind::Other(trimmed.to_string()),
        };
        Ok(kind)
    }
}

impl From<String> for FieldKind {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}
