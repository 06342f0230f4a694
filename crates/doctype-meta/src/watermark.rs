//! Watermark configuration for camera image fields.
//!
//! An `Attach Image` field tagged `[camera]` names, in its description, the
//! fields whose current values are stamped onto captured photos:
//!
//! ```text
//! label:       "Site photo [camera]"
//! description: "watermarks-fields: site_name, visit_date"
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use doctype_model::{DocumentSnapshot, FieldDefinition, FieldKind, value_text};

use crate::label::{has_tag, strip_tags};

pub const CAMERA_TAG: &str = "[camera]";
pub const WATERMARK_DIRECTIVE: &str = "watermarks-fields:";

static WATERMARK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"watermarks-fields:([\w\s,]+)").expect("Invalid watermark directive regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatermarkField {
    pub fieldname: String,
    /// Label with bracket tags removed.
    pub label: String,
    /// Current document value, empty when unset.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatermarkConfig {
    pub image_field: String,
    pub fields: Vec<WatermarkField>,
}

/// Collect watermark configs for every camera image field in `fields`.
///
/// Names in the directive that match no field are skipped; an image field
/// left with no resolvable names produces no config.
pub fn watermark_configs(
    fields: &[FieldDefinition],
    doc: Option<&DocumentSnapshot>,
) -> Vec<WatermarkConfig> {
    fields
        .iter()
        .filter(|field| is_camera_field(field))
        .filter_map(|image| {
            let names = directive_names(image.description.as_deref()?)?;
            let resolved: Vec<WatermarkField> = names
                .iter()
                .filter_map(|name| {
                    let source = fields.iter().find(|field| field.name == *name);
                    if source.is_none() {
                        debug!(image_field = %image.name, name = %name, "unknown watermark field");
                    }
                    source
                })
                .map(|source| WatermarkField {
                    fieldname: source.name.clone(),
                    label: strip_tags(&source.label),
                    value: doc
                        .and_then(|doc| doc.get(&source.name))
                        .and_then(value_text)
                        .unwrap_or_default(),
                })
                .collect();
            (!resolved.is_empty()).then(|| WatermarkConfig {
                image_field: image.name.clone(),
                fields: resolved,
            })
        })
        .collect()
}

fn is_camera_field(field: &FieldDefinition) -> bool {
    field.kind == FieldKind::AttachImage
        && has_tag(&field.label, CAMERA_TAG)
        && field
            .description
            .as_deref()
            .is_some_and(|description| description.contains(WATERMARK_DIRECTIVE))
}

/// Field names listed after `watermarks-fields:`, trimmed, blanks dropped.
fn directive_names(description: &str) -> Option<Vec<String>> {
    let captures = WATERMARK_REGEX.captures(description)?;
    let list = captures.get(1)?.as_str();
    Some(
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    )
}
