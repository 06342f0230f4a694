//! Metadata conventions carried in DocType field labels and descriptions.
//!
//! Forms mark special fields with bracket tags in their labels (`[camera]`,
//! `[geolocation-lat]`) and directives in their descriptions. This crate
//! extracts those conventions, plus standard-filter fields and `Duration`
//! value conversion.

pub mod duration;
pub mod filter;
pub mod geolocation;
pub mod label;
pub mod watermark;

use serde::Serialize;

use doctype_model::{DocumentSnapshot, FieldDefinition};

pub use duration::{format_duration, parse_duration};
pub use filter::standard_filter_fields;
pub use geolocation::{GeolocationField, GeolocationKind, geolocation_fields};
pub use label::strip_tags;
pub use watermark::{WatermarkConfig, WatermarkField, watermark_configs};

/// Everything this crate extracts from one field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormMetadata {
    pub watermarks: Vec<WatermarkConfig>,
    pub geolocation: Vec<GeolocationField>,
    /// Fieldnames of standard-filter fields.
    pub standard_filters: Vec<String>,
}

impl FormMetadata {
    pub fn extract(fields: &[FieldDefinition], doc: Option<&DocumentSnapshot>) -> Self {
        Self {
            watermarks: watermark_configs(fields, doc),
            geolocation: geolocation_fields(fields, doc),
            standard_filters: standard_filter_fields(fields)
                .into_iter()
                .map(|field| field.name.clone())
                .collect(),
        }
    }
}
