//! Data fields tagged as geolocation inputs (`[geolocation-lat]` and friends).

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use doctype_model::{DocumentSnapshot, FieldDefinition, FieldKind, value_text};

use crate::label::strip_tags;

static GEOLOCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[geolocation-(.*?)\]").expect("Invalid geolocation tag regex")
});

/// Which coordinate part a tagged field captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationKind {
    Lat,
    Lng,
    Address,
}

impl GeolocationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeolocationKind::Lat => "lat",
            GeolocationKind::Lng => "lng",
            GeolocationKind::Address => "address",
        }
    }
}

impl fmt::Display for GeolocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeolocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lat" => Ok(GeolocationKind::Lat),
            "lng" => Ok(GeolocationKind::Lng),
            "address" => Ok(GeolocationKind::Address),
            _ => Err(format!("Unknown geolocation tag: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeolocationField {
    pub fieldname: String,
    pub label: String,
    pub value: String,
    pub kind: GeolocationKind,
}

/// Collect `Data` fields whose label carries a geolocation tag.
pub fn geolocation_fields(
    fields: &[FieldDefinition],
    doc: Option<&DocumentSnapshot>,
) -> Vec<GeolocationField> {
    fields
        .iter()
        .filter(|field| field.kind == FieldKind::Data)
        .filter_map(|field| {
            let tag = GEOLOCATION_REGEX.captures(&field.label)?.get(1)?.as_str();
            let kind = match tag.parse::<GeolocationKind>() {
                Ok(kind) => kind,
                Err(error) => {
                    debug!(fieldname = %field.name, %error, "skipping geolocation field");
                    return None;
                }
            };
            Some(GeolocationField {
                fieldname: field.name.clone(),
                label: strip_tags(&field.label),
                value: doc
                    .and_then(|doc| doc.get(&field.name))
                    .and_then(value_text)
                    .unwrap_or_default(),
                kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_display() {
        for kind in [
            GeolocationKind::Lat,
            GeolocationKind::Lng,
            GeolocationKind::Address,
        ] {
            assert_eq!(kind.to_string().parse::<GeolocationKind>(), Ok(kind));
        }
        assert!("altitude".parse::<GeolocationKind>().is_err());
    }
}
