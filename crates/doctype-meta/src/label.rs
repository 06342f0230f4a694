//! Bracket tags embedded in field labels (`"Photo [camera]"`).

use std::sync::LazyLock;

use regex::Regex;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("Invalid label tag regex"));

/// Remove every `[...]` tag from `label` and trim the rest.
pub fn strip_tags(label: &str) -> String {
    TAG_REGEX.replace_all(label, "").trim().to_string()
}

/// Returns true when `label` carries the literal `tag`, brackets included.
pub fn has_tag(label: &str, tag: &str) -> bool {
    label.contains(tag)
}
