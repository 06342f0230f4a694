//! Collapse state for collapsible sections.
//!
//! The only mutable state the layout keeps between recomputations. Keys are
//! section keys (`<tab id or "main">_<section fieldname>`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::LayoutResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseState {
    collapsed: BTreeMap<String, bool>,
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for keys with no entry.
    pub fn is_collapsed(&self, key: &str) -> bool {
        self.collapsed.get(key).copied().unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.collapsed.get(key).copied()
    }

    /// Start a collapsible section closed unless it already has an entry.
    pub(crate) fn seed_collapsed(&mut self, key: &str) {
        if !self.collapsed.contains_key(key) {
            self.collapsed.insert(key.to_string(), true);
        }
    }

    pub fn set(&mut self, key: impl Into<String>, collapsed: bool) {
        self.collapsed.insert(key.into(), collapsed);
    }

    /// Flip one entry and return its new value.
    pub fn toggle(&mut self, key: &str) -> bool {
        let value = !self.is_collapsed(key);
        self.collapsed.insert(key.to_string(), value);
        debug!(section_key = key, collapsed = value, "toggled section");
        value
    }

    /// Flip the section at `section_index` inside tab `tab_id`, or among the
    /// top-level sections when `tab_id` is `None`.
    ///
    /// Returns the new value, or `None` when the section does not exist, is
    /// not collapsible, or has no key.
    pub fn toggle_section(
        &mut self,
        layout: &LayoutResult,
        section_index: usize,
        tab_id: Option<&str>,
    ) -> Option<bool> {
        let section = match tab_id {
            Some(id) => layout.tab(id)?.sections.get(section_index)?,
            None => layout.sections.get(section_index)?,
        };
        if !section.collapsible {
            return None;
        }
        let key = section.key.as_deref()?;
        Some(self.toggle(key))
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.collapsed
            .iter()
            .map(|(key, collapsed)| (key.as_str(), *collapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_single_entry() {
        let mut state = CollapseState::new();
        state.set("main_details", true);
        state.set("main_other", true);
        assert!(!state.toggle("main_details"));
        assert_eq!(state.get("main_details"), Some(false));
        assert_eq!(state.get("main_other"), Some(true));
        assert!(state.toggle("main_details"));
    }

    #[test]
    fn seed_keeps_existing_entry() {
        let mut state = CollapseState::new();
        state.set("main_details", false);
        state.seed_collapsed("main_details");
        state.seed_collapsed("main_notes");
        assert!(!state.is_collapsed("main_details"));
        assert!(state.is_collapsed("main_notes"));
    }

    #[test]
    fn unknown_key_is_expanded() {
        let mut state = CollapseState::new();
        assert!(!state.is_collapsed("absent"));
        assert!(state.toggle("absent"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut state = CollapseState::new();
        state.set("tab_a_sec", true);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"tab_a_sec":true}"#);
        let back: CollapseState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
