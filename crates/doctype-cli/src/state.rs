//! Collapse state kept between runs, one map per form.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use doctype_layout::CollapseState;

/// Collapse state of every form seen, keyed by form name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateStore {
    forms: BTreeMap<String, CollapseState>,
}

impl StateStore {
    /// Read the store at `path`; a missing or corrupt file yields an empty store.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(store) => {
                    debug!(path = %path.display(), "loaded collapse state");
                    store
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "ignoring unreadable collapse state");
                    Self::default()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to read collapse state");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create state directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self).context("serialize collapse state")?;
        fs::write(path, content).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), forms = self.forms.len(), "saved collapse state");
        Ok(())
    }

    pub fn form(&self, name: &str) -> CollapseState {
        self.forms.get(name).cloned().unwrap_or_default()
    }

    pub fn set_form(&mut self, name: impl Into<String>, state: CollapseState) {
        self.forms.insert(name.into(), state);
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

/// Form name derived from a field list path (`task.json` → `task`).
pub fn form_name(fields_path: &Path) -> String {
    fields_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("form")
        .to_string()
}
