//! Layout tree produced by the grouping engine.

use serde::{Deserialize, Serialize};

use doctype_expr::FieldState;
use doctype_model::{DocumentSnapshot, FieldDefinition, UserRoles};

/// An ordinary field placed in a section column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedField {
    /// The field row, with `child_fields` resolved for sub-table fields.
    #[serde(flatten)]
    pub field: FieldDefinition,
    /// Number of column breaks seen in the section before this field.
    pub column_index: usize,
    pub tab_id: Option<String>,
    /// Requiredness after `mandatory_depends_on`.
    pub mandatory: bool,
}

impl PlacedField {
    /// Render-time state; visibility is not applied while grouping.
    pub fn state(&self, doc: Option<&DocumentSnapshot>, roles: &UserRoles) -> FieldState {
        FieldState::resolve(&self.field, doc, roles)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// `<tab id or "main">_<section fieldname>`; `None` for the implicit
    /// section that precedes the first section break of a tab.
    pub key: Option<String>,
    pub tab_id: Option<String>,
    /// Column breaks seen since the section started.
    pub column_count: usize,
    pub column_labels: Vec<String>,
    pub fields: Vec<PlacedField>,
    pub hidden: bool,
    pub collapsible: bool,
    pub collapsed: bool,
}

impl Section {
    pub(crate) fn implicit(tab_id: Option<String>) -> Self {
        Self {
            tab_id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in `column`, in order.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &PlacedField> {
        self.fields
            .iter()
            .filter(move |placed| placed.column_index == column)
    }

    /// Fields whose render-time state is visible, paired with that state.
    pub fn visible_fields<'a>(
        &'a self,
        doc: Option<&'a DocumentSnapshot>,
        roles: &'a UserRoles,
    ) -> impl Iterator<Item = (&'a PlacedField, FieldState)> + 'a {
        self.fields.iter().filter_map(move |placed| {
            let state = placed.state(doc, roles);
            state.visible.then_some((placed, state))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Fieldname of the originating tab break.
    pub id: String,
    pub label: String,
    pub sections: Vec<Section>,
    pub hidden: bool,
}

impl Tab {
    pub(crate) fn has_visible_content(&self) -> bool {
        self.sections
            .iter()
            .any(|section| !section.hidden && !section.is_empty())
    }
}

/// Root of a computed layout.
///
/// `sections` is only populated when no tab survives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub tabs: Vec<Tab>,
    pub has_tabs: bool,
    pub sections: Vec<Section>,
}

impl LayoutResult {
    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// Every section in display order, across tabs or top level.
    pub fn all_sections(&self) -> impl Iterator<Item = &Section> {
        self.tabs
            .iter()
            .flat_map(|tab| tab.sections.iter())
            .chain(self.sections.iter())
    }

    pub fn field_count(&self) -> usize {
        self.all_sections().map(|section| section.fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty() && self.sections.is_empty()
    }
}
