//! Section/tab grouping.
//!
//! One forward pass over the ordered field list. Tab and section breaks
//! close the section being filled and open a new one; column breaks advance
//! the column index; every other field is appended to the open section.
//! Field-level visibility is left to render time.

use tracing::{debug, debug_span, trace};

use doctype_expr::{DependencyMode, evaluate, evaluate_field};
use doctype_model::{DocumentSnapshot, FieldDefinition, FieldKind, SubTableRegistry, UserRoles};

use crate::collapse::CollapseState;
use crate::types::{LayoutResult, PlacedField, Section, Tab};

/// Section key prefix used outside any tab.
pub const MAIN_TAB_KEY: &str = "main";

/// Builds [`LayoutResult`]s for one user.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'a> {
    roles: &'a UserRoles,
    sub_tables: Option<&'a SubTableRegistry>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(roles: &'a UserRoles) -> Self {
        Self {
            roles,
            sub_tables: None,
        }
    }

    /// Resolve child fields of sub-table fields through `registry`.
    #[must_use]
    pub fn with_sub_tables(mut self, registry: &'a SubTableRegistry) -> Self {
        self.sub_tables = Some(registry);
        self
    }

    /// Group `fields` into tabs and sections.
    ///
    /// Collapsible sections without an entry in `collapse` are seeded as
    /// collapsed. The result is a pure function of the three inputs once
    /// seeding has happened, so calling this again with unchanged inputs
    /// yields an equal layout.
    pub fn build(
        &self,
        fields: &[FieldDefinition],
        doc: Option<&DocumentSnapshot>,
        collapse: &mut CollapseState,
    ) -> LayoutResult {
        if fields.is_empty() {
            return LayoutResult::default();
        }
        let span = debug_span!("build_layout", field_count = fields.len());
        let _guard = span.enter();

        let mut grouping = Grouping::default();
        for field in fields {
            match field.kind {
                FieldKind::TabBreak => self.open_tab(&mut grouping, field, doc),
                FieldKind::SectionBreak => self.open_section(&mut grouping, field, doc, collapse),
                FieldKind::ColumnBreak => {
                    let section = &mut grouping.current;
                    if !section.hidden {
                        section.column_count += 1;
                        section.column_labels.push(field.label.clone());
                    }
                }
                _ => {
                    let placed = self.place(field, doc, &grouping.current);
                    grouping.current.fields.push(placed);
                }
            }
        }
        grouping.flush();
        grouping.finish()
    }

    fn open_tab(
        &self,
        grouping: &mut Grouping,
        field: &FieldDefinition,
        doc: Option<&DocumentSnapshot>,
    ) {
        grouping.flush();
        let visible = evaluate(
            field.depends_on.as_deref(),
            doc,
            DependencyMode::Visibility,
            field.required,
            self.roles,
        );
        grouping.tabs.push(Tab {
            id: field.name.clone(),
            label: field.label.clone(),
            sections: Vec::new(),
            hidden: !visible,
        });
        grouping.current_tab = Some(grouping.tabs.len() - 1);
        grouping.current = Section::implicit(Some(field.name.clone()));
    }

    fn open_section(
        &self,
        grouping: &mut Grouping,
        field: &FieldDefinition,
        doc: Option<&DocumentSnapshot>,
        collapse: &mut CollapseState,
    ) {
        grouping.flush();
        let tab_id = grouping.current_tab_id();
        let key = format!(
            "{}_{}",
            tab_id.as_deref().unwrap_or(MAIN_TAB_KEY),
            field.name
        );
        if field.collapsible {
            collapse.seed_collapsed(&key);
        }
        let visible = evaluate(
            field.depends_on.as_deref(),
            doc,
            DependencyMode::Visibility,
            field.required,
            self.roles,
        );
        grouping.current = Section {
            title: field.label.clone(),
            // Keys of non-collapsible sections may coincide with seeded ones.
            collapsed: field.collapsible && collapse.is_collapsed(&key),
            key: Some(key),
            tab_id,
            column_count: 0,
            column_labels: Vec::new(),
            fields: Vec::new(),
            hidden: field.hidden || !visible,
            collapsible: field.collapsible,
        };
    }

    fn place(
        &self,
        field: &FieldDefinition,
        doc: Option<&DocumentSnapshot>,
        section: &Section,
    ) -> PlacedField {
        let mut resolved = field.clone();
        if resolved.child_fields.is_none()
            && let Some(registry) = self.sub_tables
        {
            resolved.child_fields = registry.resolve(field);
        }
        PlacedField {
            mandatory: evaluate_field(field, doc, DependencyMode::Mandatory, self.roles),
            field: resolved,
            column_index: section.column_count,
            tab_id: section.tab_id.clone(),
        }
    }
}

#[derive(Default)]
struct Grouping {
    tabs: Vec<Tab>,
    current_tab: Option<usize>,
    sections: Vec<Section>,
    current: Section,
}

impl Grouping {
    fn current_tab_id(&self) -> Option<String> {
        self.current_tab.map(|index| self.tabs[index].id.clone())
    }

    /// Move the open section to its owner if it holds any field.
    fn flush(&mut self) {
        let next = Section::implicit(self.current_tab_id());
        let section = std::mem::replace(&mut self.current, next);
        if section.is_empty() {
            return;
        }
        match self.current_tab {
            Some(index) => self.tabs[index].sections.push(section),
            None => self.sections.push(section),
        }
    }

    fn finish(self) -> LayoutResult {
        let Grouping { tabs, sections, .. } = self;
        let total_tabs = tabs.len();
        let tabs: Vec<Tab> = tabs
            .into_iter()
            .filter(|tab| {
                let keep = !tab.hidden && tab.has_visible_content();
                if !keep {
                    trace!(tab_id = %tab.id, hidden = tab.hidden, "dropping tab");
                }
                keep
            })
            .collect();
        let has_tabs = !tabs.is_empty();
        let sections = if has_tabs { Vec::new() } else { sections };
        debug!(
            tab_count = tabs.len(),
            dropped_tabs = total_tabs - tabs.len(),
            section_count = sections.len(),
            "layout built"
        );
        LayoutResult {
            tabs,
            has_tabs,
            sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_list_yields_empty_layout() {
        let roles = UserRoles::default();
        let mut collapse = CollapseState::new();
        let layout = LayoutEngine::new(&roles).build(&[], None, &mut collapse);
        assert_eq!(layout, LayoutResult::default());
        assert!(!layout.has_tabs);
        assert!(collapse.is_empty());
    }

    #[test]
    fn fields_before_any_break_land_in_implicit_section() {
        let roles = UserRoles::default();
        let mut collapse = CollapseState::new();
        let fields = vec![
            FieldDefinition::data("subject", "Subject"),
            FieldDefinition::data("status", "Status"),
        ];
        let layout = LayoutEngine::new(&roles).build(&fields, None, &mut collapse);
        assert_eq!(layout.sections.len(), 1);
        let section = &layout.sections[0];
        assert_eq!(section.title, "");
        assert_eq!(section.key, None);
        assert_eq!(section.tab_id, None);
        assert_eq!(section.fields.len(), 2);
    }

    #[test]
    fn column_break_in_hidden_section_is_ignored() {
        let roles = UserRoles::default();
        let mut collapse = CollapseState::new();
        let fields = vec![
            FieldDefinition::section_break("internal", "Internal").with_hidden(true),
            FieldDefinition::data("a", "A"),
            FieldDefinition::column_break("col", "Right"),
            FieldDefinition::data("b", "B"),
        ];
        let layout = LayoutEngine::new(&roles).build(&fields, None, &mut collapse);
        let section = &layout.sections[0];
        assert!(section.hidden);
        assert_eq!(section.column_count, 0);
        assert!(section.column_labels.is_empty());
        assert!(section.fields.iter().all(|placed| placed.column_index == 0));
    }
}
