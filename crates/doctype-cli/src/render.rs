//! Output rendering for layouts and metadata.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use anyhow::{Context, Result};
use serde::Serialize;

use doctype_layout::{LayoutResult, Section, render_outline};
use doctype_model::{DocumentSnapshot, UserRoles};

use crate::settings::OutputFormat;

/// Render `layout` in `format`.
pub fn render_layout(
    layout: &LayoutResult,
    format: OutputFormat,
    pretty: bool,
    doc: Option<&DocumentSnapshot>,
    roles: &UserRoles,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(layout, pretty),
        OutputFormat::Outline => Ok(render_outline(layout, doc, roles)),
        OutputFormat::Table => Ok(format!("{}\n", layout_table(layout, doc, roles))),
    }
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serialize output")?;
    text.push('\n');
    Ok(text)
}

/// One row per placed field.
pub fn layout_table(
    layout: &LayoutResult,
    doc: Option<&DocumentSnapshot>,
    roles: &UserRoles,
) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Tab"),
        header_cell("Section"),
        header_cell("Col"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Required"),
        header_cell("Visible"),
        header_cell("Read-only"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in 5..8 {
        align_column(&mut table, column, CellAlignment::Center);
    }
    for tab in &layout.tabs {
        for section in &tab.sections {
            add_section_rows(&mut table, &tab.label, section, doc, roles);
        }
    }
    for section in &layout.sections {
        add_section_rows(&mut table, "-", section, doc, roles);
    }
    table
}

fn add_section_rows(
    table: &mut Table,
    tab_label: &str,
    section: &Section,
    doc: Option<&DocumentSnapshot>,
    roles: &UserRoles,
) {
    let title = if section.title.is_empty() {
        "-"
    } else {
        section.title.as_str()
    };
    for placed in &section.fields {
        let state = placed.state(doc, roles);
        let visible = state.visible && !section.hidden;
        table.add_row(vec![
            Cell::new(tab_label),
            section_cell(title, section),
            Cell::new(placed.column_index),
            Cell::new(&placed.field.name).fg(Color::Blue),
            dim_cell(&placed.field.kind),
            flag_cell(placed.mandatory, Color::Yellow),
            flag_cell(visible, Color::Green),
            flag_cell(state.read_only, Color::Magenta),
        ]);
    }
}

fn section_cell(title: &str, section: &Section) -> Cell {
    if section.hidden {
        Cell::new(format!("{title} (hidden)")).fg(Color::DarkGrey)
    } else if section.collapsed {
        Cell::new(format!("{title} (collapsed)"))
    } else {
        Cell::new(title)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn flag_cell(value: bool, color: Color) -> Cell {
    if value {
        Cell::new("yes").fg(color)
    } else {
        dim_cell("-")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctype_layout::{CollapseState, LayoutEngine};
    use doctype_model::FieldDefinition;

    #[test]
    fn table_has_one_row_per_field() {
        let roles = UserRoles::default();
        let fields = vec![
            FieldDefinition::section_break("main", "Main"),
            FieldDefinition::data("a", "A"),
            FieldDefinition::column_break("col", ""),
            FieldDefinition::data("b", "B"),
        ];
        let mut collapse = CollapseState::new();
        let layout = LayoutEngine::new(&roles).build(&fields, None, &mut collapse);
        let table = layout_table(&layout, None, &roles);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn compact_json_is_single_line() {
        let text = to_json(&LayoutResult::default(), false).unwrap();
        assert_eq!(text, "{\"tabs\":[],\"has_tabs\":false,\"sections\":[]}\n");
    }
}
