//! Plain-text outline of a layout, with render-time field state applied.

use std::fmt::Write;

use doctype_model::{DocumentSnapshot, UserRoles};

use crate::types::{LayoutResult, Section};

/// Render `layout` as an indented outline.
///
/// Field flags reflect the render-time state for `doc`, so a field kept in
/// its section but hidden by `depends_on` shows as `hidden`.
pub fn render_outline(
    layout: &LayoutResult,
    doc: Option<&DocumentSnapshot>,
    roles: &UserRoles,
) -> String {
    let mut out = String::new();
    if layout.is_empty() {
        out.push_str("(empty layout)\n");
        return out;
    }
    for tab in &layout.tabs {
        let _ = writeln!(out, "tab {} \"{}\"", tab.id, tab.label);
        for section in &tab.sections {
            write_section(&mut out, section, doc, roles, 1);
        }
    }
    for section in &layout.sections {
        write_section(&mut out, section, doc, roles, 0);
    }
    out
}

fn write_section(
    out: &mut String,
    section: &Section,
    doc: Option<&DocumentSnapshot>,
    roles: &UserRoles,
    depth: usize,
) {
    let indent = "  ".repeat(depth);
    let mut flags = vec![format!("columns={}", section.column_count)];
    if section.hidden {
        flags.push("hidden".to_string());
    }
    if section.collapsible {
        flags.push(if section.collapsed {
            "collapsed".to_string()
        } else {
            "expanded".to_string()
        });
    }
    let _ = writeln!(
        out,
        "{indent}section {} \"{}\" [{}]",
        section.key.as_deref().unwrap_or("-"),
        section.title,
        flags.join(", ")
    );
    for placed in &section.fields {
        let state = placed.state(doc, roles);
        let mut field_flags = Vec::new();
        if placed.mandatory {
            field_flags.push("required");
        }
        if !state.visible {
            field_flags.push("hidden");
        }
        if state.read_only {
            field_flags.push("read-only");
        }
        let suffix = if field_flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", field_flags.join(", "))
        };
        let children = placed
            .field
            .child_fields
            .as_ref()
            .map(|children| format!(" ({} child fields)", children.len()))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{indent}  {}: {} <{}>{children}{suffix}",
            placed.column_index, placed.field.name, placed.field.kind
        );
    }
}
