use serde::Serialize;

use doctype_model::{DocumentSnapshot, FieldDefinition, UserRoles};

use crate::eval::{DependencyMode, evaluate};

/// Runtime state of one field for a given document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub visible: bool,
    pub required: bool,
    pub read_only: bool,
}

impl FieldState {
    /// Resolve all three attributes of `field` against `doc`.
    ///
    /// A statically hidden field stays hidden whatever its `depends_on` says.
    pub fn resolve(
        field: &FieldDefinition,
        doc: Option<&DocumentSnapshot>,
        roles: &UserRoles,
    ) -> Self {
        Self {
            visible: !field.hidden
                && evaluate_field(field, doc, DependencyMode::Visibility, roles),
            required: evaluate_field(field, doc, DependencyMode::Mandatory, roles),
            read_only: evaluate_field(field, doc, DependencyMode::ReadOnly, roles),
        }
    }
}

/// Evaluate the expression `field` carries for `mode`.
pub fn evaluate_field(
    field: &FieldDefinition,
    doc: Option<&DocumentSnapshot>,
    mode: DependencyMode,
    roles: &UserRoles,
) -> bool {
    let expr = match mode {
        DependencyMode::Visibility => field.depends_on.as_deref(),
        DependencyMode::Mandatory => field.mandatory_depends_on.as_deref(),
        DependencyMode::ReadOnly => field.read_only_depends_on.as_deref(),
    };
    evaluate(expr, doc, mode, field.required, roles)
}
