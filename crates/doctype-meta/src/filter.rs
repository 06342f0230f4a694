use doctype_model::FieldDefinition;

/// Fields flagged for the list view's standard filter bar, in order.
pub fn standard_filter_fields(fields: &[FieldDefinition]) -> Vec<&FieldDefinition> {
    fields
        .iter()
        .filter(|field| field.in_standard_filter)
        .collect()
}
