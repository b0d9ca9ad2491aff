//! Input forms: binding, cleaning and validation of submitted fields

pub mod renewal;

use std::collections::BTreeMap;

use validator::ValidationErrors;

/// Field name to the messages attached to it
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Flatten `validator` errors into per-field messages
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// A single message attached to one field
pub fn single_error(field: &str, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.to_string()]);
    errors
}
