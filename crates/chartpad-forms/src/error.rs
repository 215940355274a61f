use thiserror::Error;

/// Errors raised while compiling a field schema.
///
/// These are author errors: a schema that fails to compile is a defect in
/// the schema source, not in the submitted data.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Field '{field}' references unknown predicate '{predicate}'")]
    UnknownPredicate { field: String, predicate: String },

    #[error("Field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate field name '{0}' in schema")]
    DuplicateField(String),
}

impl FormError {
    pub fn unknown_predicate(field: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::UnknownPredicate {
            field: field.into(),
            predicate: predicate.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_field() {
        let err = FormError::unknown_predicate("birthDate", "is_plausible");
        assert!(err.to_string().contains("birthDate"));
        assert!(err.to_string().contains("is_plausible"));

        let err = FormError::DuplicateField("phone".into());
        assert!(err.to_string().contains("phone"));
    }
}
