//! Dirty/valid tracking used to gate a form's submit control.

use std::sync::Arc;

use crate::compiled::{CompiledSchema, FormData, ValidationFailure};

/// Live form values plus the snapshot they were initialized from.
///
/// The submit control stays disabled until the form is both dirty (some
/// value differs from the initial snapshot) and valid (every configured
/// validation passes).
#[derive(Debug, Clone)]
pub struct FormState {
    schema: Arc<CompiledSchema>,
    initial: FormData,
    current: FormData,
}

impl FormState {
    pub fn new(schema: Arc<CompiledSchema>, initial: FormData) -> Self {
        Self {
            schema,
            current: initial.clone(),
            initial,
        }
    }

    /// Replace both the current values and the dirty-tracking snapshot,
    /// e.g. after fetching a record for editing.
    pub fn reset(&mut self, data: FormData) {
        self.current = data.clone();
        self.initial = data;
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.current.set(name, value);
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.current.get(name)
    }

    pub fn values(&self) -> &FormData {
        &self.current
    }

    pub fn is_dirty(&self) -> bool {
        self.current != self.initial
    }

    pub fn is_valid(&self) -> bool {
        self.schema.validate(&self.current).is_ok()
    }

    pub fn can_submit(&self) -> bool {
        self.is_dirty() && self.is_valid()
    }

    /// Run all validations; on success hand back the values to submit.
    pub fn submit(&self) -> Result<FormData, ValidationFailure> {
        self.schema.validate(&self.current)?;
        Ok(self.current.clone())
    }
}
