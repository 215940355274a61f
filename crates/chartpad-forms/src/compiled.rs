//! Schema compilation and submission validation.
//!
//! Per field, validation runs as: type coercion (string/number/enum) →
//! required check → rule list in declaration order. Optional fields
//! submitted as empty strings validate as absent and skip their rules. A
//! required select bypasses the generic required check and relies on enum
//! membership instead.

use std::collections::HashSet;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::FormError;
use crate::field::{FieldDescriptor, FieldKind};
use crate::rules::{FieldValue, Predicate, PredicateRegistry, ValidationRule};
use chartpad_core::time::parse_fhir_date;

/// Raw form submission: field name → entered string, in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData(IndexMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut data = Self::new();
        for (name, value) in pairs {
            data.set(name, value);
        }
        data
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Per-field error messages from a failed validation pass, in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationFailure {
    pub errors: IndexMap<String, String>,
}

impl ValidationFailure {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} field(s) failed validation", self.errors.len())
    }
}

impl std::error::Error for ValidationFailure {}

/// A rule with its pattern compiled and its predicate resolved.
#[derive(Debug, Clone)]
enum Check {
    Max { limit: f64, message: String },
    Min { limit: f64, message: String },
    Email { message: String },
    Pattern { regex: Regex, message: String },
    Custom { predicate: Predicate, message: String },
}

#[derive(Debug, Clone)]
struct CompiledField {
    name: String,
    label: String,
    kind: FieldKind,
    required: bool,
    options: Vec<String>,
    checks: Vec<Check>,
}

/// Runtime validation schema compiled from a field descriptor list.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    fields: Vec<CompiledField>,
}

/// Compile a field schema, resolving custom predicates against `registry`.
///
/// Layout markers are skipped. Fails on duplicate field names, invalid
/// patterns, and predicate names the registry does not know.
pub fn compile(
    schema: &[FieldDescriptor],
    registry: &PredicateRegistry,
) -> Result<CompiledSchema, FormError> {
    let mut fields = Vec::new();
    let mut seen = HashSet::new();

    for descriptor in schema.iter().filter(|d| d.kind.is_input()) {
        if !seen.insert(descriptor.name.clone()) {
            return Err(FormError::DuplicateField(descriptor.name.clone()));
        }

        let mut checks = Vec::with_capacity(descriptor.rules.len());
        if let FieldKind::Currency { non_negative: true } = descriptor.kind {
            checks.push(Check::Min {
                limit: 0.0,
                message: format!("{} must be non-negative", descriptor.label),
            });
        }
        for rule in &descriptor.rules {
            checks.push(compile_rule(&descriptor.name, rule, registry)?);
        }

        fields.push(CompiledField {
            name: descriptor.name.clone(),
            label: descriptor.label.clone(),
            kind: descriptor.kind.clone(),
            required: descriptor.required,
            options: descriptor.options.clone(),
            checks,
        });
    }

    debug!(fields = fields.len(), "compiled form schema");
    Ok(CompiledSchema { fields })
}

fn compile_rule(
    field: &str,
    rule: &ValidationRule,
    registry: &PredicateRegistry,
) -> Result<Check, FormError> {
    Ok(match rule {
        ValidationRule::Max { limit, message } => Check::Max {
            limit: *limit,
            message: message.clone(),
        },
        ValidationRule::Min { limit, message } => Check::Min {
            limit: *limit,
            message: message.clone(),
        },
        ValidationRule::Email { message } => Check::Email {
            message: message.clone(),
        },
        ValidationRule::Pattern { pattern, message } => Check::Pattern {
            regex: Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
                field: field.to_string(),
                source,
            })?,
            message: message.clone(),
        },
        ValidationRule::Custom { predicate, message } => Check::Custom {
            predicate: registry
                .resolve(predicate)
                .ok_or_else(|| FormError::unknown_predicate(field, predicate.clone()))?,
            message: message.clone(),
        },
    })
}

impl CompiledSchema {
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Run every configured validation against a submission.
    ///
    /// Records the first failing message per field; a submission is rejected
    /// when any field fails.
    pub fn validate(&self, data: &FormData) -> Result<(), ValidationFailure> {
        let mut failure = ValidationFailure::default();

        for field in &self.fields {
            if let Some(message) = field.validate(data.get(&field.name).unwrap_or("")) {
                failure.errors.insert(field.name.clone(), message);
            }
        }

        if failure.is_empty() { Ok(()) } else { Err(failure) }
    }
}

impl CompiledField {
    /// Validate a single raw input. Returns the first failing message.
    fn validate(&self, raw: &str) -> Option<String> {
        // Empty input is "absent": fails only the required check, never a
        // format rule.
        if raw.is_empty() {
            return self
                .required
                .then(|| format!("{} is required", self.label));
        }

        let value = match &self.kind {
            FieldKind::Select => {
                if !self.options.iter().any(|o| o == raw) {
                    return Some(format!("{} must be one of the available options", self.label));
                }
                FieldValue::Text(raw.to_string())
            }
            FieldKind::Currency { .. } => match raw.parse::<f64>() {
                Ok(number) => FieldValue::Number(number),
                Err(_) => return Some(format!("{} must be a number", self.label)),
            },
            FieldKind::Date => {
                if parse_fhir_date(raw).is_err() {
                    return Some(format!("Invalid date for {}", self.label));
                }
                FieldValue::Text(raw.to_string())
            }
            FieldKind::Text | FieldKind::TextBlock => FieldValue::Text(raw.to_string()),
            FieldKind::SectionBreak | FieldKind::ColumnBreak => return None,
        };

        self.checks.iter().find_map(|check| check.run(&value))
    }
}

impl Check {
    fn run(&self, value: &FieldValue) -> Option<String> {
        match self {
            Check::Max { limit, message } => {
                let measure = measure(value);
                (measure > *limit).then(|| message.clone())
            }
            Check::Min { limit, message } => {
                let measure = measure(value);
                (measure < *limit).then(|| message.clone())
            }
            Check::Email { message } => match value.as_text() {
                Some(text) => (!email_regex().is_match(text)).then(|| message.clone()),
                None => None,
            },
            Check::Pattern { regex, message } => match value.as_text() {
                Some(text) => (!regex.is_match(text)).then(|| message.clone()),
                None => None,
            },
            Check::Custom { predicate, message } => {
                (!predicate(value)).then(|| message.clone())
            }
        }
    }
}

/// Strings measure by character count, numbers by magnitude.
fn measure(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Text(s) => s.chars().count() as f64,
        FieldValue::Number(n) => *n,
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
    })
}
