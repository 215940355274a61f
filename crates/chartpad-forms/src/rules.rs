use std::collections::HashMap;

use chartpad_core::time::parse_fhir_date;
use time::OffsetDateTime;

/// A field's value after type coercion, as seen by validation rules.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// A validation rule as declared in a field schema.
///
/// Rules run in declaration order after coercion and the required check.
/// `Custom` names a predicate function; the name is resolved against a
/// [`PredicateRegistry`] when the schema is compiled, so schema data can
/// never smuggle executable code.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationRule {
    Max { limit: f64, message: String },
    Min { limit: f64, message: String },
    Email { message: String },
    Pattern { pattern: String, message: String },
    Custom { predicate: String, message: String },
}

impl ValidationRule {
    pub fn max(limit: impl Into<f64>, message: impl Into<String>) -> Self {
        Self::Max {
            limit: limit.into(),
            message: message.into(),
        }
    }

    pub fn min(limit: impl Into<f64>, message: impl Into<String>) -> Self {
        Self::Min {
            limit: limit.into(),
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn custom(predicate: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            predicate: predicate.into(),
            message: message.into(),
        }
    }
}

/// Boolean check over a coerced field value.
pub type Predicate = fn(&FieldValue) -> bool;

/// Registry of named predicate functions available to `Custom` rules.
///
/// A rule may only name a predicate that code has registered here; unknown
/// names fail schema compilation. Schema data never becomes executable
/// code.
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, Predicate>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the predicates the built-in schemas use.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("plausible_birth_date", plausible_birth_date);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, predicate: Predicate) {
        self.predicates.insert(name.into(), predicate);
    }

    pub fn resolve(&self, name: &str) -> Option<Predicate> {
        self.predicates.get(name).copied()
    }
}

/// A birth date must name a real day in the past, no more than 120 years ago.
fn plausible_birth_date(value: &FieldValue) -> bool {
    let Some(text) = value.as_text() else {
        return false;
    };
    let Ok(date) = parse_fhir_date(text) else {
        return false;
    };
    let today = OffsetDateTime::now_utc().date();
    date < today && today.year() - date.year() <= 120
}
