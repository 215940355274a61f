use regex::Regex;

use crate::error::ObservationError;
use chartpad_core::FhirDateTime;

/// Which resource kind an observation originates from, and therefore which
/// payload shape it submits as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Discrete clinical measurement (coded, with a value and unit).
    Observation,
    /// Free-text questionnaire answer keyed by the observation's label.
    QuestionnaireResponse,
}

impl ResourceKind {
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::Observation => "Observation",
            Self::QuestionnaireResponse => "QuestionnaireResponse",
        }
    }
}

/// One prior (value, timestamp) pair from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub value: String,
    pub timestamp: FhirDateTime,
}

/// A labeled observation on the assessment screen.
///
/// Created from seed data at session start; the value is mutated in place as
/// the transcript changes or server history is merged. History stays sorted
/// newest first and deduplicated by exact (timestamp, value) pair.
#[derive(Debug, Clone)]
pub struct ObservationEntry {
    pub label: String,
    pub value: String,
    pub pattern: Regex,
    pub kind: ResourceKind,
    /// Extension identifier for values the base resource shapes cannot
    /// carry, e.g. "pain-assessment".
    pub custom_extension: Option<String>,
    pub history: Vec<HistoryEntry>,
}

impl ObservationEntry {
    pub fn new(
        label: impl Into<String>,
        pattern: &str,
        kind: ResourceKind,
    ) -> Result<Self, ObservationError> {
        let label = label.into();
        let pattern = Regex::new(pattern).map_err(|source| ObservationError::InvalidPattern {
            label: label.clone(),
            source,
        })?;
        Ok(Self {
            label,
            value: String::new(),
            pattern,
            kind,
            custom_extension: None,
            history: Vec::new(),
        })
    }

    pub fn discrete(label: impl Into<String>, pattern: &str) -> Result<Self, ObservationError> {
        Self::new(label, pattern, ResourceKind::Observation)
    }

    pub fn questionnaire(
        label: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, ObservationError> {
        Self::new(label, pattern, ResourceKind::QuestionnaireResponse)
    }

    pub fn with_extension(mut self, key: impl Into<String>) -> Self {
        self.custom_extension = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// Newest recorded history value, if any.
    pub fn latest_history_value(&self) -> Option<&str> {
        self.history.first().map(|h| h.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_discrete_entry() {
        let entry = ObservationEntry::discrete("Temperature", r"temperature is (\d+)")
            .unwrap()
            .with_value("37");
        assert_eq!(entry.kind, ResourceKind::Observation);
        assert_eq!(entry.value, "37");
        assert!(entry.has_value());
        assert!(entry.custom_extension.is_none());
    }

    #[test]
    fn extension_key_is_carried() {
        let entry = ObservationEntry::discrete("Pain Score", r"pain level as (\d+) out of 10")
            .unwrap()
            .with_extension("pain-assessment");
        assert_eq!(entry.custom_extension.as_deref(), Some("pain-assessment"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = ObservationEntry::discrete("Broken", "[").unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn resource_type_strings() {
        assert_eq!(ResourceKind::Observation.resource_type(), "Observation");
        assert_eq!(
            ResourceKind::QuestionnaireResponse.resource_type(),
            "QuestionnaireResponse"
        );
    }
}
