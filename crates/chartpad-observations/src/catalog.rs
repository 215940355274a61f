//! Seed observations for the assessment screen.

use crate::entry::ObservationEntry;

fn seed(entry: Result<ObservationEntry, crate::error::ObservationError>) -> ObservationEntry {
    entry.expect("seed pattern is valid")
}

/// The observations the assessment screen starts from, each with the
/// transcript pattern that populates it.
///
/// Vitals and the pain assessment submit as discrete measurements (the pain
/// fields ride on custom extensions); the fall-risk and daily-living items
/// submit as questionnaire answers.
pub fn seed_catalog() -> Vec<ObservationEntry> {
    vec![
        seed(ObservationEntry::discrete(
            "Temperature",
            r"temperature is (\d+(?:\.\d+)?)°C",
        )),
        seed(ObservationEntry::discrete(
            "Respiratory rate",
            r"respiratory rate is (\d+) breaths per minute",
        )),
        seed(
            ObservationEntry::discrete("Pain Score", r"pain level as (\d+) out of 10")
                .map(|e| e.with_extension("pain-assessment")),
        ),
        seed(
            ObservationEntry::discrete("Pain Location", r"pain.*in (?:his|her) (.*?)\.")
                .map(|e| e.with_extension("pain-location")),
        ),
        seed(ObservationEntry::questionnaire(
            "History of Falls",
            r"history of falls: (.*?)\.",
        )),
        seed(ObservationEntry::questionnaire(
            "Bathing",
            r"bathing ability: (.*?)\.",
        )),
        seed(ObservationEntry::questionnaire(
            "Dressing",
            r"dressing ability: (.*?)\.",
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::ResourceKind;

    #[test]
    fn catalog_has_unique_labels() {
        let catalog = seed_catalog();
        let mut labels: Vec<_> = catalog.iter().map(|e| e.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), catalog.len());
    }

    #[test]
    fn catalog_mixes_both_resource_kinds() {
        let catalog = seed_catalog();
        assert!(
            catalog
                .iter()
                .any(|e| e.kind == ResourceKind::Observation)
        );
        assert!(
            catalog
                .iter()
                .any(|e| e.kind == ResourceKind::QuestionnaireResponse)
        );
    }

    #[test]
    fn seeds_start_without_values_or_history() {
        for entry in seed_catalog() {
            assert!(!entry.has_value(), "{} should start empty", entry.label);
            assert!(entry.history.is_empty());
        }
    }

    #[test]
    fn pain_fields_carry_extension_keys() {
        let catalog = seed_catalog();
        let pain = catalog.iter().find(|e| e.label == "Pain Score").unwrap();
        assert_eq!(pain.custom_extension.as_deref(), Some("pain-assessment"));
    }
}
