//! Observation-to-payload mapping for submission.

use serde_json::{Value, json};
use tracing::warn;

use crate::entry::{ObservationEntry, ResourceKind};

const EXTENSION_BASE_URL: &str = "http://example.com/fhir/StructureDefinition";

/// LOINC code for a known observation label.
///
/// The table is deliberately partial: unmapped labels fall back to
/// "unknown" (and are logged) rather than blocking submission.
fn loinc_code(label: &str) -> &'static str {
    match label {
        "Temperature" => "8310-5",
        "Respiratory rate" => "9279-1",
        "Pain Score" => "72514-3",
        _ => {
            warn!(label, "no LOINC mapping for observation label");
            "unknown"
        }
    }
}

/// Unit for a known observation label, with the same partial-table fallback.
fn unit_for(label: &str) -> &'static str {
    match label {
        "Temperature" => "°C",
        "Respiratory rate" => "/min",
        "Pain Score" => "{score}",
        _ => {
            warn!(label, "no unit mapping for observation label");
            "unit"
        }
    }
}

/// Map an observation to its submission payload.
///
/// Discrete measurements become an `Observation` with a LOINC coding and
/// either a `valueQuantity` (numeric values) or a `valueString`; entries
/// with a custom-extension key additionally carry the value as an
/// extension. Questionnaire answers become a `QuestionnaireResponse` with a
/// single item keyed by the label.
pub fn to_resource(entry: &ObservationEntry, patient_id: &str) -> Value {
    match entry.kind {
        ResourceKind::Observation => observation_resource(entry, patient_id),
        ResourceKind::QuestionnaireResponse => questionnaire_resource(entry, patient_id),
    }
}

fn observation_resource(entry: &ObservationEntry, patient_id: &str) -> Value {
    let mut resource = json!({
        "resourceType": "Observation",
        "status": "final",
        "subject": { "reference": format!("Patient/{patient_id}") },
        "code": {
            "coding": [{
                "system": "http://loinc.org",
                "code": loinc_code(&entry.label),
                "display": entry.label,
            }]
        },
    });

    match entry.value.parse::<f64>() {
        Ok(number) => {
            resource["valueQuantity"] = json!({
                "value": number,
                "unit": unit_for(&entry.label),
            });
        }
        Err(_) => {
            resource["valueString"] = json!(entry.value);
        }
    }

    if let Some(key) = &entry.custom_extension {
        resource["extension"] = json!([{
            "url": format!("{EXTENSION_BASE_URL}/{key}"),
            "valueString": entry.value,
        }]);
    }

    resource
}

fn questionnaire_resource(entry: &ObservationEntry, patient_id: &str) -> Value {
    json!({
        "resourceType": "QuestionnaireResponse",
        "status": "completed",
        "subject": { "reference": format!("Patient/{patient_id}") },
        "item": [{
            "linkId": entry.label,
            "text": entry.label,
            "answer": [{ "valueString": entry.value }],
        }],
    })
}
