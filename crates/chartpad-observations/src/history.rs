//! Merge of server-fetched observation history into the entry list.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::entry::{HistoryEntry, ObservationEntry};
use chartpad_core::FhirDateTime;

/// Merge server records into each observation's history.
///
/// A record matches an observation when its coded label matches by exact
/// `code.text` or by any coding display name. The value is extracted
/// according to the record's shape; the timestamp comes from
/// `effectiveDateTime`, falling back to `meta.lastUpdated`. Records missing
/// either are skipped. After the merge, history is sorted newest first,
/// deduplicated by exact (timestamp, value) pair, and the current value is
/// set to the newest history entry when one exists.
///
/// Produces a new list; the input is not mutated.
pub fn merge_history(
    server_resources: &[Value],
    observations: &[ObservationEntry],
) -> Vec<ObservationEntry> {
    observations
        .iter()
        .map(|obs| {
            let mut updated = obs.clone();
            let matching: Vec<&Value> = server_resources
                .iter()
                .filter(|resource| label_matches(resource, &obs.label))
                .collect();

            if matching.is_empty() {
                return updated;
            }

            for resource in &matching {
                let value = resource_value(resource, obs.custom_extension.as_deref());
                let timestamp = resource_timestamp(resource);
                if let (Some(value), Some(timestamp)) = (value, timestamp) {
                    updated.history.push(HistoryEntry { value, timestamp });
                }
            }

            updated
                .history
                .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let mut seen = HashSet::new();
            updated
                .history
                .retain(|h| seen.insert((h.timestamp.clone(), h.value.clone())));

            if let Some(latest) = updated.history.first() {
                updated.value = latest.value.clone();
            }

            debug!(
                label = %updated.label,
                matched = matching.len(),
                history = updated.history.len(),
                "merged observation history"
            );
            updated
        })
        .collect()
}

fn label_matches(resource: &Value, label: &str) -> bool {
    let code = resource.get("code");
    let code_text = code
        .and_then(|c| c.get("text"))
        .and_then(|t| t.as_str());
    if code_text == Some(label) {
        return true;
    }
    code.and_then(|c| c.get("coding"))
        .and_then(|c| c.as_array())
        .is_some_and(|codings| {
            codings
                .iter()
                .any(|c| c.get("display").and_then(|d| d.as_str()) == Some(label))
        })
}

/// Extract the record's value by shape: custom extension first, then
/// quantity, coded concept, and free-text string.
fn resource_value(resource: &Value, extension_key: Option<&str>) -> Option<String> {
    if let Some(extensions) = resource.get("extension").and_then(|e| e.as_array()) {
        let key = extension_key?;
        let matching = extensions.iter().find(|ext| {
            ext.get("url")
                .and_then(|u| u.as_str())
                .is_some_and(|url| url.contains(key))
        })?;
        return matching
            .get("valueString")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| {
                matching
                    .get("valueQuantity")
                    .and_then(|q| q.get("value"))
                    .map(number_to_string)
            });
    }

    if let Some(quantity) = resource.get("valueQuantity") {
        return quantity.get("value").map(number_to_string);
    }

    if let Some(concept) = resource.get("valueCodeableConcept") {
        return concept
            .get("text")
            .and_then(|t| t.as_str())
            .map(str::to_string)
            .or_else(|| {
                concept
                    .get("coding")
                    .and_then(|c| c.get(0))
                    .and_then(|c| c.get("display"))
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            });
    }

    resource
        .get("valueString")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn number_to_string(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        other => other.as_str().unwrap_or_default().to_string(),
    }
}

fn resource_timestamp(resource: &Value) -> Option<FhirDateTime> {
    let raw = resource
        .get("effectiveDateTime")
        .and_then(|v| v.as_str())
        .or_else(|| {
            resource
                .get("meta")
                .and_then(|m| m.get("lastUpdated"))
                .and_then(|v| v.as_str())
        })?;
    raw.parse().ok()
}
