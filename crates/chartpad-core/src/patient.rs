//! Flat patient demographics and their FHIR `Patient` wire translation.
//!
//! The FHIR wire format carries repeating names, telecom entries and
//! addresses; the data-entry surface works with a single flat record. The
//! translation here is intentionally lossy: only the first name entry, the
//! first phone/email telecom entries, and the first address survive a round
//! trip, because those are the only parts the entry forms edit.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Flat carrier for the patient demographics edited by the intake form.
///
/// All fields default to the empty string so a record extracted from a
/// sparse server resource is still a complete form payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Server-assigned logical id, absent for not-yet-created patients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub given_name: String,
    pub family_name: String,
    pub gender: String,
    pub birth_date: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: AddressRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl PatientRecord {
    /// Flatten a FHIR `Patient` resource into form-shaped fields.
    ///
    /// Mirrors what the edit screen needs: given names of the first name
    /// entry joined with spaces, the first telecom entry per system, the
    /// first address. Missing parts become empty strings.
    pub fn from_fhir(resource: &Value) -> Self {
        let first_name = resource.get("name").and_then(|n| n.get(0));
        let given_name = first_name
            .and_then(|n| n.get("given"))
            .and_then(|g| g.as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();
        let family_name = first_name
            .and_then(|n| n.get("family"))
            .and_then(|f| f.as_str())
            .unwrap_or_default()
            .to_string();

        let address = resource.get("address").and_then(|a| a.get(0));

        Self {
            id: resource
                .get("id")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            given_name,
            family_name,
            gender: str_field(resource, "gender"),
            birth_date: str_field(resource, "birthDate"),
            phone: telecom_value(resource, "phone"),
            email: telecom_value(resource, "email"),
            address: AddressRecord {
                line1: address
                    .and_then(|a| a.get("line"))
                    .and_then(|l| l.get(0))
                    .and_then(|l| l.as_str())
                    .unwrap_or_default()
                    .to_string(),
                city: address_field(address, "city"),
                state: address_field(address, "state"),
                postal_code: address_field(address, "postalCode"),
            },
        }
    }

    /// Shape the record into a FHIR `Patient` resource for create/update.
    ///
    /// Produces an official name, phone/email telecom entries, and a home
    /// address, matching what the registration flow submits.
    pub fn to_fhir(&self) -> Value {
        let mut resource = json!({
            "resourceType": "Patient",
            "name": [{
                "use": "official",
                "family": self.family_name,
                "given": [self.given_name],
            }],
            "gender": self.gender,
            "birthDate": self.birth_date,
            "telecom": [
                { "system": "phone", "value": self.phone },
                { "system": "email", "value": self.email },
            ],
            "address": [{
                "use": "home",
                "line": [self.address.line1],
                "city": self.address.city,
                "state": self.address.state,
                "postalCode": self.address.postal_code,
            }],
        });
        if let Some(id) = &self.id {
            resource["id"] = json!(id);
        }
        resource
    }
}

fn str_field(resource: &Value, field: &str) -> String {
    resource
        .get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn address_field(address: Option<&Value>, field: &str) -> String {
    address
        .and_then(|a| a.get(field))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn telecom_value(resource: &Value, system: &str) -> String {
    resource
        .get("telecom")
        .and_then(|t| t.as_array())
        .and_then(|entries| {
            entries
                .iter()
                .find(|e| e.get("system").and_then(|s| s.as_str()) == Some(system))
        })
        .and_then(|e| e.get("value"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}
