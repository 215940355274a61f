//! The patient-intake schema: the registration/edit form described as field
//! descriptors, plus the extraction used to validate FHIR-shaped submissions
//! with the same engine the form uses.

use crate::compiled::{CompiledSchema, FormData, compile};
use crate::error::FormError;
use crate::field::FieldDescriptor;
use crate::rules::{PredicateRegistry, ValidationRule};
use chartpad_core::PatientRecord;

/// Letters, hyphens, apostrophes, periods and spaces.
const NAME_PATTERN: &str = r"^[a-zA-Z-'. ]+$";
/// Optional leading +, then digits, hyphens, parentheses, periods and
/// spaces; 7 to 15 characters.
const PHONE_PATTERN: &str = r"^\+?[0-9()\-.\s]{7,15}$";

/// Field descriptors for patient registration and edit.
pub fn patient_intake_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::section_break("Identity"),
        FieldDescriptor::text("givenName", "Given Name")
            .required()
            .rule(ValidationRule::max(
                50,
                "Given name must be less than 50 characters",
            ))
            .rule(ValidationRule::pattern(
                NAME_PATTERN,
                "Given name contains invalid characters",
            )),
        FieldDescriptor::text("familyName", "Family Name")
            .required()
            .rule(ValidationRule::max(
                50,
                "Family name must be less than 50 characters",
            ))
            .rule(ValidationRule::pattern(
                NAME_PATTERN,
                "Family name contains invalid characters",
            )),
        FieldDescriptor::select("gender", "Gender", ["male", "female", "other"]).required(),
        FieldDescriptor::date("birthDate", "Date of Birth")
            .required()
            .rule(ValidationRule::custom(
                "plausible_birth_date",
                "Invalid date of birth",
            )),
        FieldDescriptor::section_break("Contact"),
        FieldDescriptor::text("phone", "Phone")
            .required()
            .rule(ValidationRule::pattern(
                PHONE_PATTERN,
                "Invalid phone number format",
            )),
        FieldDescriptor::text("email", "Email").rule(ValidationRule::email("Invalid email format")),
        FieldDescriptor::section_break("Address"),
        FieldDescriptor::text("address.line1", "Address Line"),
        FieldDescriptor::text("address.city", "City"),
        FieldDescriptor::text("address.state", "State"),
        FieldDescriptor::text("address.postalCode", "Postal Code"),
    ]
}

/// Compile the intake schema against the builtin predicate registry.
pub fn compile_intake() -> Result<CompiledSchema, FormError> {
    compile(&patient_intake_fields(), &PredicateRegistry::with_builtins())
}

/// Map a flat patient record onto intake form data.
pub fn intake_data(record: &PatientRecord) -> FormData {
    FormData::from_pairs([
        ("givenName", record.given_name.as_str()),
        ("familyName", record.family_name.as_str()),
        ("gender", record.gender.as_str()),
        ("birthDate", record.birth_date.as_str()),
        ("phone", record.phone.as_str()),
        ("email", record.email.as_str()),
        ("address.line1", record.address.line1.as_str()),
        ("address.city", record.address.city.as_str()),
        ("address.state", record.address.state.as_str()),
        ("address.postalCode", record.address.postal_code.as_str()),
    ])
}
