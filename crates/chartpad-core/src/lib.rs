pub mod bundle;
pub mod error;
pub mod patient;
pub mod time;

pub use bundle::{Bundle, BundleEntry, BundleLink};
pub use error::{CoreError, Result};
pub use patient::PatientRecord;
pub use time::{FhirDateTime, parse_fhir_date};
