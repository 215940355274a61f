//! Outbound FHIR gateway: patient CRUD and search, observation history
//! paging, and concurrent submission of assessment payloads.

pub mod error;
pub mod gateway;
pub mod submit;

pub use error::ClientError;
pub use gateway::{FhirGateway, PatientSearch};
pub use submit::{SubmissionOutcome, SubmissionReport};
