//! Observation extraction & diff engine.
//!
//! An assessment screen maintains a list of labeled observations, each with
//! a pattern used to pull its value out of a free-text transcript. Server
//! history is merged in, a snapshot is taken, and only observations whose
//! value changed against that snapshot are shaped into resource payloads
//! for submission.

pub mod catalog;
pub mod diff;
pub mod entry;
pub mod error;
pub mod extract;
pub mod history;
pub mod resource;
pub mod session;

pub use catalog::seed_catalog;
pub use diff::{changed_entries, diff};
pub use entry::{HistoryEntry, ObservationEntry, ResourceKind};
pub use error::ObservationError;
pub use extract::{extract, highlight};
pub use history::merge_history;
pub use resource::to_resource;
pub use session::AssessmentSession;
