//! Assessment session state machine.
//!
//! Ties the engine together the way the chart screen drives it: seeds are
//! loaded at mount, server history is merged in, a deep snapshot is taken as
//! the diff baseline, the transcript populates values, the user edits, and
//! only changed non-empty observations are shaped into submission payloads.
//! No IO happens here; a transport layer feeds in server records and carries
//! the payloads out.

use serde_json::Value;

use crate::catalog::seed_catalog;
use crate::diff::diff;
use crate::entry::ObservationEntry;
use crate::extract::extract;
use crate::history::merge_history;
use crate::resource::to_resource;

#[derive(Debug, Clone)]
pub struct AssessmentSession {
    entries: Vec<ObservationEntry>,
    baseline: Vec<ObservationEntry>,
}

impl AssessmentSession {
    /// Start a session from an explicit seed list.
    ///
    /// The seeds double as the initial diff baseline; merging server history
    /// re-baselines so fetched values do not count as user changes.
    pub fn new(seeds: Vec<ObservationEntry>) -> Self {
        Self {
            baseline: seeds.clone(),
            entries: seeds,
        }
    }

    /// Start a session from the built-in seed catalog.
    pub fn from_catalog() -> Self {
        Self::new(seed_catalog())
    }

    pub fn entries(&self) -> &[ObservationEntry] {
        &self.entries
    }

    /// Merge server-fetched observation resources and take the snapshot the
    /// later diff runs against. A failed fetch simply never calls this, and
    /// the session keeps its seed values.
    pub fn merge_server_records(&mut self, records: &[Value]) {
        self.entries = merge_history(records, &self.entries);
        self.baseline = self.entries.clone();
    }

    /// Re-run extraction over the latest transcript text.
    pub fn apply_transcript(&mut self, transcript: &str) {
        self.entries = extract(transcript, &self.entries);
    }

    /// Manual edit of a single observation's current value.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.value = value.into();
        }
    }

    /// Positions whose value changed since the snapshot.
    pub fn changed(&self) -> Vec<usize> {
        diff(&self.baseline, &self.entries)
    }

    /// Submission payloads for changed observations with non-empty values.
    pub fn submission_resources(&self, patient_id: &str) -> Vec<Value> {
        self.changed()
            .into_iter()
            .filter_map(|index| self.entries.get(index))
            .filter(|entry| entry.has_value())
            .map(|entry| to_resource(entry, patient_id))
            .collect()
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::from_catalog()
    }
}
