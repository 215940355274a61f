//! Transcript-to-value extraction.

use std::ops::Range;

use regex::Regex;

use crate::entry::ObservationEntry;

/// Evaluate each observation's pattern against the transcript.
///
/// When the pattern matches, the first capture group replaces the current
/// value; otherwise the value is left unchanged. Produces a new list; the
/// input is not mutated.
pub fn extract(transcript: &str, observations: &[ObservationEntry]) -> Vec<ObservationEntry> {
    observations
        .iter()
        .map(|obs| {
            let mut updated = obs.clone();
            if let Some(capture) = obs
                .pattern
                .captures(transcript)
                .and_then(|c| c.get(1))
            {
                updated.value = capture.as_str().to_string();
            }
            updated
        })
        .collect()
}

/// Byte ranges of every pattern match in the transcript, for highlighting
/// the passages a value was pulled from.
pub fn highlight(transcript: &str, pattern: &Regex) -> Vec<Range<usize>> {
    pattern
        .find_iter(transcript)
        .map(|m| m.range())
        .collect()
}
