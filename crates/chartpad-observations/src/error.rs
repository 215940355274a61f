use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("Invalid extraction pattern for '{label}': {source}")]
    InvalidPattern {
        label: String,
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_the_observation() {
        let source = regex::Regex::new("[").unwrap_err();
        let err = ObservationError::InvalidPattern {
            label: "Temperature".into(),
            source,
        };
        assert!(err.to_string().contains("Temperature"));
    }
}
