use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339};

/// RFC3339 instant as it appears in FHIR `effectiveDateTime` and
/// `meta.lastUpdated` fields. Ordering follows the underlying instant, which
/// is what observation history sorting relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FhirDateTime(pub OffsetDateTime);

impl FhirDateTime {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}

impl fmt::Display for FhirDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self.0.format(&Rfc3339).map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for FhirDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &Rfc3339).map_err(|e| {
            CoreError::invalid_date_time(format!("Failed to parse FHIR DateTime '{s}': {e}"))
        })?;
        Ok(FhirDateTime(datetime))
    }
}

impl Serialize for FhirDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self
            .0
            .format(&Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for FhirDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FhirDateTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a FHIR `date` (YYYY-MM-DD) into a calendar date. Rejects anything
/// that does not name a real day, e.g. 2023-02-30.
pub fn parse_fhir_date(s: &str) -> Result<Date> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(s, &format)
        .map_err(|e| CoreError::invalid_date(format!("Failed to parse date '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_and_displays_rfc3339() {
        let dt = FhirDateTime::from_str("2024-03-13T18:45:00Z").unwrap();
        assert_eq!(dt.0, datetime!(2024-03-13 18:45:00 UTC));
        assert_eq!(dt.to_string(), "2024-03-13T18:45:00Z");
    }

    #[test]
    fn parses_offsets_to_the_same_instant() {
        let utc = FhirDateTime::from_str("2024-03-13T18:45:00Z").unwrap();
        let offset = FhirDateTime::from_str("2024-03-13T20:45:00+02:00").unwrap();
        assert_eq!(utc.timestamp(), offset.timestamp());
    }

    #[test]
    fn rejects_garbage_datetimes() {
        assert!(FhirDateTime::from_str("not-a-date").is_err());
        assert!(FhirDateTime::from_str("2024-13-01T00:00:00Z").is_err());
        assert!(FhirDateTime::from_str("").is_err());
    }

    #[test]
    fn serde_round_trip() {
        let dt = FhirDateTime::from_str("2024-05-30T08:00:00Z").unwrap();
        let json = serde_json::to_string(&dt).unwrap();
        assert_eq!(json, "\"2024-05-30T08:00:00Z\"");
        let back: FhirDateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dt);
    }

    #[test]
    fn ordering_is_chronological() {
        let older = FhirDateTime::from_str("2024-03-12T09:30:00Z").unwrap();
        let newer = FhirDateTime::from_str("2024-03-13T18:45:00Z").unwrap();
        assert!(older < newer);
    }

    #[test]
    fn parses_real_calendar_dates() {
        let d = parse_fhir_date("1992-03-20").unwrap();
        assert_eq!(d.to_string(), "1992-03-20");
        // Leap day exists in 2024
        assert!(parse_fhir_date("2024-02-29").is_ok());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(parse_fhir_date("2023-02-30").is_err());
        assert!(parse_fhir_date("2023-13-01").is_err());
        assert!(parse_fhir_date("20-01-01").is_err());
        assert!(parse_fhir_date("").is_err());
    }

    #[test]
    fn invalid_date_error_names_the_input() {
        match parse_fhir_date("2023-02-30") {
            Err(CoreError::InvalidDate(msg)) => assert!(msg.contains("2023-02-30")),
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }
}
