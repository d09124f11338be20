//! Option catalog: the seating choices fetched for a configuration id, and
//! the loader that fetches them.

mod loader;

pub use loader::{CatalogLoader, CatalogSource, LoadState, LoadTicket, FETCH_FAILED_MESSAGE};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// A selectable seating variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatingOption {
    pub value: String,
    pub title: String,
}

impl SeatingOption {
    pub fn new(value: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
        }
    }
}

/// A selectable color variant, supplied by the caller with the render inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorOption {
    pub value: String,
    pub title: String,
}

impl ColorOption {
    pub fn new(value: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            title: title.into(),
        }
    }
}

/// Supplementary configuration fetched from `/api/configuration/{configId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalConfig {
    pub seating_options: Vec<SeatingOption>,
}

impl SupplementalConfig {
    pub fn new(seating_options: Vec<SeatingOption>) -> Self {
        Self { seating_options }
    }

    /// Decode a JSON payload and check its shape.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SourceError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Seating values must be non-empty and unique.
    pub fn validate(&self) -> Result<(), SourceError> {
        let mut seen = HashSet::new();
        for option in &self.seating_options {
            if option.value.trim().is_empty() {
                return Err(SourceError::Malformed(
                    "seating option with empty value".to_string(),
                ));
            }
            if !seen.insert(option.value.as_str()) {
                return Err(SourceError::Malformed(format!(
                    "duplicate seating option value: {}",
                    option.value
                )));
            }
        }
        Ok(())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    pub fn find(&self, value: &str) -> Option<&SeatingOption> {
        self.seating_options.iter().find(|o| o.value == value)
    }

    pub fn is_empty(&self) -> bool {
        self.seating_options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_format() {
        let body = br#"{"seatingOptions":[{"value":"sofa-a","title":"3-Seat Sofa"},{"value":"sofa-b","title":"Sectional"}]}"#;
        let config = SupplementalConfig::from_json(body).unwrap();
        assert_eq!(config.seating_options.len(), 2);
        assert_eq!(config.find("sofa-b").map(|o| o.title.as_str()), Some("Sectional"));
        assert!(!config.contains("sofa-c"));
    }

    #[test]
    fn test_decode_rejects_missing_field() {
        let err = SupplementalConfig::from_json(br#"{"options":[]}"#).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn test_decode_rejects_duplicates() {
        let body = br#"{"seatingOptions":[{"value":"a","title":"A"},{"value":"a","title":"Again"}]}"#;
        let err = SupplementalConfig::from_json(body).unwrap_err();
        assert_eq!(
            err,
            SourceError::Malformed("duplicate seating option value: a".to_string())
        );
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let config = SupplementalConfig::from_json(br#"{"seatingOptions":[]}"#).unwrap();
        assert!(config.is_empty());
    }
}
