//! Newtype identifiers.
//!
//! A configuration id names the purchasable variant the shopper is
//! configuring. It is also the `variantId` sent with a cart addition, so it
//! travels as a plain JSON string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a configurable product variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigId(String);

impl ConfigId {
    /// Create a new ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// True when the id is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConfigId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConfigId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ConfigId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_string() {
        let id: ConfigId = "cfg-456".into();
        assert_eq!(id.as_str(), "cfg-456");
        assert_eq!(format!("{}", id), "cfg-456");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ConfigId::new("luna-sofa");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"luna-sofa\"");

        let parsed: ConfigId = serde_json::from_str("\"ciello-3\"").unwrap();
        assert_eq!(parsed, ConfigId::new("ciello-3"));
    }

    #[test]
    fn test_blank_id() {
        assert!(ConfigId::new("").is_blank());
        assert!(ConfigId::new("   ").is_blank());
        assert!(!ConfigId::new("cfg1").is_blank());
    }
}
