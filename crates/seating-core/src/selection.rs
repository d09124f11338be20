//! The shopper's in-progress color and seating choice.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current selection. Both fields start unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSelection {
    pub color: Option<String>,
    pub seating_option: Option<String>,
}

impl ConfigurationSelection {
    pub fn new(color: impl Into<String>, seating_option: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            seating_option: Some(seating_option.into()),
        }
    }

    /// Color, ignoring empty strings.
    pub fn color(&self) -> Option<&str> {
        non_empty(self.color.as_deref())
    }

    /// Seating option, ignoring empty strings.
    pub fn seating_option(&self) -> Option<&str> {
        non_empty(self.seating_option.as_deref())
    }

    /// Both fields hold a value.
    pub fn is_complete(&self) -> bool {
        self.color().is_some() && self.seating_option().is_some()
    }

    /// Names of the fields still unset.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.color().is_none() {
            missing.push("color");
        }
        if self.seating_option().is_none() {
            missing.push("seating option");
        }
        missing
    }
}

/// Partial update from a user interaction. Unset or empty fields leave the
/// current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionUpdate {
    pub color: Option<String>,
    pub seating_option: Option<String>,
}

impl SelectionUpdate {
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            color: Some(value.into()),
            seating_option: None,
        }
    }

    pub fn seating_option(value: impl Into<String>) -> Self {
        Self {
            color: None,
            seating_option: Some(value.into()),
        }
    }
}

/// Default values taken from the product's initial option collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDefaults {
    pub color: Option<String>,
    pub seating_option: Option<String>,
}

impl SelectionDefaults {
    /// No collection had a usable first entry.
    pub fn is_empty(&self) -> bool {
        non_empty(self.color.as_deref()).is_none()
            && non_empty(self.seating_option.as_deref()).is_none()
    }
}

/// Holds the selection for the configurator's lifetime.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selection: ConfigurationSelection,
    seeded: bool,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &ConfigurationSelection {
        &self.selection
    }

    /// True once a seed has been applied.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Fill unset fields from `defaults`.
    ///
    /// Does nothing while the defaults are empty, and never replaces a value
    /// the shopper already chose. Returns whether anything changed.
    pub fn seed(&mut self, defaults: &SelectionDefaults) -> bool {
        if defaults.is_empty() {
            return false;
        }
        self.seeded = true;

        let mut changed = false;
        if self.selection.color().is_none() {
            if let Some(color) = non_empty(defaults.color.as_deref()) {
                self.selection.color = Some(color.to_string());
                changed = true;
            }
        }
        if self.selection.seating_option().is_none() {
            if let Some(seating) = non_empty(defaults.seating_option.as_deref()) {
                self.selection.seating_option = Some(seating.to_string());
                changed = true;
            }
        }
        debug!(changed, selection = ?self.selection, "selection seeded");
        changed
    }

    /// Sticky merge: supplied non-empty fields replace current values,
    /// everything else is kept.
    pub fn update(&mut self, update: SelectionUpdate) {
        if let Some(color) = update.color.filter(|c| !c.is_empty()) {
            self.selection.color = Some(color);
        }
        if let Some(seating) = update.seating_option.filter(|s| !s.is_empty()) {
            self.selection.seating_option = Some(seating);
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
