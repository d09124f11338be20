//! Render inputs supplied by the page hosting the configurator.

use serde::{Deserialize, Serialize};

use crate::catalog::ColorOption;
use crate::error::ConfiguratorError;
use crate::ids::ConfigId;
use crate::money::{Currency, Money};
use crate::selection::SelectionDefaults;

/// A bare option value from the product's option collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub value: String,
}

impl OptionValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Seating-specific option collections of the product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingCollections {
    /// Color choices.
    #[serde(rename = "option1OptionsCollection", default)]
    pub option1_options_collection: Vec<OptionValue>,
    #[serde(default)]
    pub sofa: SofaCollections,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SofaCollections {
    /// Seating choices.
    #[serde(rename = "option2OptionsCollection", default)]
    pub option2_options_collection: Vec<OptionValue>,
}

impl SeatingCollections {
    /// First color and first seating entry.
    pub fn defaults(&self) -> SelectionDefaults {
        SelectionDefaults {
            color: self
                .option1_options_collection
                .first()
                .map(|o| o.value.clone()),
            seating_option: self
                .sofa
                .option2_options_collection
                .first()
                .map(|o| o.value.clone()),
        }
    }
}

/// Product configuration data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfig {
    /// Basis for the protection-plan fee.
    pub price_usd: f64,
}

/// Displayed base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPrice {
    pub currency: String,
    pub value: f64,
}

/// Everything the host page passes in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorProps {
    /// Collection name, e.g. "Luna".
    #[serde(default)]
    pub collection_title: String,
    #[serde(default)]
    pub seating: SeatingCollections,
    #[serde(default)]
    pub config: ProductConfig,
    pub price: DisplayPrice,
    #[serde(default)]
    pub colors_data: Vec<ColorOption>,
    pub config_id: ConfigId,
}

impl ConfiguratorProps {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn currency(&self) -> Result<Currency, ConfiguratorError> {
        Currency::parse(&self.price.currency)
    }

    /// Base price in the display currency.
    pub fn base_price(&self) -> Result<Money, ConfiguratorError> {
        Money::from_decimal(self.price.value, self.currency()?)
    }

    /// Fee basis, expressed in the display currency so it can be summed with
    /// the base price.
    pub fn fee_basis(&self) -> Result<Money, ConfiguratorError> {
        Money::from_decimal(self.config.price_usd, self.currency()?)
    }

    /// Title to show, if any.
    pub fn title(&self) -> Option<&str> {
        Some(self.collection_title.as_str()).filter(|t| !t.trim().is_empty())
    }

    pub fn color(&self, value: &str) -> Option<&ColorOption> {
        self.colors_data.iter().find(|c| c.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROPS: &str = r#"{
        "collectionTitle": "Luna",
        "seating": {
            "option1OptionsCollection": [{"value": "red"}, {"value": "blue"}],
            "sofa": {"option2OptionsCollection": [{"value": "sofa-a"}]}
        },
        "config": {"priceUsd": 899},
        "price": {"currency": "USD", "value": 999},
        "colorsData": [{"value": "red", "title": "Red"}, {"value": "blue", "title": "Blue"}],
        "configId": "cfg1"
    }"#;

    #[test]
    fn test_parse_props() {
        let props = ConfiguratorProps::from_json(PROPS).unwrap();
        assert_eq!(props.title(), Some("Luna"));
        assert_eq!(props.config_id, ConfigId::new("cfg1"));
        assert_eq!(props.base_price().unwrap(), Money::new(99_900, Currency::USD));
        assert_eq!(props.fee_basis().unwrap(), Money::new(89_900, Currency::USD));
        assert_eq!(props.color("blue").map(|c| c.title.as_str()), Some("Blue"));
    }

    #[test]
    fn test_defaults_take_first_entries() {
        let props = ConfiguratorProps::from_json(PROPS).unwrap();
        let defaults = props.seating.defaults();
        assert_eq!(defaults.color.as_deref(), Some("red"));
        assert_eq!(defaults.seating_option.as_deref(), Some("sofa-a"));
    }

    #[test]
    fn test_missing_collections_yield_empty_defaults() {
        let props = ConfiguratorProps::from_json(
            r#"{"price": {"currency": "CAD", "value": 10}, "configId": "cfg2"}"#,
        )
        .unwrap();
        assert!(props.seating.defaults().is_empty());
        assert_eq!(props.title(), None);
        assert_eq!(props.currency().unwrap(), Currency::CAD);
    }

    #[test]
    fn test_unknown_currency() {
        let props = ConfiguratorProps::from_json(
            r#"{"price": {"currency": "ZZZ", "value": 10}, "configId": "cfg2"}"#,
        )
        .unwrap();
        assert_eq!(
            props.base_price(),
            Err(ConfiguratorError::UnknownCurrency("ZZZ".to_string()))
        );
    }
}
