//! CLI configuration.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use seating_core::configurator::ConfiguratorSettings;
use seating_core::money::{Currency, Money};
use seating_core::pricing::{FeeTier, ProtectionPlanSchedule};
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Storefront API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Protection-plan pricing.
    #[serde(default)]
    pub pricing: PricingConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config content; the format follows the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Get environment-specific config.
    pub fn for_environment(&self, env: &str) -> CliConfig {
        let mut config = self.clone();

        if let Some(env_config) = self.environments.get(env) {
            if let Some(ref api) = env_config.api {
                config.api = api.clone();
            }
            if let Some(ref pricing) = env_config.pricing {
                config.pricing = pricing.clone();
            }
        }

        config
    }

    /// Configurator tunables for prices in `currency`.
    pub fn settings(&self, currency: Currency) -> Result<ConfiguratorSettings> {
        Ok(ConfiguratorSettings {
            fetch_timeout: self.api.fetch_timeout(),
            submit_timeout: self.api.submit_timeout(),
            cart_path: self.api.cart_path.clone(),
            schedule: self.pricing.schedule(currency)?,
        })
    }
}

/// Storefront API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the storefront API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on the configuration fetch, in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Bound on the cart call, in milliseconds.
    #[serde(default = "default_submit_timeout_ms")]
    pub submit_timeout_ms: u64,

    /// Path navigated to after a successful addition.
    #[serde(default = "default_cart_path")]
    pub cart_path: String,

    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

fn default_submit_timeout_ms() -> u64 {
    10_000
}

fn default_cart_path() -> String {
    "/cart".to_string()
}

impl ApiConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            submit_timeout_ms: default_submit_timeout_ms(),
            cart_path: default_cart_path(),
            headers: HashMap::new(),
        }
    }
}

/// Protection-plan fee tiers, as decimal amounts in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,

    /// Fee above the highest tier.
    #[serde(default = "default_above")]
    pub above: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Inclusive upper bound of the band.
    pub up_to: f64,
    pub fee: f64,
}

fn default_tiers() -> Vec<TierConfig> {
    ProtectionPlanSchedule::default()
        .tiers()
        .iter()
        .map(|tier| TierConfig {
            up_to: Money::new(tier.up_to, Currency::USD).to_decimal(),
            fee: Money::new(tier.fee, Currency::USD).to_decimal(),
        })
        .collect()
}

fn default_above() -> f64 {
    Money::new(ProtectionPlanSchedule::default().above(), Currency::USD).to_decimal()
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
            above: default_above(),
        }
    }
}

impl PricingConfig {
    /// Build the schedule in minor units of `currency`.
    pub fn schedule(&self, currency: Currency) -> Result<ProtectionPlanSchedule> {
        let minor = |amount: f64| -> Result<i64> {
            Ok(Money::from_decimal(amount, currency)?.amount_cents)
        };
        let tiers = self
            .tiers
            .iter()
            .map(|tier| Ok(FeeTier::new(minor(tier.up_to)?, minor(tier.fee)?)))
            .collect::<Result<Vec<_>>>()?;
        ProtectionPlanSchedule::new(tiers, minor(self.above)?)
            .context("Invalid [pricing] section")
    }
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub api: Option<ApiConfig>,
    #[serde(default)]
    pub pricing: Option<PricingConfig>,
}

/// Generate a default seating.toml config file.
pub fn generate_default_config() -> String {
    r#"# Seating configurator configuration

[api]
base_url = "http://localhost:3000"
fetch_timeout_ms = 5000
submit_timeout_ms = 10000
cart_path = "/cart"

[pricing]
above = 199.0
tiers = [
    { up_to = 500.0, fee = 49.0 },
    { up_to = 1000.0, fee = 79.0 },
    { up_to = 1500.0, fee = 99.0 },
    { up_to = 2500.0, fee = 149.0 },
]

[logging]
level = "warn"
format = "compact"

[environments.staging.api]
base_url = "https://staging.example.com"
"#
    .to_string()
}
