//! Seating configurator domain logic.
//!
//! This crate provides the framework-independent core of a storefront
//! seating configurator:
//!
//! - **Pricing**: base price plus a tiered protection-plan fee
//! - **Catalog**: seating options fetched per configuration id, with stale
//!   results discarded
//! - **Selection**: color and seating choice with sticky updates
//! - **Submission**: validation, cart call, navigation, double-submit guard
//! - **Configurator**: owns all of the above and derives what to display
//!
//! # Example
//!
//! ```rust,ignore
//! use seating_core::prelude::*;
//!
//! let configurator = Configurator::new(props, services, ConfiguratorSettings::default())?;
//! configurator.load_catalog().await;
//! configurator.seed_defaults();
//! configurator.select_seating("sectional");
//!
//! match configurator.add_to_cart().await {
//!     SubmissionOutcome::Succeeded => {}
//!     other => println!("{:?}", other),
//! }
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod configurator;
pub mod memory;
pub mod pricing;
pub mod props;
pub mod selection;
pub mod submission;

pub use error::{ConfiguratorError, SourceError};
pub use ids::ConfigId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfiguratorError, SourceError};
    pub use crate::ids::ConfigId;
    pub use crate::money::{Currency, Money};

    pub use crate::catalog::{
        CatalogLoader, CatalogSource, ColorOption, LoadState, LoadTicket, SeatingOption,
        SupplementalConfig,
    };
    pub use crate::configurator::{
        Configurator, ConfiguratorSettings, ConfiguratorView, ReadyView, Services,
    };
    pub use crate::pricing::{compute_total, FeeSchedule, FeeTier, PriceQuote, ProtectionPlanSchedule};
    pub use crate::props::ConfiguratorProps;
    pub use crate::selection::{ConfigurationSelection, SelectionStore, SelectionUpdate};
    pub use crate::submission::{
        CartAddition, CartService, Navigator, Rejection, SubmissionController, SubmissionOutcome,
        SubmissionState,
    };
}
