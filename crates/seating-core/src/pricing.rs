//! Protection-plan pricing.
//!
//! The displayed total is the base price plus a protection-plan surcharge.
//! The surcharge is a pure function of the product's fee basis, looked up in
//! a tiered schedule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfiguratorError;
use crate::money::Money;

/// Maps a product's base cost to a protection-plan surcharge.
///
/// Implementations must be deterministic: the same basis always yields the
/// same fee, in the basis' currency.
pub trait FeeSchedule: fmt::Debug + Send + Sync {
    /// Surcharge for the given basis. A zero basis yields a zero fee.
    fn fee_of(&self, basis: Money) -> Money;
}

/// One band of a tiered schedule, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    /// Inclusive upper bound of the band.
    pub up_to: i64,
    /// Fee charged inside the band.
    pub fee: i64,
}

impl FeeTier {
    pub const fn new(up_to: i64, fee: i64) -> Self {
        Self { up_to, fee }
    }
}

/// Tiered protection-plan schedule. Deserializing runs the same checks as
/// [`ProtectionPlanSchedule::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct ProtectionPlanSchedule {
    tiers: Vec<FeeTier>,
    above: i64,
}

#[derive(Deserialize)]
struct RawSchedule {
    tiers: Vec<FeeTier>,
    above: i64,
}

impl TryFrom<RawSchedule> for ProtectionPlanSchedule {
    type Error = ConfiguratorError;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        Self::new(raw.tiers, raw.above)
    }
}

impl ProtectionPlanSchedule {
    /// Build a schedule from ascending tiers and the fee charged above the
    /// highest tier.
    pub fn new(tiers: Vec<FeeTier>, above: i64) -> Result<Self, ConfiguratorError> {
        if above < 0 {
            return Err(ConfiguratorError::InvalidSchedule(
                "fee above the top tier is negative".to_string(),
            ));
        }
        for tier in &tiers {
            if tier.up_to <= 0 || tier.fee < 0 {
                return Err(ConfiguratorError::InvalidSchedule(format!(
                    "tier up to {} with fee {} is out of range",
                    tier.up_to, tier.fee
                )));
            }
        }
        if tiers.windows(2).any(|w| w[0].up_to >= w[1].up_to) {
            return Err(ConfiguratorError::InvalidSchedule(
                "tier bounds must be strictly ascending".to_string(),
            ));
        }
        Ok(Self { tiers, above })
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    pub fn above(&self) -> i64 {
        self.above
    }
}

impl Default for ProtectionPlanSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                FeeTier::new(50_000, 4_900),
                FeeTier::new(100_000, 7_900),
                FeeTier::new(150_000, 9_900),
                FeeTier::new(250_000, 14_900),
            ],
            above: 19_900,
        }
    }
}

impl FeeSchedule for ProtectionPlanSchedule {
    fn fee_of(&self, basis: Money) -> Money {
        if basis.amount_cents <= 0 {
            return Money::zero(basis.currency);
        }
        let fee = self
            .tiers
            .iter()
            .find(|tier| basis.amount_cents <= tier.up_to)
            .map(|tier| tier.fee)
            .unwrap_or(self.above);
        Money::new(fee, basis.currency)
    }
}

/// Total price: `base_price + fee_of(add_on_fee_basis)`.
pub fn compute_total(
    base_price: Money,
    add_on_fee_basis: Money,
    schedule: &dyn FeeSchedule,
) -> Result<Money, ConfiguratorError> {
    for amount in [base_price, add_on_fee_basis] {
        if amount.is_negative() {
            return Err(ConfiguratorError::InvalidAmount(amount.display()));
        }
    }
    base_price.checked_add(&schedule.fee_of(add_on_fee_basis))
}

/// Price inputs for the add-to-cart button. The total is derived on every
/// read and never cached.
#[derive(Debug, Clone, Copy)]
pub struct PriceQuote<'s> {
    pub base_price: Money,
    pub add_on_fee_basis: Money,
    schedule: &'s dyn FeeSchedule,
}

impl<'s> PriceQuote<'s> {
    pub fn new(base_price: Money, add_on_fee_basis: Money, schedule: &'s dyn FeeSchedule) -> Self {
        Self {
            base_price,
            add_on_fee_basis,
            schedule,
        }
    }

    /// Protection-plan surcharge.
    pub fn fee(&self) -> Money {
        self.schedule.fee_of(self.add_on_fee_basis)
    }

    pub fn total(&self) -> Result<Money, ConfiguratorError> {
        compute_total(self.base_price, self.add_on_fee_basis, self.schedule)
    }

    /// Total formatted for display, e.g. "$1078.00".
    pub fn display_total(&self) -> Result<String, ConfiguratorError> {
        self.total().map(|total| total.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn usd(cents: i64) -> Money {
        Money::new(cents, Currency::USD)
    }

    #[test]
    fn test_zero_basis_has_no_fee() {
        let schedule = ProtectionPlanSchedule::default();
        assert_eq!(compute_total(usd(10_000), usd(0), &schedule).unwrap(), usd(10_000));
    }

    #[test]
    fn test_compute_total_is_pure() {
        let schedule = ProtectionPlanSchedule::default();
        let first = compute_total(usd(99_900), usd(89_900), &schedule).unwrap();
        let second = compute_total(usd(99_900), usd(89_900), &schedule).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, usd(99_900 + 7_900));
    }

    #[test]
    fn test_tier_bounds_are_inclusive() {
        let schedule = ProtectionPlanSchedule::default();
        assert_eq!(schedule.fee_of(usd(1)), usd(4_900));
        assert_eq!(schedule.fee_of(usd(50_000)), usd(4_900));
        assert_eq!(schedule.fee_of(usd(50_001)), usd(7_900));
        assert_eq!(schedule.fee_of(usd(250_000)), usd(14_900));
        assert_eq!(schedule.fee_of(usd(250_001)), usd(19_900));
    }

    #[test]
    fn test_fee_follows_basis_currency() {
        let schedule = ProtectionPlanSchedule::default();
        let fee = schedule.fee_of(Money::new(60_000, Currency::CAD));
        assert_eq!(fee.currency, Currency::CAD);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let schedule = ProtectionPlanSchedule::default();
        assert!(matches!(
            compute_total(usd(-1), usd(0), &schedule),
            Err(ConfiguratorError::InvalidAmount(_))
        ));
        assert!(compute_total(usd(100), usd(-5), &schedule).is_err());
    }

    #[test]
    fn test_currency_mismatch_is_an_error() {
        let schedule = ProtectionPlanSchedule::default();
        let result = compute_total(usd(100), Money::new(100, Currency::EUR), &schedule);
        assert!(matches!(result, Err(ConfiguratorError::CurrencyMismatch { .. })));
    }

    #[test]
    fn test_schedule_validation() {
        assert!(ProtectionPlanSchedule::new(vec![FeeTier::new(100, 10)], 20).is_ok());
        assert!(ProtectionPlanSchedule::new(
            vec![FeeTier::new(100, 10), FeeTier::new(100, 20)],
            30
        )
        .is_err());
        assert!(ProtectionPlanSchedule::new(vec![FeeTier::new(100, -1)], 20).is_err());
        assert!(ProtectionPlanSchedule::new(vec![], -1).is_err());
    }

    #[test]
    fn test_deserialized_schedule_is_validated() {
        let schedule: ProtectionPlanSchedule = serde_json::from_str(
            r#"{"tiers": [{"up_to": 100, "fee": 10}, {"up_to": 200, "fee": 15}], "above": 20}"#,
        )
        .unwrap();
        assert_eq!(schedule.fee_of(usd(150)), usd(15));

        let err = serde_json::from_str::<ProtectionPlanSchedule>(
            r#"{"tiers": [{"up_to": 200, "fee": 10}, {"up_to": 100, "fee": 15}], "above": 20}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));

        assert!(serde_json::from_str::<ProtectionPlanSchedule>(r#"{"tiers": [], "above": -5}"#)
            .is_err());
    }

    #[test]
    fn test_empty_schedule_charges_flat_fee() {
        let schedule = ProtectionPlanSchedule::new(vec![], 2_500).unwrap();
        assert_eq!(schedule.fee_of(usd(10)), usd(2_500));
        assert_eq!(schedule.fee_of(usd(0)), usd(0));
    }

    #[test]
    fn test_quote_display_total() {
        let schedule = ProtectionPlanSchedule::default();
        let quote = PriceQuote::new(usd(99_900), usd(89_900), &schedule);
        assert_eq!(quote.fee(), usd(7_900));
        assert_eq!(quote.display_total().unwrap(), "$1078.00");
    }
}
