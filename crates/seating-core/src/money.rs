//! Exact prices in minor currency units.
//!
//! Storefront inputs arrive as decimals and are converted once, at the
//! boundary. Everything past that point adds integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfiguratorError;

/// Currencies a storefront can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    CAD,
    EUR,
    GBP,
    AUD,
    JPY,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::USD,
        Currency::CAD,
        Currency::EUR,
        Currency::GBP,
        Currency::AUD,
        Currency::JPY,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::CAD => "CAD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::CAD => "CA$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::AUD => "A$",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Digits after the decimal point.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Minor units in one major unit (100 for cents).
    fn scale(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }

    /// Parse a code, case-insensitively.
    pub fn parse(code: &str) -> Result<Self, ConfiguratorError> {
        let wanted = code.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfiguratorError::UnknownCurrency(code.to_string()))
    }
}

impl FromStr for Currency {
    type Err = ConfiguratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An amount in the smallest unit of its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Minor units (cents for USD, yen for JPY).
    pub amount_cents: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Convert a decimal amount, rounding to the nearest minor unit.
    ///
    /// ```
    /// use seating_core::money::{Money, Currency};
    /// let price = Money::from_decimal(899.99, Currency::USD).unwrap();
    /// assert_eq!(price.amount_cents, 89_999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Result<Self, ConfiguratorError> {
        if !amount.is_finite() {
            return Err(ConfiguratorError::InvalidAmount(amount.to_string()));
        }
        let minor = (amount * currency.scale() as f64).round();
        if minor.abs() >= i64::MAX as f64 {
            return Err(ConfiguratorError::Overflow);
        }
        Ok(Self::new(minor as i64, currency))
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / self.currency.scale() as f64
    }

    /// Symbol and fixed decimals, e.g. "$1078.00".
    pub fn display(&self) -> String {
        self.to_string()
    }

    /// Sum of two amounts in the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, ConfiguratorError> {
        if self.currency != other.currency {
            return Err(ConfiguratorError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|sum| Money::new(sum, self.currency))
            .ok_or(ConfiguratorError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let symbol = self.currency.symbol();
        let places = self.currency.decimal_places();
        let amount = self.amount_cents.unsigned_abs();
        if places == 0 {
            return write!(f, "{}{}{}", sign, symbol, amount);
        }
        let scale = 10_u64.pow(places);
        write!(
            f,
            "{}{}{}.{:0places$}",
            sign,
            symbol,
            amount / scale,
            amount % scale,
            places = places as usize
        )
    }
}
