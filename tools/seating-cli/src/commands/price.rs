//! Compute a protection-plan total.

use anyhow::{Context as _, Result};
use seating_core::money::{Currency, Money};
use seating_core::pricing::{FeeSchedule, PriceQuote};
use serde::Serialize;

use super::PriceArgs;
use crate::context::Context;

#[derive(Serialize)]
struct PriceReport {
    currency: &'static str,
    base_price: String,
    fee_basis: String,
    fee: String,
    total: String,
}

/// Run the price command.
pub async fn run(args: PriceArgs, ctx: &Context) -> Result<()> {
    let currency = Currency::parse(&args.currency)?;
    let schedule = ctx.config.pricing.schedule(currency)?;

    let base = Money::from_decimal(args.base, currency).context("Invalid --base")?;
    let basis = Money::from_decimal(args.fee_basis, currency).context("Invalid --fee-basis")?;

    let quote = PriceQuote::new(base, basis, &schedule);
    let total = quote.total()?;
    let report = PriceReport {
        currency: currency.code(),
        base_price: base.display(),
        fee_basis: basis.display(),
        fee: schedule.fee_of(basis).display(),
        total: total.display(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Price");
    ctx.output.kv("Base price", &report.base_price);
    ctx.output.kv("Fee basis", &report.fee_basis);
    ctx.output.kv("Protection plan", &report.fee);
    ctx.output.kv("Total", &report.total);

    Ok(())
}
