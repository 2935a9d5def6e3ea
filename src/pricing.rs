//! Prices

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR},
};
use thiserror::Error;

/// Currency every amount in the bar is expressed in.
pub const CURRENCY: &Currency = EUR;

/// Errors that can occur while deriving prices.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The tax-inclusive price does not fit in minor units.
    #[error("price {0} with tax rate {1} is out of range")]
    OutOfRange(i64, Decimal),
}

/// Builds an amount in the bar currency from minor units.
pub fn money(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, CURRENCY)
}

/// Derives the tax-inclusive price from a pre-tax price and a tax rate.
///
/// The fractional minor unit is dropped, which is how the backend computes the amount it charges.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] when the result does not fit in an `i64`.
pub fn tax_inclusive(price_ht: i64, tva: Decimal) -> Result<i64, PriceError> {
    Decimal::ONE
        .checked_add(tva)
        .and_then(|rate| Decimal::from(price_ht).checked_mul(rate))
        .and_then(|price| price.trunc().to_i64())
        .ok_or(PriceError::OutOfRange(price_ht, tva))
}

/// Formats an amount of minor units for display, e.g. `1500` becomes `"15.00 €"`.
pub fn format_price(minor: i64) -> String {
    format!("{:.2} €", money(minor).amount())
}
