use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

pub const DEFAULT_CURRENCY: &str = "EUR";

/// The amount has too many integer digits to carry two decimal places.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("amount {0} cannot be written with two decimal places")]
pub struct AmountOutOfRange(pub Decimal);

/// Renders an amount with exactly two decimal places, e.g. `9.5` -> `9.50`.
pub fn format_amount(amount: Decimal) -> Result<String, AmountOutOfRange> {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.scale() != 2 {
        return Err(AmountOutOfRange(amount));
    }
    Ok(rounded.to_string())
}
