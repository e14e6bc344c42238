//! Money and percentage formatting.
//!
//! Amounts are kept exact everywhere else; rounding to cents happens here,
//! at the point an amount is shown or totalled for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places money is displayed with.
pub const MONEY_DECIMALS: u32 = 2;

/// Rounds an amount to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
	let mut rounded =
		amount.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
	rounded.rescale(MONEY_DECIMALS);
	rounded
}

/// Formats an amount as a currency string with exactly two decimals.
///
/// ```
/// use print_types::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(297, 2), "$"), "$2.97");
/// ```
pub fn format_money(amount: Decimal, currency: &str) -> String {
	format!("{}{}", currency, round_money(amount))
}

/// Formats a fractional rate such as `0.13` as `13%`.
pub fn format_percent(rate: Decimal) -> String {
	format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}
