//! Decimal amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end.

use rust_decimal::Decimal;

/// Signed contribution of a ledger line to an account balance.
///
/// Missing amounts count as zero.
#[must_use]
pub fn line_delta(debit: Option<Decimal>, credit: Option<Decimal>) -> Decimal {
    debit.unwrap_or(Decimal::ZERO) - credit.unwrap_or(Decimal::ZERO)
}

/// Formats an amount for API responses with two decimal places.
///
/// Uses banker's rounding so half-cent values never bias a column total.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
