//! Money arithmetic on decimal amounts.
//!
//! Catalog prices arrive in US dollars. The storefront displays whole
//! rupees, converting at a fixed rate and grouping digits the Indian way
//! (`₹1,23,456`).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fixed USD to INR display rate.
pub const USD_TO_INR_RATE: Decimal = Decimal::from_parts(83, 0, 0, false, 0);

/// Tax applied on top of the cart subtotal (18%).
pub const TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Multiply, saturating at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(if a.is_sign_negative() == b.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

/// Add, saturating at `Decimal::MAX`/`Decimal::MIN` instead of panicking.
fn saturating_add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or(if a.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

/// Convert a USD amount to whole rupees, rounding halves away from zero.
///
/// Amounts too large to convert saturate at `Decimal::MAX`.
#[must_use]
pub fn usd_to_inr(usd: Decimal) -> Decimal {
    saturating_mul(usd, USD_TO_INR_RATE)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Pre-discount price shown struck through next to the selling price.
///
/// Returned in the same currency as `price`, unrounded.
#[must_use]
pub fn original_price(price: Decimal, discount_percentage: Decimal) -> Decimal {
    let factor = Decimal::ONE
        .checked_add(discount_percentage / Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::MAX);
    saturating_mul(price, factor)
}

/// Format a rupee amount as `₹` plus Indian digit grouping.
///
/// The amount is rounded to whole rupees first.
///
/// ```rust
/// # use rust_decimal::Decimal;
/// # use zapkart_core::format_inr;
/// assert_eq!(format_inr(Decimal::from(12_345_678)), "₹1,23,45,678");
/// assert_eq!(format_inr(Decimal::from(999)), "₹999");
/// ```
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{sign}₹{}", group_indian(&digits))
}

/// Group an unsigned digit string as `xx,xx,xxx`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

/// Cart subtotal, tax and grand total in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartTotals {
    /// Sum of unit price times quantity over all lines.
    pub subtotal: Decimal,
    /// `subtotal * TAX_RATE`.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals from `(unit_price, quantity)` pairs.
    ///
    /// Sums that exceed the decimal range saturate rather than panic, so
    /// absurd prices restored from storage still produce a total.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, u64)>,
    {
        let subtotal = lines
            .into_iter()
            .map(|(price, quantity)| line_total(price, quantity))
            .fold(Decimal::ZERO, saturating_add);
        let tax = saturating_mul(subtotal, TAX_RATE);

        Self {
            subtotal,
            tax,
            total: saturating_add(subtotal, tax),
        }
    }
}

/// Unit price times quantity, saturating on overflow.
#[must_use]
pub fn line_total(price: Decimal, quantity: u64) -> Decimal {
    saturating_mul(price, Decimal::from(quantity))
}
