//! Pure order pricing: one total per pricing scheme, no side effects.

use crate::models::OrderLine;

/// Progressive discount brackets, evaluated once on the pre-discount sum.
pub const PROGRESSIVE_UPPER_THRESHOLD_CENTS: i64 = 700_000;
pub const PROGRESSIVE_UPPER_RATE: f64 = 0.20;
pub const PROGRESSIVE_LOWER_THRESHOLD_CENTS: i64 = 300_000;
pub const PROGRESSIVE_LOWER_RATE: f64 = 0.10;

/// Sum of line totals, in cents.
pub fn standard_total(lines: &[OrderLine]) -> i64 {
    lines.iter().map(|line| line.line_total_cents()).sum()
}

/// Flat percentage off the pre-discount sum. `percent` is 0-100; rounding
/// is to the nearest cent.
pub fn fixed_discount_total(lines: &[OrderLine], percent: f64) -> i64 {
    let subtotal = standard_total(lines);
    let discount = (subtotal as f64 * percent / 100.0).round() as i64;
    (subtotal - discount).max(0)
}

/// Bracket discount: 20% above the upper threshold, 10% above the lower,
/// otherwise none. The bracket is chosen from the pre-discount sum only.
pub fn progressive_total(lines: &[OrderLine]) -> i64 {
    let subtotal = standard_total(lines);
    let rate = if subtotal > PROGRESSIVE_UPPER_THRESHOLD_CENTS {
        PROGRESSIVE_UPPER_RATE
    } else if subtotal > PROGRESSIVE_LOWER_THRESHOLD_CENTS {
        PROGRESSIVE_LOWER_RATE
    } else {
        0.0
    };
    let discount = (subtotal as f64 * rate).round() as i64;
    (subtotal - discount).max(0)
}
