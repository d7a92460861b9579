use std::fmt;

use serde::{Deserialize, Serialize};

use velo_catalog::Bike;

use crate::pricing;

/// Pricing variant applied to an order total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingScheme {
    /// Sum of line totals, no discount
    Standard,
    /// Flat percentage off the pre-discount sum
    FixedDiscount { percent: f64 },
    /// Bracket rate selected by the pre-discount sum
    Progressive,
}

/// One line of an order: a bike snapshot and the quantity requested.
///
/// The snapshot is an independent copy and the line total is frozen when
/// the line is built; later catalog price edits do not reprice it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    bike: Bike,
    quantity: u32,
    line_total_cents: i64,
}

impl OrderLine {
    pub fn new(bike: &Bike, quantity: u32) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidArgument(
                "line quantity must be positive".to_string(),
            ));
        }
        Ok(Self {
            bike: bike.clone(),
            quantity,
            line_total_cents: bike.price_cents() * i64::from(quantity),
        })
    }

    pub fn bike(&self) -> &Bike {
        &self.bike
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total_cents(&self) -> i64 {
        self.line_total_cents
    }
}

/// A customer order: line items plus the pricing scheme that totals them.
///
/// Building an order touches no inventory; stock only moves when the
/// settlement engine ships it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    customer: String,
    lines: Vec<OrderLine>,
    pricing: PricingScheme,
}

impl Order {
    pub fn new(customer: String, pricing: PricingScheme) -> Result<Self, OrderError> {
        if customer.is_empty() {
            return Err(OrderError::InvalidArgument(
                "customer name must not be empty".to_string(),
            ));
        }
        // Customer names are single tokens in the persisted stream.
        if customer.chars().any(char::is_whitespace) {
            return Err(OrderError::InvalidArgument(
                "customer name must not contain whitespace".to_string(),
            ));
        }
        if let PricingScheme::FixedDiscount { percent } = pricing {
            if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
                return Err(OrderError::InvalidArgument(format!(
                    "discount percent out of range 0-100: {percent}"
                )));
            }
        }
        Ok(Self {
            customer,
            lines: Vec::new(),
            pricing,
        })
    }

    /// Append a line; its total is fixed from the bike's current price.
    pub fn add_line(&mut self, bike: &Bike, quantity: u32) -> Result<(), OrderError> {
        self.lines.push(OrderLine::new(bike, quantity)?);
        Ok(())
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn pricing(&self) -> &PricingScheme {
        &self.pricing
    }

    /// Total price under this order's pricing scheme, in cents.
    pub fn total_cents(&self) -> i64 {
        match self.pricing {
            PricingScheme::Standard => pricing::standard_total(&self.lines),
            PricingScheme::FixedDiscount { percent } => {
                pricing::fixed_discount_total(&self.lines, percent)
            }
            PricingScheme::Progressive => pricing::progressive_total(&self.lines),
        }
    }

    /// Units requested across all lines.
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customer: {}", self.customer)?;
        writeln!(f, "Total: ${:.2}", self.total_cents() as f64 / 100.0)?;
        for line in &self.lines {
            writeln!(f, "  {} x{}", line.bike(), line.quantity())?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
