//! Flat-file persistence for the full shop state.
//!
//! The format is a single whitespace-delimited token stream in three
//! sections, in this order:
//!
//! 1. inventory: record count, then per record the bike fields
//!    (`type model frame wheel gears price variant-fields`) and quantity;
//! 2. statistics: total revenue in cents, then total units sold;
//! 3. orders: order count, then per order `type customer line-count`,
//!    each line item as a bike plus quantity, and a trailing discount
//!    percent for fixed-discount orders only.
//!
//! Bike type codes: 0 = mountain (suspension model + suspension code,
//! 0 hardtail / 1 full), 1 = road (aerodynamics level 1-3). Order type
//! codes: 0 = standard, 1 = fixed discount, 2 = progressive.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use velo_catalog::{AeroLevel, Bike, BikeVariant, Catalog, Suspension};
use velo_order::{Order, PricingScheme, ShopState};

const BIKE_MOUNTAIN: u8 = 0;
const BIKE_ROAD: u8 = 1;
const ORDER_STANDARD: u8 = 0;
const ORDER_FIXED_DISCOUNT: u8 = 1;
const ORDER_PROGRESSIVE: u8 = 2;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Write the full shop state to `path`, replacing whatever was there.
///
/// The three sections go out in sequence: the inventory write truncates
/// the file, statistics and orders append to it.
pub fn save(path: impl AsRef<Path>, catalog: &Catalog, state: &ShopState) -> Result<(), StoreError> {
    let path = path.as_ref();
    save_inventory(path, catalog)?;
    save_statistics(path, state)?;
    save_orders(path, state)?;
    tracing::info!(
        path = %path.display(),
        records = catalog.len(),
        orders = state.orders().len(),
        "shop state saved"
    );
    Ok(())
}

fn save_inventory(path: &Path, catalog: &Catalog) -> Result<(), StoreError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", catalog.len())?;
    // Sorted by model so the output is deterministic.
    for record in catalog.list() {
        write_bike(&mut out, record.bike())?;
        writeln!(out, " {}", record.quantity())?;
    }
    out.flush()?;
    Ok(())
}

fn save_statistics(path: &Path, state: &ShopState) -> Result<(), StoreError> {
    let mut out = BufWriter::new(OpenOptions::new().append(true).open(path)?);
    writeln!(out, "{}", state.total_revenue_cents())?;
    writeln!(out, "{}", state.total_units_sold())?;
    out.flush()?;
    Ok(())
}

fn save_orders(path: &Path, state: &ShopState) -> Result<(), StoreError> {
    let mut out = BufWriter::new(OpenOptions::new().append(true).open(path)?);
    writeln!(out, "{}", state.orders().len())?;
    for order in state.orders() {
        write!(
            out,
            "{} {} {}",
            scheme_code(order.pricing()),
            order.customer(),
            order.lines().len()
        )?;
        for line in order.lines() {
            write!(out, " ")?;
            write_bike(&mut out, line.bike())?;
            write!(out, " {}", line.quantity())?;
        }
        if let PricingScheme::FixedDiscount { percent } = order.pricing() {
            write!(out, " {percent}")?;
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn write_bike<W: Write>(out: &mut W, bike: &Bike) -> Result<(), StoreError> {
    write!(
        out,
        "{} {} {} {} {} {}",
        bike_code(bike),
        bike.model(),
        bike.frame_size(),
        bike.wheel_size(),
        bike.gear_count(),
        bike.price_cents()
    )?;
    match bike.variant() {
        BikeVariant::Mountain {
            suspension_model,
            suspension,
        } => write!(out, " {} {}", suspension_model, suspension.code())?,
        BikeVariant::Road { aero } => write!(out, " {}", aero.level())?,
    }
    Ok(())
}

fn bike_code(bike: &Bike) -> u8 {
    match bike.variant() {
        BikeVariant::Mountain { .. } => BIKE_MOUNTAIN,
        BikeVariant::Road { .. } => BIKE_ROAD,
    }
}

fn scheme_code(pricing: &PricingScheme) -> u8 {
    match pricing {
        PricingScheme::Standard => ORDER_STANDARD,
        PricingScheme::FixedDiscount { .. } => ORDER_FIXED_DISCOUNT,
        PricingScheme::Progressive => ORDER_PROGRESSIVE,
    }
}

/// Read a full shop state from `path`.
///
/// Every value is validated through the domain constructors, so a stream
/// that decodes but violates an invariant is still a parse error. The
/// result is a fresh pair; callers swap it in wholesale, which keeps
/// their previous state intact when a load fails.
pub fn load(path: impl AsRef<Path>) -> Result<(Catalog, ShopState), StoreError> {
    let path = path.as_ref();
    let mut input = String::new();
    File::open(path)?.read_to_string(&mut input)?;

    let mut reader = TokenReader::new(&input);

    let mut catalog = Catalog::new();
    let record_count: usize = reader.parse("inventory count")?;
    for _ in 0..record_count {
        let bike = read_bike(&mut reader)?;
        let quantity: u32 = reader.parse("stock quantity")?;
        catalog
            .add(bike, quantity)
            .map_err(|e| StoreError::Parse(format!("invalid inventory record: {e}")))?;
    }

    let total_revenue_cents: i64 = reader.parse("total revenue")?;
    let total_units_sold: u64 = reader.parse("units sold")?;

    let order_count: usize = reader.parse("order count")?;
    let mut orders = Vec::with_capacity(order_count);
    for _ in 0..order_count {
        orders.push(read_order(&mut reader)?);
    }

    reader.expect_end()?;

    tracing::info!(
        path = %path.display(),
        records = record_count,
        orders = order_count,
        "shop state loaded"
    );
    Ok((
        catalog,
        ShopState::from_parts(orders, total_units_sold, total_revenue_cents),
    ))
}

fn read_bike(reader: &mut TokenReader<'_>) -> Result<Bike, StoreError> {
    let type_code: u8 = reader.parse("bike type code")?;
    let model = reader.next("model")?.to_string();
    let frame_size: f64 = reader.parse("frame size")?;
    let wheel_size: f64 = reader.parse("wheel size")?;
    let gear_count: u32 = reader.parse("gear count")?;
    let price_cents: i64 = reader.parse("price")?;

    let bike = match type_code {
        BIKE_MOUNTAIN => {
            let suspension_model = reader.next("suspension model")?.to_string();
            let code: u8 = reader.parse("suspension code")?;
            let suspension = Suspension::from_code(code)
                .ok_or_else(|| StoreError::Parse(format!("unknown suspension code: {code}")))?;
            Bike::mountain(
                model,
                frame_size,
                wheel_size,
                gear_count,
                price_cents,
                suspension_model,
                suspension,
            )
        }
        BIKE_ROAD => {
            let level: u8 = reader.parse("aerodynamics level")?;
            let aero = AeroLevel::from_level(level)
                .ok_or_else(|| StoreError::Parse(format!("unknown aerodynamics level: {level}")))?;
            Bike::road(model, frame_size, wheel_size, gear_count, price_cents, aero)
        }
        other => return Err(StoreError::Parse(format!("unknown bike type code: {other}"))),
    };

    bike.map_err(|e| StoreError::Parse(format!("invalid bike record: {e}")))
}

fn read_order(reader: &mut TokenReader<'_>) -> Result<Order, StoreError> {
    let type_code: u8 = reader.parse("order type code")?;
    let customer = reader.next("customer name")?.to_string();
    let line_count: usize = reader.parse("line item count")?;

    let mut lines = Vec::with_capacity(line_count);
    for _ in 0..line_count {
        let bike = read_bike(reader)?;
        let quantity: u32 = reader.parse("line quantity")?;
        lines.push((bike, quantity));
    }

    // The discount percent trails the line items for fixed-discount orders.
    let pricing = match type_code {
        ORDER_STANDARD => PricingScheme::Standard,
        ORDER_FIXED_DISCOUNT => {
            let percent: f64 = reader.parse("discount percent")?;
            PricingScheme::FixedDiscount { percent }
        }
        ORDER_PROGRESSIVE => PricingScheme::Progressive,
        other => return Err(StoreError::Parse(format!("unknown order type code: {other}"))),
    };

    let mut order = Order::new(customer, pricing)
        .map_err(|e| StoreError::Parse(format!("invalid order record: {e}")))?;
    for (bike, quantity) in lines {
        order
            .add_line(&bike, quantity)
            .map_err(|e| StoreError::Parse(format!("invalid order line: {e}")))?;
    }
    Ok(order)
}

/// Whitespace tokenizer with positions for parse diagnostics.
struct TokenReader<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> TokenReader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            tokens: input.split_whitespace(),
            position: 0,
        }
    }

    fn next(&mut self, field: &str) -> Result<&'a str, StoreError> {
        self.position += 1;
        self.tokens.next().ok_or_else(|| {
            StoreError::Parse(format!(
                "unexpected end of input at token {} (expected {field})",
                self.position
            ))
        })
    }

    fn parse<T: FromStr>(&mut self, field: &str) -> Result<T, StoreError> {
        let token = self.next(field)?;
        token
            .parse()
            .map_err(|_| StoreError::Parse(format!("invalid {field} token: {token:?}")))
    }

    fn expect_end(&mut self) -> Result<(), StoreError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(token) => Err(StoreError::Parse(format!(
                "trailing data after declared records: {token:?}"
            ))),
        }
    }
}
