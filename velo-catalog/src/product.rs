use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CatalogError, CatalogResult};

/// Bike categories in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeType {
    Mountain,
    Road,
}

/// Suspension layout of a mountain bike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suspension {
    /// Front suspension only
    Hardtail = 0,
    /// Front and rear suspension
    Full = 1,
}

impl Suspension {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Suspension::Hardtail),
            1 => Some(Suspension::Full),
            _ => None,
        }
    }
}

/// Frame aerodynamics rating of a road bike, graded 1-3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AeroLevel {
    Standard = 1,
    SemiAero = 2,
    FullAero = 3,
}

impl AeroLevel {
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(AeroLevel::Standard),
            2 => Some(AeroLevel::SemiAero),
            3 => Some(AeroLevel::FullAero),
            _ => None,
        }
    }
}

/// Variant-specific bike data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeVariant {
    Mountain {
        suspension_model: String,
        suspension: Suspension,
    },
    Road {
        aero: AeroLevel,
    },
}

impl BikeVariant {
    pub fn bike_type(&self) -> BikeType {
        match self {
            BikeVariant::Mountain { .. } => BikeType::Mountain,
            BikeVariant::Road { .. } => BikeType::Road,
        }
    }
}

/// Single-field edit of a stored bike. The model is the inventory key and
/// stays immutable; everything else re-validates like construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeUpdate {
    FrameSize(f64),
    WheelSize(f64),
    GearCount(u32),
    Price(i64),
}

/// A bike variant offered by the shop.
///
/// Fields are private: mutation goes through the validated setters, so a
/// constructed bike always satisfies the positivity invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    model: String,
    frame_size: f64,
    wheel_size: f64,
    gear_count: u32,
    price_cents: i64,
    variant: BikeVariant,
}

impl Bike {
    /// Build a mountain bike. Price is in cents.
    pub fn mountain(
        model: String,
        frame_size: f64,
        wheel_size: f64,
        gear_count: u32,
        price_cents: i64,
        suspension_model: String,
        suspension: Suspension,
    ) -> CatalogResult<Self> {
        validate_token("suspension model", &suspension_model)?;
        Self::build(
            model,
            frame_size,
            wheel_size,
            gear_count,
            price_cents,
            BikeVariant::Mountain {
                suspension_model,
                suspension,
            },
        )
    }

    /// Build a road bike. Price is in cents.
    pub fn road(
        model: String,
        frame_size: f64,
        wheel_size: f64,
        gear_count: u32,
        price_cents: i64,
        aero: AeroLevel,
    ) -> CatalogResult<Self> {
        Self::build(
            model,
            frame_size,
            wheel_size,
            gear_count,
            price_cents,
            BikeVariant::Road { aero },
        )
    }

    fn build(
        model: String,
        frame_size: f64,
        wheel_size: f64,
        gear_count: u32,
        price_cents: i64,
        variant: BikeVariant,
    ) -> CatalogResult<Self> {
        validate_token("model", &model)?;
        validate_dimension("frame size", frame_size)?;
        validate_dimension("wheel size", wheel_size)?;
        if gear_count == 0 {
            return Err(CatalogError::InvalidArgument(
                "gear count must be positive".to_string(),
            ));
        }
        if price_cents <= 0 {
            return Err(CatalogError::InvalidArgument(
                "price must be positive".to_string(),
            ));
        }
        Ok(Self {
            model,
            frame_size,
            wheel_size,
            gear_count,
            price_cents,
            variant,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn frame_size(&self) -> f64 {
        self.frame_size
    }

    pub fn wheel_size(&self) -> f64 {
        self.wheel_size
    }

    pub fn gear_count(&self) -> u32 {
        self.gear_count
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    pub fn variant(&self) -> &BikeVariant {
        &self.variant
    }

    pub fn bike_type(&self) -> BikeType {
        self.variant.bike_type()
    }

    pub fn set_frame_size(&mut self, frame_size: f64) -> CatalogResult<()> {
        validate_dimension("frame size", frame_size)?;
        self.frame_size = frame_size;
        Ok(())
    }

    pub fn set_wheel_size(&mut self, wheel_size: f64) -> CatalogResult<()> {
        validate_dimension("wheel size", wheel_size)?;
        self.wheel_size = wheel_size;
        Ok(())
    }

    pub fn set_gear_count(&mut self, gear_count: u32) -> CatalogResult<()> {
        if gear_count == 0 {
            return Err(CatalogError::InvalidArgument(
                "gear count must be positive".to_string(),
            ));
        }
        self.gear_count = gear_count;
        Ok(())
    }

    pub fn set_price_cents(&mut self, price_cents: i64) -> CatalogResult<()> {
        if price_cents <= 0 {
            return Err(CatalogError::InvalidArgument(
                "price must be positive".to_string(),
            ));
        }
        self.price_cents = price_cents;
        Ok(())
    }

    /// Apply a single-field edit.
    pub fn apply(&mut self, update: BikeUpdate) -> CatalogResult<()> {
        match update {
            BikeUpdate::FrameSize(value) => self.set_frame_size(value),
            BikeUpdate::WheelSize(value) => self.set_wheel_size(value),
            BikeUpdate::GearCount(value) => self.set_gear_count(value),
            BikeUpdate::Price(value) => self.set_price_cents(value),
        }
    }
}

impl fmt::Display for Bike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            BikeVariant::Mountain {
                suspension_model,
                suspension,
            } => write!(
                f,
                "Mountain bike {}: frame {}\", wheels {}\", {} gears, {} ({:?}), ${:.2}",
                self.model,
                self.frame_size,
                self.wheel_size,
                self.gear_count,
                suspension_model,
                suspension,
                self.price_cents as f64 / 100.0,
            ),
            BikeVariant::Road { aero } => write!(
                f,
                "Road bike {}: frame {}\", wheels {}\", {} gears, aero {}/3, ${:.2}",
                self.model,
                self.frame_size,
                self.wheel_size,
                self.gear_count,
                aero.level(),
                self.price_cents as f64 / 100.0,
            ),
        }
    }
}

/// Model and suspension names end up as single whitespace-delimited tokens
/// in the persisted stream, so embedded whitespace would corrupt it.
pub(crate) fn validate_token(field: &str, value: &str) -> CatalogResult<()> {
    if value.is_empty() {
        return Err(CatalogError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CatalogError::InvalidArgument(format!(
            "{field} must not contain whitespace"
        )));
    }
    Ok(())
}

fn validate_dimension(field: &str, value: f64) -> CatalogResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CatalogError::InvalidArgument(format!(
            "{field} must be positive"
        )));
    }
    Ok(())
}
