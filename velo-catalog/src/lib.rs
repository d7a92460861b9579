pub mod inventory;
pub mod product;

pub use inventory::{Catalog, StockRecord};
pub use product::{AeroLevel, Bike, BikeVariant, BikeType, BikeUpdate, Suspension};

/// Catalog and product errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Duplicate model: {0}")]
    DuplicateModel(String),

    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("Insufficient stock for {model}: requested {requested}, available {available}")]
    InsufficientStock {
        model: String,
        requested: u32,
        available: u32,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
