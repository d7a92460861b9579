use std::path::Path;

use serde::Serialize;
use serde_json::json;

use velo_catalog::{Bike, BikeUpdate, Catalog, CatalogError, StockRecord};
use velo_order::{Order, OrderError, SettlementEngine, SettlementError, ShopState};
use velo_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-only statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_units_sold: u64,
    pub total_revenue_cents: i64,
}

/// The shop: one catalog and one order archive, exclusively owned.
///
/// This is the surface an embedding caller (console menu, service, ...)
/// talks to; every mutation funnels through the catalog's validated
/// operations or the settlement engine.
#[derive(Debug, Default)]
pub struct Shop {
    catalog: Catalog,
    state: ShopState,
    engine: SettlementEngine,
}

impl Shop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new bike with an initial stock level.
    pub fn add_bike(&mut self, bike: Bike, quantity: u32) -> Result<(), ShopError> {
        let model = bike.model().to_string();
        self.catalog.add(bike, quantity)?;
        tracing::info!(%model, quantity, "bike added");
        Ok(())
    }

    pub fn restock(&mut self, model: &str, quantity: u32) -> Result<(), ShopError> {
        self.catalog.restock(model, quantity)?;
        tracing::info!(model, quantity, "bike restocked");
        Ok(())
    }

    pub fn remove_bike(&mut self, model: &str) -> Result<(), ShopError> {
        self.catalog.remove(model)?;
        tracing::info!(model, "bike removed");
        Ok(())
    }

    pub fn edit_bike(&mut self, model: &str, update: BikeUpdate) -> Result<(), ShopError> {
        self.catalog.edit(model, update)?;
        tracing::info!(model, "bike edited");
        Ok(())
    }

    pub fn find_bike(&self, model: &str) -> Option<&StockRecord> {
        self.catalog.find_by_model(model)
    }

    /// Inventory records sorted by model.
    pub fn inventory(&self) -> Vec<&StockRecord> {
        self.catalog.list()
    }

    /// Settle an order against the inventory. All-or-nothing; the caller's
    /// order stays usable either way.
    pub fn ship(&mut self, order: &Order) -> Result<(), ShopError> {
        match self.engine.ship(order, &mut self.catalog, &mut self.state) {
            Ok(()) => {
                tracing::info!(
                    customer = order.customer(),
                    units = order.total_units(),
                    total_cents = order.total_cents(),
                    "order shipped"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(customer = order.customer(), %err, "order refused");
                Err(err.into())
            }
        }
    }

    /// Archived orders, in settlement order.
    pub fn orders(&self) -> &[Order] {
        self.state.orders()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_units_sold: self.state.total_units_sold(),
            total_revenue_cents: self.state.total_revenue_cents(),
        }
    }

    /// Statistics summary for reporting surfaces.
    pub fn statistics_report(&self) -> serde_json::Value {
        json!({
            "total_units_sold": self.state.total_units_sold(),
            "total_revenue_cents": self.state.total_revenue_cents(),
            "archived_orders": self.state.orders().len(),
        })
    }

    /// Snapshot the full shop state to the flat file at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ShopError> {
        velo_store::save(path, &self.catalog, &self.state)?;
        Ok(())
    }

    /// Restore the full shop state from the flat file at `path`.
    ///
    /// The swap is wholesale: on any error the previous in-memory state is
    /// left exactly as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ShopError> {
        let (catalog, state) = velo_store::load(path)?;
        self.catalog = catalog;
        self.state = state;
        Ok(())
    }
}
