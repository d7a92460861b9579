use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use velo_catalog::{Catalog, CatalogError};

use crate::models::Order;

/// Shop-wide order archive and running statistics.
///
/// Mutated only by [`SettlementEngine::ship`]; everything else gets a
/// read-only view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopState {
    orders: Vec<Order>,
    total_units_sold: u64,
    total_revenue_cents: i64,
}

impl ShopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from persisted parts.
    pub fn from_parts(
        orders: Vec<Order>,
        total_units_sold: u64,
        total_revenue_cents: i64,
    ) -> Self {
        Self {
            orders,
            total_units_sold,
            total_revenue_cents,
        }
    }

    /// Archived orders, in settlement order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn total_units_sold(&self) -> u64 {
        self.total_units_sold
    }

    pub fn total_revenue_cents(&self) -> i64 {
        self.total_revenue_cents
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum SettlementError {
    #[error("Insufficient stock for {model}: requested {requested}, available {available}")]
    InsufficientStock {
        model: String,
        requested: u32,
        available: u32,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Settles orders against the catalog: the only path by which an order
/// affects stock or statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Read-only availability check for every order line.
    ///
    /// Demand is aggregated per model first: an order naming the same
    /// model on several lines is checked as one combined request.
    pub fn check_availability(
        &self,
        order: &Order,
        catalog: &Catalog,
    ) -> Result<(), SettlementError> {
        let mut demand: HashMap<&str, u32> = HashMap::new();
        for line in order.lines() {
            *demand.entry(line.bike().model()).or_insert(0) += line.quantity();
        }

        for line in order.lines() {
            let model = line.bike().model();
            let requested = demand[model];
            let available = catalog
                .find_by_model(model)
                .map(|record| record.quantity())
                .unwrap_or(0);
            if available < requested {
                return Err(SettlementError::InsufficientStock {
                    model: model.to_string(),
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }

    /// Commit an order: decrement stock per line, archive an independent
    /// copy, and update the running totals.
    ///
    /// All-or-nothing: a refused order leaves catalog and state untouched.
    /// Availability is fully verified before the first decrement.
    pub fn ship(
        &self,
        order: &Order,
        catalog: &mut Catalog,
        state: &mut ShopState,
    ) -> Result<(), SettlementError> {
        self.check_availability(order, catalog)?;

        for line in order.lines() {
            catalog.decrease(line.bike().model(), line.quantity())?;
        }

        state.orders.push(order.clone());
        state.total_units_sold += order.total_units();
        state.total_revenue_cents += order.total_cents();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PricingScheme;
    use velo_catalog::{Bike, Suspension};

    fn trail_x() -> Bike {
        Bike::mountain(
            "Trail-X".to_string(),
            18.0,
            27.5,
            21,
            120_000,
            "RockShox".to_string(),
            Suspension::Hardtail,
        )
        .unwrap()
    }

    fn stocked_catalog(quantity: u32) -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add(trail_x(), quantity).unwrap();
        catalog
    }

    fn order_for(quantity: u32) -> Order {
        let mut order = Order::new("Ira".to_string(), PricingScheme::Standard).unwrap();
        order.add_line(&trail_x(), quantity).unwrap();
        order
    }

    #[test]
    fn test_ship_rejects_insufficient_stock_without_mutation() {
        let mut catalog = stocked_catalog(3);
        let mut state = ShopState::new();
        let order = order_for(5);

        let err = SettlementEngine::new()
            .ship(&order, &mut catalog, &mut state)
            .unwrap_err();
        assert_eq!(
            err,
            SettlementError::InsufficientStock {
                model: "Trail-X".to_string(),
                requested: 5,
                available: 3,
            }
        );

        // Nothing moved: stock, archive and totals are all untouched.
        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 3);
        assert_eq!(state, ShopState::new());
    }

    #[test]
    fn test_ship_decrements_archives_and_counts() {
        let mut catalog = stocked_catalog(5);
        let mut state = ShopState::new();
        let engine = SettlementEngine::new();
        let order = order_for(2);

        engine.ship(&order, &mut catalog, &mut state).unwrap();

        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 3);
        assert_eq!(state.orders().len(), 1);
        assert_eq!(state.total_units_sold(), 2);
        assert_eq!(state.total_revenue_cents(), 240_000);

        // Re-shipping re-checks from scratch: one more fits, the third
        // attempt finds only 1 unit left and is refused.
        engine.ship(&order, &mut catalog, &mut state).unwrap();
        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 1);

        let err = engine.ship(&order, &mut catalog, &mut state).unwrap_err();
        assert!(matches!(err, SettlementError::InsufficientStock { .. }));
        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 1);
        assert_eq!(state.orders().len(), 2);
    }

    #[test]
    fn test_check_aggregates_demand_across_lines() {
        let catalog = stocked_catalog(3);
        let mut order = Order::new("Ira".to_string(), PricingScheme::Standard).unwrap();
        order.add_line(&trail_x(), 2).unwrap();
        order.add_line(&trail_x(), 2).unwrap();

        // Each line alone fits the stock of 3; together they do not.
        let err = SettlementEngine::new()
            .check_availability(&order, &catalog)
            .unwrap_err();
        assert_eq!(
            err,
            SettlementError::InsufficientStock {
                model: "Trail-X".to_string(),
                requested: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn test_unknown_model_reads_as_zero_stock() {
        let catalog = Catalog::new();
        let order = order_for(1);

        let err = SettlementEngine::new()
            .check_availability(&order, &catalog)
            .unwrap_err();
        assert_eq!(
            err,
            SettlementError::InsufficientStock {
                model: "Trail-X".to_string(),
                requested: 1,
                available: 0,
            }
        );
    }

    #[test]
    fn test_archived_copy_is_independent_of_later_catalog_edits() {
        let mut catalog = stocked_catalog(5);
        let mut state = ShopState::new();
        let order = order_for(1);

        SettlementEngine::new()
            .ship(&order, &mut catalog, &mut state)
            .unwrap();
        catalog
            .edit("Trail-X", velo_catalog::BikeUpdate::Price(999_900))
            .unwrap();

        // Historical totals stay at the snapshot price.
        assert_eq!(state.orders()[0].total_cents(), 120_000);
    }

    #[test]
    fn test_empty_order_ships_with_zero_effect() {
        let mut catalog = stocked_catalog(1);
        let mut state = ShopState::new();
        let order = Order::new("Ira".to_string(), PricingScheme::Progressive).unwrap();

        SettlementEngine::new()
            .ship(&order, &mut catalog, &mut state)
            .unwrap();
        assert_eq!(state.orders().len(), 1);
        assert_eq!(state.total_units_sold(), 0);
        assert_eq!(state.total_revenue_cents(), 0);
    }
}
