use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::product::{Bike, BikeUpdate};
use crate::{CatalogError, CatalogResult};

/// A bike and its on-hand stock. One record per model, owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    bike: Bike,
    quantity: u32,
}

impl StockRecord {
    pub fn bike(&self) -> &Bike {
        &self.bike
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// In-memory catalog keyed by model name.
///
/// Stock moves only through the explicit increase/decrease operations, so a
/// record's quantity can never go negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    records: HashMap<String, StockRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Add a new bike with an initial stock level. The catalog stores its
    /// own copy; the caller's instance stays independent.
    pub fn add(&mut self, bike: Bike, quantity: u32) -> CatalogResult<()> {
        if self.records.contains_key(bike.model()) {
            return Err(CatalogError::DuplicateModel(bike.model().to_string()));
        }
        self.records
            .insert(bike.model().to_string(), StockRecord { bike, quantity });
        Ok(())
    }

    /// Increase stock for an existing model.
    pub fn restock(&mut self, model: &str, quantity: u32) -> CatalogResult<()> {
        self.increase(model, quantity)
    }

    /// Delete a record; the bike and its stock are discarded.
    pub fn remove(&mut self, model: &str) -> CatalogResult<()> {
        self.records
            .remove(model)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(model.to_string()))
    }

    /// Read-only lookup by model.
    pub fn find_by_model(&self, model: &str) -> Option<&StockRecord> {
        self.records.get(model)
    }

    /// Edit one attribute of a stored bike in place, re-validating the
    /// field like construction does.
    pub fn edit(&mut self, model: &str, update: BikeUpdate) -> CatalogResult<()> {
        let record = self
            .records
            .get_mut(model)
            .ok_or_else(|| CatalogError::NotFound(model.to_string()))?;
        record.bike.apply(update)
    }

    pub fn increase(&mut self, model: &str, quantity: u32) -> CatalogResult<()> {
        if quantity == 0 {
            return Err(CatalogError::InvalidQuantity(quantity));
        }
        let record = self
            .records
            .get_mut(model)
            .ok_or_else(|| CatalogError::NotFound(model.to_string()))?;
        record.quantity += quantity;
        Ok(())
    }

    pub fn decrease(&mut self, model: &str, quantity: u32) -> CatalogResult<()> {
        if quantity == 0 {
            return Err(CatalogError::InvalidQuantity(quantity));
        }
        let record = self
            .records
            .get_mut(model)
            .ok_or_else(|| CatalogError::NotFound(model.to_string()))?;
        if record.quantity < quantity {
            return Err(CatalogError::InsufficientStock {
                model: model.to_string(),
                requested: quantity,
                available: record.quantity,
            });
        }
        record.quantity -= quantity;
        Ok(())
    }

    /// Records sorted by model, for stable listings and serialization.
    pub fn list(&self) -> Vec<&StockRecord> {
        let mut records: Vec<&StockRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.bike().model().cmp(b.bike().model()));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{AeroLevel, Suspension};

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

    fn aero_one() -> Bike {
        Bike::road(
            "Aero-1".to_string(),
            14.0,
            16.0,
            10,
            345_675,
            AeroLevel::Standard,
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_find() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());

        catalog.add(trail_x(), 5).unwrap();
        let record = catalog.find_by_model("Trail-X").unwrap();
        assert_eq!(record.quantity(), 5);
        assert_eq!(record.bike().model(), "Trail-X");
        assert!(catalog.find_by_model("Aero-1").is_none());
    }

    #[test]
    fn test_add_rejects_duplicate_model() {
        let mut catalog = Catalog::new();
        catalog.add(trail_x(), 5).unwrap();

        let err = catalog.add(trail_x(), 2).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateModel("Trail-X".to_string()));
        // Original stock untouched.
        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 5);
    }

    #[test]
    fn test_catalog_owns_its_copy() {
        let mut catalog = Catalog::new();
        let mut bike = trail_x();
        catalog.add(bike.clone(), 1).unwrap();

        bike.set_price_cents(999_900).unwrap();
        assert_eq!(
            catalog.find_by_model("Trail-X").unwrap().bike().price_cents(),
            120_000
        );
    }

    #[test]
    fn test_restock_and_errors() {
        let mut catalog = Catalog::new();
        catalog.add(aero_one(), 2).unwrap();

        catalog.restock("Aero-1", 3).unwrap();
        assert_eq!(catalog.find_by_model("Aero-1").unwrap().quantity(), 5);

        assert_eq!(
            catalog.restock("Aero-1", 0).unwrap_err(),
            CatalogError::InvalidQuantity(0)
        );
        assert_eq!(
            catalog.restock("Ghost", 1).unwrap_err(),
            CatalogError::NotFound("Ghost".to_string())
        );
    }

    #[test]
    fn test_decrease_never_goes_negative() {
        let mut catalog = Catalog::new();
        catalog.add(trail_x(), 3).unwrap();

        let err = catalog.decrease("Trail-X", 5).unwrap_err();
        assert_eq!(
            err,
            CatalogError::InsufficientStock {
                model: "Trail-X".to_string(),
                requested: 5,
                available: 3,
            }
        );
        // Refused decrease leaves the quantity unchanged.
        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 3);

        catalog.decrease("Trail-X", 3).unwrap();
        assert_eq!(catalog.find_by_model("Trail-X").unwrap().quantity(), 0);
    }

    #[test]
    fn test_remove() {
        let mut catalog = Catalog::new();
        catalog.add(trail_x(), 1).unwrap();

        catalog.remove("Trail-X").unwrap();
        assert!(catalog.find_by_model("Trail-X").is_none());
        assert_eq!(
            catalog.remove("Trail-X").unwrap_err(),
            CatalogError::NotFound("Trail-X".to_string())
        );
    }

    #[test]
    fn test_edit_validates_field() {
        let mut catalog = Catalog::new();
        catalog.add(trail_x(), 1).unwrap();

        catalog.edit("Trail-X", BikeUpdate::FrameSize(19.5)).unwrap();
        assert_eq!(
            catalog.find_by_model("Trail-X").unwrap().bike().frame_size(),
            19.5
        );

        let err = catalog.edit("Trail-X", BikeUpdate::Price(-1)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
        assert_eq!(
            catalog.edit("Ghost", BikeUpdate::Price(100)).unwrap_err(),
            CatalogError::NotFound("Ghost".to_string())
        );
    }

    #[test]
    fn test_list_is_sorted_by_model() {
        let mut catalog = Catalog::new();
        catalog.add(trail_x(), 1).unwrap();
        catalog.add(aero_one(), 2).unwrap();

        let models: Vec<&str> = catalog.list().iter().map(|r| r.bike().model()).collect();
        assert_eq!(models, vec!["Aero-1", "Trail-X"]);
    }
}
