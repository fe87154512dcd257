//! Stock table access and movement planning.
//!
//! Validation is split in two phases:
//!
//! 1. **Plan**: a document walks its lines against a read-only [`StockTable`]
//!    through a [`StockPlan`], which tracks the projected quantity of every
//!    (product, warehouse) pair touched so far. Any failure aborts before
//!    anything is written.
//! 2. **Commit**: [`commit`] writes the planned movements to the table.
//!
//! The caller holds its lock (or transaction) across both phases.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{DomainError, DomainResult, ProductId, Quantity, WarehouseId};

use crate::product::Product;
use crate::warehouse::Warehouse;

/// Existence lookups for the things documents reference.
pub trait Catalog {
    fn product(&self, id: ProductId) -> Option<&Product>;

    fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse>;

    fn require_product(&self, id: ProductId) -> DomainResult<&Product> {
        self.product(id).ok_or(DomainError::ProductNotFound(id))
    }

    fn require_warehouse(&self, id: WarehouseId) -> DomainResult<&Warehouse> {
        self.warehouse(id).ok_or(DomainError::WarehouseNotFound(id))
    }
}

/// Per-(product, warehouse) quantity store.
pub trait StockTable: Catalog {
    fn product_mut(&mut self, id: ProductId) -> Option<&mut Product>;

    /// Current quantity; zero when the product never touched the warehouse
    /// (or does not exist).
    fn quantity(&self, product_id: ProductId, warehouse_id: WarehouseId) -> Quantity {
        self.product(product_id)
            .map(|p| p.quantity_in(warehouse_id))
            .unwrap_or(Quantity::ZERO)
    }

    /// Add `delta` to the pair's entry, creating it when absent.
    fn apply_delta(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: Quantity,
        now: DateTime<Utc>,
    ) -> DomainResult<Quantity> {
        let product = self
            .product_mut(product_id)
            .ok_or(DomainError::ProductNotFound(product_id))?;
        Ok(product.apply_delta(warehouse_id, delta, now))
    }

    /// Overwrite the pair's entry with an absolute quantity.
    fn set_quantity(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let product = self
            .product_mut(product_id)
            .ok_or(DomainError::ProductNotFound(product_id))?;
        product.set_quantity(warehouse_id, quantity, now);
        Ok(())
    }
}

/// How a movement changes the stock table.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "quantity", rename_all = "lowercase")]
pub enum StockChange {
    Delta(Quantity),
    Set(Quantity),
}

/// One planned stock effect at one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub change: StockChange,
    /// Signed quantity recorded in the ledger (positive = stock increased).
    pub ledger_quantity: Quantity,
}

/// Working set used while planning a document.
///
/// Sufficiency checks see the effect of earlier lines of the same document,
/// so two lines delivering the same product cannot both draw on the same
/// stock.
#[derive(Debug)]
pub struct StockPlan<'a, T: ?Sized> {
    table: &'a T,
    projected: HashMap<(ProductId, WarehouseId), Quantity>,
    movements: Vec<StockMovement>,
}

impl<'a, T> StockPlan<'a, T>
where
    T: StockTable + ?Sized,
{
    pub fn new(table: &'a T) -> Self {
        Self {
            table,
            projected: HashMap::new(),
            movements: Vec::new(),
        }
    }

    pub fn product(&self, id: ProductId) -> DomainResult<&'a Product> {
        let table: &'a T = self.table;
        table.require_product(id)
    }

    pub fn warehouse(&self, id: WarehouseId) -> DomainResult<&'a Warehouse> {
        let table: &'a T = self.table;
        table.require_warehouse(id)
    }

    /// Quantity the pair would hold if the plan were committed now.
    pub fn available(&self, product_id: ProductId, warehouse_id: WarehouseId) -> Quantity {
        self.projected
            .get(&(product_id, warehouse_id))
            .copied()
            .unwrap_or_else(|| self.table.quantity(product_id, warehouse_id))
    }

    /// Plan an increase. Fails when the projected quantity would leave the
    /// finite range.
    pub fn add(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity: Quantity,
    ) -> DomainResult<()> {
        let next = self.available(product_id, warehouse_id).checked_add(quantity)?;
        self.projected.insert((product_id, warehouse_id), next);
        self.movements.push(StockMovement {
            product_id,
            warehouse_id,
            change: StockChange::Delta(quantity),
            ledger_quantity: quantity,
        });
        Ok(())
    }

    /// Plan a decrease, failing with `InsufficientStock` when the warehouse
    /// cannot cover it.
    pub fn withdraw(
        &mut self,
        product: &Product,
        warehouse_id: WarehouseId,
        quantity: Quantity,
    ) -> DomainResult<()> {
        let product_id = product.id_typed();
        let available = self.available(product_id, warehouse_id);
        if available < quantity {
            return Err(DomainError::InsufficientStock {
                product_id,
                product_name: product.name().to_string(),
                warehouse_id,
                available,
                requested: quantity,
            });
        }

        let next = available.checked_sub(quantity)?;
        self.projected.insert((product_id, warehouse_id), next);
        self.movements.push(StockMovement {
            product_id,
            warehouse_id,
            change: StockChange::Delta(-quantity),
            ledger_quantity: -quantity,
        });
        Ok(())
    }

    /// Plan an absolute set. `ledger_quantity` is supplied by the caller
    /// because adjustments record the delta against their creation snapshot.
    pub fn set(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity: Quantity,
        ledger_quantity: Quantity,
    ) -> DomainResult<()> {
        let quantity = Quantity::new(quantity.value())?;
        let ledger_quantity = Quantity::new(ledger_quantity.value())?;
        self.projected.insert((product_id, warehouse_id), quantity);
        self.movements.push(StockMovement {
            product_id,
            warehouse_id,
            change: StockChange::Set(quantity),
            ledger_quantity,
        });
        Ok(())
    }

    pub fn finish(self) -> Vec<StockMovement> {
        self.movements
    }
}

/// Write planned movements to the table, in order.
pub fn commit<T>(table: &mut T, movements: &[StockMovement], now: DateTime<Utc>) -> DomainResult<()>
where
    T: StockTable + ?Sized,
{
    for m in movements {
        match m.change {
            StockChange::Delta(delta) => {
                table.apply_delta(m.product_id, m.warehouse_id, delta, now)?;
            }
            StockChange::Set(quantity) => {
                table.set_quantity(m.product_id, m.warehouse_id, quantity, now)?;
            }
        }
    }
    Ok(())
}
