use stockmaster_core::{DomainError, DomainResult, ProductId, WarehouseId};
use stockmaster_inventory::{
    Adjustment, Catalog, Delivery, LedgerEntry, Product, Receipt, StockDocument, StockTable,
    Transfer, Warehouse,
};

use super::Collection;

/// Everything the engine mutates, behind one lock.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    products: Collection<Product>,
    warehouses: Collection<Warehouse>,
    receipts: Collection<Receipt>,
    deliveries: Collection<Delivery>,
    transfers: Collection<Transfer>,
    adjustments: Collection<Adjustment>,
    ledger: Vec<LedgerEntry>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &Collection<Product> {
        &self.products
    }

    pub fn warehouses(&self) -> &Collection<Warehouse> {
        &self.warehouses
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product);
    }

    pub fn insert_warehouse(&mut self, warehouse: Warehouse) {
        self.warehouses.insert(warehouse);
    }

    pub fn insert_warehouses(&mut self, warehouses: impl IntoIterator<Item = Warehouse>) {
        for w in warehouses {
            self.warehouses.insert(w);
        }
    }

    /// Remove a warehouse no product holds positive stock in.
    ///
    /// Zero or negative entries do not block removal; they are left on the
    /// products as orphans.
    pub fn remove_warehouse(&mut self, id: WarehouseId) -> DomainResult<Warehouse> {
        if !self.warehouses.contains(&id) {
            return Err(DomainError::WarehouseNotFound(id));
        }
        if self.products.iter().any(|p| p.has_stock_in(id)) {
            return Err(DomainError::WarehouseInUse(id));
        }
        self.warehouses
            .remove(&id)
            .ok_or(DomainError::WarehouseNotFound(id))
    }

    /// Append-ordered log.
    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn append_ledger(&mut self, entries: impl IntoIterator<Item = LedgerEntry>) {
        self.ledger.extend(entries);
    }
}

impl Catalog for InventoryState {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.get(&id)
    }
}

impl StockTable for InventoryState {
    fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.get_mut(&id)
    }
}

/// Per-kind document collection access, so engine operations can be written
/// once over `D: StockDocument`.
pub trait Documents<D: StockDocument> {
    fn documents(&self) -> &Collection<D>;

    fn documents_mut(&mut self) -> &mut Collection<D>;
}

macro_rules! document_collection {
    ($doc:ty, $field:ident) => {
        impl Documents<$doc> for InventoryState {
            fn documents(&self) -> &Collection<$doc> {
                &self.$field
            }

            fn documents_mut(&mut self) -> &mut Collection<$doc> {
                &mut self.$field
            }
        }
    };
}

document_collection!(Receipt, receipts);
document_collection!(Delivery, deliveries);
document_collection!(Transfer, transfers);
document_collection!(Adjustment, adjustments);

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockmaster_core::{Quantity, UserId};
    use stockmaster_inventory::{NewProduct, NewWarehouse};

    use super::*;

    fn warehouse(state: &mut InventoryState, name: &str) -> WarehouseId {
        let w = Warehouse::register(
            WarehouseId::new(),
            NewWarehouse::new(name, "Dock"),
            UserId::new(),
            Utc::now(),
        )
        .unwrap();
        let id = w.id_typed();
        state.insert_warehouse(w);
        id
    }

    fn product(state: &mut InventoryState, stock: &[(WarehouseId, f64)]) -> ProductId {
        let mut req = NewProduct::new("Bolt", "Hardware", "pcs");
        for (w, q) in stock {
            req = req.with_stock(*w, Quantity::new(*q).unwrap());
        }
        let p = Product::register(ProductId::new(), req, Utc::now()).unwrap();
        let id = p.id_typed();
        state.insert_product(p);
        id
    }

    #[test]
    fn remove_warehouse_blocked_by_positive_stock() {
        let mut state = InventoryState::new();
        let w = warehouse(&mut state, "Main");
        product(&mut state, &[(w, 5.0)]);

        assert_eq!(state.remove_warehouse(w), Err(DomainError::WarehouseInUse(w)));
        assert!(state.warehouse(w).is_some());
    }

    #[test]
    fn remove_warehouse_ignores_zero_and_negative_stock() {
        let mut state = InventoryState::new();
        let w = warehouse(&mut state, "Main");
        let p = product(&mut state, &[(w, 0.0)]);
        product(&mut state, &[(w, -2.0)]);

        let removed = state.remove_warehouse(w).unwrap();
        assert_eq!(removed.name(), "Main");
        assert!(state.warehouse(w).is_none());
        // Orphaned stock entry stays on the product.
        assert_eq!(state.product(p).map(|p| p.stock().len()), Some(1));
    }

    #[test]
    fn remove_unknown_warehouse() {
        let mut state = InventoryState::new();
        let ghost = WarehouseId::new();
        assert_eq!(state.remove_warehouse(ghost), Err(DomainError::WarehouseNotFound(ghost)));
    }

    #[test]
    fn stock_table_reads_through_products() {
        let mut state = InventoryState::new();
        let w = warehouse(&mut state, "Main");
        let p = product(&mut state, &[(w, 7.0)]);
        assert_eq!(state.quantity(p, w), Quantity::from(7));
        state.apply_delta(p, w, Quantity::from(3), Utc::now()).unwrap();
        assert_eq!(state.quantity(p, w), Quantity::from(10));
    }
}
