//! Shared test fixtures: a minimal in-memory stock table.

use chrono::{DateTime, Utc};

use stockmaster_core::{ProductId, Quantity, UserId, WarehouseId};

use crate::product::{NewProduct, Product};
use crate::stock::{Catalog, StockTable};
use crate::warehouse::{NewWarehouse, Warehouse};

pub fn test_time() -> DateTime<Utc> {
    Utc::now()
}

pub fn test_actor() -> UserId {
    UserId::new()
}

#[derive(Debug, Default)]
pub struct TestStock {
    products: Vec<Product>,
    warehouses: Vec<Warehouse>,
}

impl TestStock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warehouse(&mut self, name: &str) -> WarehouseId {
        let wh = Warehouse::register(
            WarehouseId::new(),
            NewWarehouse::new(name, "Test Site"),
            test_actor(),
            test_time(),
        )
        .unwrap();
        let id = wh.id_typed();
        self.warehouses.push(wh);
        id
    }

    pub fn add_product(&mut self, name: &str, stock: &[(WarehouseId, u32)]) -> ProductId {
        let mut req = NewProduct::new(name, "General", "pcs");
        for (w, q) in stock {
            req = req.with_stock(*w, Quantity::from(*q));
        }
        let product = Product::register(ProductId::new(), req, test_time()).unwrap();
        let id = product.id_typed();
        self.products.push(product);
        id
    }

    pub fn remove_product(&mut self, id: ProductId) {
        self.products.retain(|p| p.id_typed() != id);
    }
}

impl Catalog for TestStock {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id_typed() == id)
    }

    fn warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id_typed() == id)
    }
}

impl StockTable for TestStock {
    fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id_typed() == id)
    }
}
