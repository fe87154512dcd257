//! Dashboard KPIs computed from a consistent snapshot of the inventory state.

use serde::Serialize;

use stockmaster_core::{ProductId, Quantity, WarehouseId};
use stockmaster_inventory::{Adjustment, Delivery, Product, Receipt, StockDocument, Transfer};

use crate::store::{Documents, InventoryState};

/// Quantities below this (and not zero) are reported as low stock.
pub const LOW_STOCK_THRESHOLD: f64 = 10.0;

/// One row of the low / out-of-stock lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub warehouse_id: WarehouseId,
    pub quantity: Quantity,
}

impl StockAlert {
    fn new(product: &Product, warehouse_id: WarehouseId, quantity: Quantity) -> Self {
        Self {
            product_id: product.id_typed(),
            product_name: product.name().to_string(),
            sku: product.sku().to_string(),
            warehouse_id,
            quantity,
        }
    }
}

/// Documents still waiting for validation, per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PendingCounts {
    pub receipts: usize,
    pub deliveries: usize,
    pub transfers: usize,
    pub adjustments: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardKpis {
    /// Products holding positive stock.
    pub total_products: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub pending: PendingCounts,
    /// Truncated to the configured detail limit; the counts are not.
    pub low_stock: Vec<StockAlert>,
    pub out_of_stock: Vec<StockAlert>,
}

enum Level {
    Out,
    Low,
    Healthy,
}

fn level(quantity: Quantity) -> Level {
    if quantity.is_zero() {
        Level::Out
    } else if quantity.value() < LOW_STOCK_THRESHOLD {
        Level::Low
    } else {
        Level::Healthy
    }
}

/// Compute KPIs, optionally scoped to one warehouse.
///
/// Scoped: one row per product, using its quantity in that warehouse (a
/// product that never touched it reads as zero). Unscoped: one row per
/// existing stock entry.
pub fn compute(
    state: &InventoryState,
    warehouse: Option<WarehouseId>,
    detail_limit: usize,
) -> DashboardKpis {
    let mut kpis = DashboardKpis::default();

    for product in state.products().iter() {
        let rows: Vec<(WarehouseId, Quantity)> = match warehouse {
            Some(w) => vec![(w, product.quantity_in(w))],
            None => product
                .stock()
                .iter()
                .map(|s| (s.warehouse_id, s.quantity))
                .collect(),
        };

        if rows.iter().any(|(_, q)| q.is_positive()) {
            kpis.total_products += 1;
        }

        for (w, q) in rows {
            match level(q) {
                Level::Out => {
                    kpis.out_of_stock_count += 1;
                    if kpis.out_of_stock.len() < detail_limit {
                        kpis.out_of_stock.push(StockAlert::new(product, w, q));
                    }
                }
                Level::Low => {
                    kpis.low_stock_count += 1;
                    if kpis.low_stock.len() < detail_limit {
                        kpis.low_stock.push(StockAlert::new(product, w, q));
                    }
                }
                Level::Healthy => {}
            }
        }
    }

    kpis.pending = PendingCounts {
        receipts: pending::<Receipt>(state, warehouse),
        deliveries: pending::<Delivery>(state, warehouse),
        transfers: pending::<Transfer>(state, warehouse),
        adjustments: pending::<Adjustment>(state, warehouse),
    };
    kpis
}

fn pending<D>(state: &InventoryState, warehouse: Option<WarehouseId>) -> usize
where
    D: StockDocument,
    InventoryState: Documents<D>,
{
    <InventoryState as Documents<D>>::documents(state)
        .iter()
        .filter(|d| d.status().is_pending())
        .filter(|d| warehouse.is_none_or(|w| d.warehouses().contains(&w)))
        .count()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use stockmaster_core::{DocumentId, UserId};
    use stockmaster_inventory::{
        LineItem, NewDelivery, NewProduct, NewReceipt, NewTransfer, NewWarehouse, Warehouse,
    };

    use super::*;

    struct Fixture {
        state: InventoryState,
        main: WarehouseId,
        annex: WarehouseId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut state = InventoryState::new();
            let mut add = |name: &str| {
                let w = Warehouse::register(
                    WarehouseId::new(),
                    NewWarehouse::new(name, "Site"),
                    UserId::new(),
                    Utc::now(),
                )
                .unwrap();
                let id = w.id_typed();
                state.insert_warehouse(w);
                id
            };
            let main = add("Main");
            let annex = add("Annex");
            Self { state, main, annex }
        }

        fn product(&mut self, name: &str, stock: &[(WarehouseId, f64)]) -> ProductId {
            let mut req = NewProduct::new(name, "General", "pcs");
            for (w, q) in stock {
                req = req.with_stock(*w, Quantity::new(*q).unwrap());
            }
            let p = Product::register(ProductId::new(), req, Utc::now()).unwrap();
            let id = p.id_typed();
            self.state.insert_product(p);
            id
        }

        fn line(&self, p: ProductId) -> Vec<LineItem> {
            vec![LineItem::new(p, Quantity::from(1))]
        }
    }

    #[test]
    fn unscoped_classifies_each_stock_entry() {
        let mut f = Fixture::new();
        let (main, annex) = (f.main, f.annex);
        f.product("Bolt", &[(main, 0.0), (annex, 50.0)]);
        f.product("Nut", &[(main, 3.0)]);
        f.product("Washer", &[(main, -2.0)]);
        f.product("Gasket", &[]);

        let kpis = compute(&f.state, None, 10);
        assert_eq!(kpis.total_products, 2);
        assert_eq!(kpis.out_of_stock_count, 1);
        assert_eq!(kpis.low_stock_count, 2);
        assert_eq!(kpis.out_of_stock[0].product_name, "Bolt");
        assert_eq!(kpis.out_of_stock[0].warehouse_id, main);
    }

    #[test]
    fn scoped_reads_absent_entry_as_out_of_stock() {
        let mut f = Fixture::new();
        let (main, annex) = (f.main, f.annex);
        f.product("Bolt", &[(annex, 50.0)]);
        f.product("Nut", &[(main, 9.5)]);

        let kpis = compute(&f.state, Some(main), 10);
        assert_eq!(kpis.total_products, 1);
        assert_eq!(kpis.out_of_stock_count, 1);
        assert_eq!(kpis.out_of_stock[0].quantity, Quantity::ZERO);
        assert_eq!(kpis.low_stock_count, 1);

        let kpis = compute(&f.state, Some(annex), 10);
        assert_eq!(kpis.total_products, 1);
        assert_eq!(kpis.low_stock_count, 0);
        assert_eq!(kpis.out_of_stock_count, 1);
    }

    #[test]
    fn detail_lists_are_truncated_but_counts_are_not() {
        let mut f = Fixture::new();
        let main = f.main;
        for i in 0..5 {
            f.product(&format!("Part {i}"), &[(main, 1.0)]);
        }
        let kpis = compute(&f.state, None, 2);
        assert_eq!(kpis.low_stock_count, 5);
        assert_eq!(kpis.low_stock.len(), 2);
        assert_eq!(kpis.low_stock[0].product_name, "Part 0");
    }

    #[test]
    fn pending_counts_respect_scope_and_status() {
        let mut f = Fixture::new();
        let (main, annex) = (f.main, f.annex);
        let p = f.product("Bolt", &[(main, 100.0)]);
        let actor = UserId::new();
        let now = Utc::now();

        let receipt = Receipt::draft(
            DocumentId::new(),
            NewReceipt {
                supplier: "Acme".into(),
                warehouse_id: main,
                items: f.line(p),
                notes: None,
            },
            &f.state,
            actor,
            now,
        )
        .unwrap();
        let mut done = Delivery::draft(
            DocumentId::new(),
            NewDelivery {
                customer: "Globex".into(),
                warehouse_id: main,
                items: f.line(p),
                notes: None,
            },
            &f.state,
            actor,
            now,
        )
        .unwrap();
        done.complete(actor, now);
        let transfer = Transfer::draft(
            DocumentId::new(),
            NewTransfer {
                from_warehouse_id: main,
                to_warehouse_id: annex,
                items: f.line(p),
                notes: None,
            },
            &f.state,
            actor,
            now,
        )
        .unwrap();

        <InventoryState as Documents<Receipt>>::documents_mut(&mut f.state).insert(receipt);
        <InventoryState as Documents<Delivery>>::documents_mut(&mut f.state).insert(done);
        <InventoryState as Documents<Transfer>>::documents_mut(&mut f.state).insert(transfer);

        let all = compute(&f.state, None, 10).pending;
        assert_eq!(
            all,
            PendingCounts {
                receipts: 1,
                deliveries: 0,
                transfers: 1,
                adjustments: 0
            }
        );

        let annex_only = compute(&f.state, Some(annex), 10).pending;
        assert_eq!(annex_only.receipts, 0);
        assert_eq!(annex_only.transfers, 1);
    }
}
