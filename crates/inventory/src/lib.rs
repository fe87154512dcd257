//! Inventory domain module: products, warehouses, movement documents and the
//! stock ledger.
//!
//! This crate contains the business rules of the stock engine, implemented
//! purely as deterministic domain logic (no IO, no locking, no storage).
//! Validators *plan* stock movements against a read-only [`StockTable`];
//! committing the plan is the caller's job (see `stockmaster-infra`).

pub mod adjustment;
pub mod delivery;
pub mod document;
pub mod ledger;
pub mod product;
pub mod receipt;
pub mod stock;
pub mod transfer;
pub mod warehouse;

#[cfg(test)]
pub(crate) mod fixtures;

pub use adjustment::{Adjustment, NewAdjustment};
pub use delivery::{Delivery, NewDelivery};
pub use document::{
    DocumentFilter, DocumentKind, DocumentState, DocumentStatus, LineItem, StockDocument,
};
pub use ledger::{LedgerEntry, LedgerQuery, MovementType};
pub use product::{NewProduct, Product, Stock};
pub use receipt::{NewReceipt, Receipt};
pub use stock::{Catalog, StockChange, StockMovement, StockPlan, StockTable, commit};
pub use transfer::{NewTransfer, Transfer};
pub use warehouse::{NewWarehouse, Warehouse, default_warehouses};
