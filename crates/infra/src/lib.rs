//! Infrastructure layer: state storage, the stock engine, read models and
//! configuration.

pub mod config;
pub mod engine;
pub mod projections;
pub mod store;


pub use config::EngineConfig;
pub use engine::{EngineError, EngineResult, StockEngine};
pub use projections::{DashboardKpis, PendingCounts, StockAlert};
pub use store::{InMemoryInventoryStore, InventoryState, InventoryStore, StoreError};
