//! Read models computed from the inventory state.

pub mod dashboard;

pub use dashboard::{DashboardKpis, LOW_STOCK_THRESHOLD, PendingCounts, StockAlert};
