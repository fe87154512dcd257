//! Stock ledger: immutable, signed movement records.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{
    DocumentId, DomainError, LedgerEntryId, ProductId, Quantity, UserId, WarehouseId,
};

use crate::stock::StockMovement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Receipt,
    Delivery,
    Transfer,
    Adjustment,
}

impl MovementType {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementType::Receipt => "receipt",
            MovementType::Delivery => "delivery",
            MovementType::Transfer => "transfer",
            MovementType::Adjustment => "adjustment",
        }
    }
}

impl FromStr for MovementType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receipt" => Ok(MovementType::Receipt),
            "delivery" => Ok(MovementType::Delivery),
            "transfer" => Ok(MovementType::Transfer),
            "adjustment" => Ok(MovementType::Adjustment),
            _ => Err(DomainError::validation(
                "type must be one of: receipt, delivery, transfer, adjustment",
            )),
        }
    }
}

/// One stock movement at one warehouse. Never updated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub document_id: DocumentId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    /// Signed delta: positive = stock increased.
    pub quantity: Quantity,
    pub date: DateTime<Utc>,
    pub user_id: UserId,
}

impl LedgerEntry {
    pub fn record(
        movement_type: MovementType,
        document_id: DocumentId,
        movement: &StockMovement,
        user_id: UserId,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: LedgerEntryId::new(),
            movement_type,
            document_id,
            product_id: movement.product_id,
            warehouse_id: movement.warehouse_id,
            quantity: movement.ledger_quantity,
            date,
            user_id,
        }
    }
}

/// Ledger filter. Unset fields match everything; the date range is
/// inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerQuery {
    pub product_id: Option<ProductId>,
    pub warehouse_id: Option<WarehouseId>,
    pub movement_type: Option<MovementType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LedgerQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }

    pub fn recent(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }

    pub fn with_type(mut self, movement_type: MovementType) -> Self {
        self.movement_type = Some(movement_type);
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        self.product_id.is_none_or(|p| entry.product_id == p)
            && self.warehouse_id.is_none_or(|w| entry.warehouse_id == w)
            && self.movement_type.is_none_or(|t| entry.movement_type == t)
            && self.start.is_none_or(|s| entry.date >= s)
            && self.end.is_none_or(|e| entry.date <= e)
    }

    /// Select matching entries from an append-ordered log, newest first.
    ///
    /// Entries sharing a timestamp come out in reverse append order.
    pub fn select(&self, log: &[LedgerEntry]) -> Vec<LedgerEntry> {
        let mut out: Vec<LedgerEntry> = log
            .iter()
            .rev()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        // Stable: equal dates keep reverse append order.
        out.sort_by(|a, b| b.date.cmp(&a.date));
        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}
