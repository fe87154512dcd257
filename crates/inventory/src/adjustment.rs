//! Adjustments: reconciling recorded stock with a physical count.
//!
//! Unlike the other documents, an adjustment is a two-step protocol. The
//! recorded quantity is snapshotted when the draft is created so the
//! discrepancy can be reviewed before anything changes; applying it sets
//! the stock to the counted quantity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{
    DocumentId, DomainError, DomainResult, Entity, ProductId, Quantity, UserId, WarehouseId,
};

use crate::document::{DocumentKind, DocumentState, StockDocument};
use crate::stock::{StockMovement, StockPlan, StockTable};

/// Request: record a physical count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAdjustment {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub counted_quantity: Quantity,
    pub reason: Option<String>,
}

impl NewAdjustment {
    pub fn validate(&self) -> DomainResult<()> {
        if self.counted_quantity.is_negative() {
            return Err(DomainError::validation("counted quantity cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    id: DocumentId,
    product_id: ProductId,
    warehouse_id: WarehouseId,
    recorded_quantity: Quantity,
    counted_quantity: Quantity,
    /// `recorded - counted`: positive means stock was lost.
    adjustment: Quantity,
    reason: String,
    #[serde(flatten)]
    state: DocumentState,
}

impl Adjustment {
    /// Create a draft, snapshotting the currently recorded quantity.
    pub fn draft<T: StockTable + ?Sized>(
        id: DocumentId,
        req: NewAdjustment,
        table: &T,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        req.validate()?;
        table.require_product(req.product_id)?;
        table.require_warehouse(req.warehouse_id)?;

        let recorded_quantity = table.quantity(req.product_id, req.warehouse_id);
        let adjustment = recorded_quantity.checked_sub(req.counted_quantity)?;
        Ok(Self {
            id,
            product_id: req.product_id,
            warehouse_id: req.warehouse_id,
            recorded_quantity,
            counted_quantity: req.counted_quantity,
            adjustment,
            reason: req.reason.unwrap_or_default(),
            state: DocumentState::draft(actor, now),
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn recorded_quantity(&self) -> Quantity {
        self.recorded_quantity
    }

    pub fn counted_quantity(&self) -> Quantity {
        self.counted_quantity
    }

    pub fn adjustment(&self) -> Quantity {
        self.adjustment
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        self.state.completed_at()
    }

    pub fn applied_by(&self) -> Option<UserId> {
        self.state.completed_by()
    }
}

impl Entity for Adjustment {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl StockDocument for Adjustment {
    const KIND: DocumentKind = DocumentKind::Adjustment;

    fn state(&self) -> &DocumentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DocumentState {
        &mut self.state
    }

    fn warehouses(&self) -> Vec<WarehouseId> {
        vec![self.warehouse_id]
    }

    fn involves_product(&self, product_id: ProductId) -> bool {
        self.product_id == product_id
    }

    /// Absolute set to the counted quantity. The ledger records
    /// `-adjustment` against the creation snapshot, not the current stock.
    fn plan<T: StockTable + ?Sized>(&self, table: &T) -> DomainResult<Vec<StockMovement>> {
        let mut plan = StockPlan::new(table);
        plan.product(self.product_id)?;
        plan.warehouse(self.warehouse_id)?;
        plan.set(
            self.product_id,
            self.warehouse_id,
            self.counted_quantity,
            -self.adjustment,
        )?;
        Ok(plan.finish())
    }
}
