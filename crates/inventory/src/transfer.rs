//! Transfers: moving stock between two warehouses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{
    DocumentId, DomainError, DomainResult, Entity, ProductId, UserId, WarehouseId,
};

use crate::document::{DocumentKind, DocumentState, LineItem, StockDocument, validate_items};
use crate::stock::{Catalog, StockMovement, StockPlan, StockTable};

/// Request: create a draft transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransfer {
    pub from_warehouse_id: WarehouseId,
    pub to_warehouse_id: WarehouseId,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
}

impl NewTransfer {
    pub fn validate(&self) -> DomainResult<()> {
        if self.from_warehouse_id == self.to_warehouse_id {
            return Err(DomainError::validation(
                "source and destination warehouses must be different",
            ));
        }
        validate_items(&self.items)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    id: DocumentId,
    from_warehouse_id: WarehouseId,
    to_warehouse_id: WarehouseId,
    items: Vec<LineItem>,
    notes: String,
    #[serde(flatten)]
    state: DocumentState,
}

impl Transfer {
    pub fn draft<C: Catalog + ?Sized>(
        id: DocumentId,
        req: NewTransfer,
        catalog: &C,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        req.validate()?;
        catalog.require_warehouse(req.from_warehouse_id)?;
        catalog.require_warehouse(req.to_warehouse_id)?;

        Ok(Self {
            id,
            from_warehouse_id: req.from_warehouse_id,
            to_warehouse_id: req.to_warehouse_id,
            items: req.items,
            notes: req.notes.unwrap_or_default(),
            state: DocumentState::draft(actor, now),
        })
    }

    /// Replace both warehouses, lines and notes of a pending transfer.
    pub fn revise<C: Catalog + ?Sized>(
        &mut self,
        req: NewTransfer,
        catalog: &C,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_open()?;
        req.validate()?;
        catalog.require_warehouse(req.from_warehouse_id)?;
        catalog.require_warehouse(req.to_warehouse_id)?;

        self.from_warehouse_id = req.from_warehouse_id;
        self.to_warehouse_id = req.to_warehouse_id;
        self.items = req.items;
        self.notes = req.notes.unwrap_or_default();
        self.state.touch(now);
        Ok(())
    }

    pub fn from_warehouse_id(&self) -> WarehouseId {
        self.from_warehouse_id
    }

    pub fn to_warehouse_id(&self) -> WarehouseId {
        self.to_warehouse_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn validated_at(&self) -> Option<DateTime<Utc>> {
        self.state.completed_at()
    }

    pub fn validated_by(&self) -> Option<UserId> {
        self.state.completed_by()
    }
}

impl Entity for Transfer {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl StockDocument for Transfer {
    const KIND: DocumentKind = DocumentKind::Transfer;

    fn state(&self) -> &DocumentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DocumentState {
        &mut self.state
    }

    fn warehouses(&self) -> Vec<WarehouseId> {
        vec![self.from_warehouse_id, self.to_warehouse_id]
    }

    fn involves_product(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Two movements per line: `-q` at the source, `+q` at the destination.
    /// Sufficiency is checked at the source only.
    fn plan<T: StockTable + ?Sized>(&self, table: &T) -> DomainResult<Vec<StockMovement>> {
        let mut plan = StockPlan::new(table);
        plan.warehouse(self.from_warehouse_id)?;
        plan.warehouse(self.to_warehouse_id)?;

        for item in &self.items {
            let product = plan.product(item.product_id)?;
            plan.withdraw(product, self.from_warehouse_id, item.quantity)?;
            plan.add(item.product_id, self.to_warehouse_id, item.quantity)?;
        }

        Ok(plan.finish())
    }
}
