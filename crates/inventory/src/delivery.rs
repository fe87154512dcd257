//! Deliveries: outgoing goods from one warehouse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{DocumentId, DomainResult, Entity, ProductId, UserId, WarehouseId};

use crate::document::{
    DocumentKind, DocumentState, LineItem, StockDocument, require_text, validate_items,
};
use crate::stock::{Catalog, StockMovement, StockPlan, StockTable};

/// Request: create a draft delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDelivery {
    pub customer: String,
    pub warehouse_id: WarehouseId,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
}

impl NewDelivery {
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.customer, "customer")?;
        validate_items(&self.items)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    id: DocumentId,
    customer: String,
    warehouse_id: WarehouseId,
    items: Vec<LineItem>,
    notes: String,
    #[serde(flatten)]
    state: DocumentState,
}

impl Delivery {
    pub fn draft<C: Catalog + ?Sized>(
        id: DocumentId,
        req: NewDelivery,
        catalog: &C,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        req.validate()?;
        catalog.require_warehouse(req.warehouse_id)?;

        Ok(Self {
            id,
            customer: req.customer,
            warehouse_id: req.warehouse_id,
            items: req.items,
            notes: req.notes.unwrap_or_default(),
            state: DocumentState::draft(actor, now),
        })
    }

    /// Replace customer, warehouse, lines and notes of a pending delivery.
    /// Stock is not checked until validation.
    pub fn revise<C: Catalog + ?Sized>(
        &mut self,
        req: NewDelivery,
        catalog: &C,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.ensure_open()?;
        req.validate()?;
        catalog.require_warehouse(req.warehouse_id)?;

        self.customer = req.customer;
        self.warehouse_id = req.warehouse_id;
        self.items = req.items;
        self.notes = req.notes.unwrap_or_default();
        self.state.touch(now);
        Ok(())
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
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

impl Entity for Delivery {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl StockDocument for Delivery {
    const KIND: DocumentKind = DocumentKind::Delivery;

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
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// `-quantity` per line; every line must be covered by the stock left
    /// after the lines before it.
    fn plan<T: StockTable + ?Sized>(&self, table: &T) -> DomainResult<Vec<StockMovement>> {
        let mut plan = StockPlan::new(table);
        plan.warehouse(self.warehouse_id)?;

        for item in &self.items {
            let product = plan.product(item.product_id)?;
            plan.withdraw(product, self.warehouse_id, item.quantity)?;
        }

        Ok(plan.finish())
    }
}
