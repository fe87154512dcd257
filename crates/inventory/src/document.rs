//! Shared shape of movement documents (receipts, deliveries, transfers,
//! adjustments).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{
    DocumentId, DomainError, DomainResult, Entity, ProductId, Quantity, UserId, WarehouseId,
};

use crate::ledger::MovementType;
use crate::stock::{StockMovement, StockTable};

/// Document lifecycle status.
///
/// Documents are created `draft` and move to `done` exactly once. `waiting`
/// and `ready` are accepted wherever a status is read but the engine never
/// sets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Waiting,
    Ready,
    Done,
    Canceled,
}

impl DocumentStatus {
    /// Pending = neither done nor canceled.
    pub fn is_pending(self) -> bool {
        !matches!(self, DocumentStatus::Done | DocumentStatus::Canceled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Waiting => "waiting",
            DocumentStatus::Ready => "ready",
            DocumentStatus::Done => "done",
            DocumentStatus::Canceled => "canceled",
        }
    }
}

impl core::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Receipt,
    Delivery,
    Transfer,
    Adjustment,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Receipt => "receipt",
            DocumentKind::Delivery => "delivery",
            DocumentKind::Transfer => "transfer",
            DocumentKind::Adjustment => "adjustment",
        }
    }

    /// Ledger type recorded for this kind's movements.
    pub fn movement_type(self) -> MovementType {
        match self {
            DocumentKind::Receipt => MovementType::Receipt,
            DocumentKind::Delivery => MovementType::Delivery,
            DocumentKind::Transfer => MovementType::Transfer,
            DocumentKind::Adjustment => MovementType::Adjustment,
        }
    }
}

/// One `{product, quantity}` line of a receipt, delivery or transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

impl LineItem {
    pub fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

pub(crate) fn validate_items(items: &[LineItem]) -> DomainResult<()> {
    if items.is_empty() {
        return Err(DomainError::validation("at least one item is required"));
    }
    for item in items {
        if !item.quantity.is_positive() {
            return Err(DomainError::validation(format!(
                "item quantity for product {} must be positive",
                item.product_id
            )));
        }
    }
    Ok(())
}

pub(crate) fn require_text(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Status + audit trail shared by every document kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    status: DocumentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: UserId,
    completed_at: Option<DateTime<Utc>>,
    completed_by: Option<UserId>,
}

impl DocumentState {
    pub fn draft(actor: UserId, now: DateTime<Utc>) -> Self {
        Self {
            status: DocumentStatus::Draft,
            created_at: now,
            updated_at: now,
            created_by: actor,
            completed_at: None,
            completed_by: None,
        }
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    /// When the document was validated/applied.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Who validated/applied the document.
    pub fn completed_by(&self) -> Option<UserId> {
        self.completed_by
    }

    fn ensure_open(&self, kind: DocumentKind, id: DocumentId) -> DomainResult<()> {
        match self.status {
            DocumentStatus::Done if kind == DocumentKind::Adjustment => {
                Err(DomainError::AlreadyApplied(id))
            }
            DocumentStatus::Done => Err(DomainError::AlreadyValidated {
                kind: kind.as_str(),
                id,
            }),
            DocumentStatus::Canceled => Err(DomainError::invalid_transition(format!(
                "{} {id} is canceled",
                kind.as_str()
            ))),
            _ => Ok(()),
        }
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn complete(&mut self, actor: UserId, now: DateTime<Utc>) {
        self.status = DocumentStatus::Done;
        self.updated_at = now;
        self.completed_at = Some(now);
        self.completed_by = Some(actor);
    }

    fn cancel(
        &mut self,
        kind: DocumentKind,
        id: DocumentId,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        match self.status {
            DocumentStatus::Done => Err(DomainError::invalid_transition(format!(
                "{} {id} is done and cannot be canceled",
                kind.as_str()
            ))),
            DocumentStatus::Canceled => Err(DomainError::invalid_transition(format!(
                "{} {id} is already canceled",
                kind.as_str()
            ))),
            _ => {
                self.status = DocumentStatus::Canceled;
                self.updated_at = now;
                Ok(())
            }
        }
    }
}

/// List filter for documents. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub status: Option<DocumentStatus>,
    /// Transfers match on either side.
    pub warehouse_id: Option<WarehouseId>,
    pub product_id: Option<ProductId>,
}

impl DocumentFilter {
    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }

    pub fn with_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }
}

/// A document whose validation moves stock.
///
/// Implementors provide the planning step; the lifecycle guards are shared.
pub trait StockDocument: Entity<Id = DocumentId> + Clone {
    const KIND: DocumentKind;

    fn state(&self) -> &DocumentState;

    fn state_mut(&mut self) -> &mut DocumentState;

    /// Warehouses the document touches.
    fn warehouses(&self) -> Vec<WarehouseId>;

    fn involves_product(&self, product_id: ProductId) -> bool;

    /// Compute every stock movement of this document against `table`
    /// without mutating anything. Fails on the first line that cannot be
    /// honoured.
    fn plan<T: StockTable + ?Sized>(&self, table: &T) -> DomainResult<Vec<StockMovement>>;

    fn status(&self) -> DocumentStatus {
        self.state().status()
    }

    /// Idempotency guard: `done` and `canceled` documents cannot be validated.
    fn ensure_open(&self) -> DomainResult<()> {
        self.state().ensure_open(Self::KIND, *self.id())
    }

    /// Flip to `done`, stamping time and actor.
    fn complete(&mut self, actor: UserId, now: DateTime<Utc>) {
        self.state_mut().complete(actor, now);
    }

    fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        let id = *self.id();
        self.state_mut().cancel(Self::KIND, id, now)
    }

    fn matches(&self, filter: &DocumentFilter) -> bool {
        filter.status.is_none_or(|s| self.status() == s)
            && filter
                .warehouse_id
                .is_none_or(|w| self.warehouses().contains(&w))
            && filter.product_id.is_none_or(|p| self.involves_product(p))
    }
}
