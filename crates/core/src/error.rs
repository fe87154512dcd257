//! Domain error model.

use thiserror::Error;

use crate::id::{DocumentId, ProductId, WarehouseId};
use crate::quantity::Quantity;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, idempotency guards, stock sufficiency). Storage
/// concerns belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A request failed validation (missing fields, bad quantities, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("warehouse {0} not found")]
    WarehouseNotFound(WarehouseId),

    #[error("{kind} {id} not found")]
    DocumentNotFound { kind: &'static str, id: DocumentId },

    /// Idempotency guard for receipts, deliveries and transfers.
    #[error("{kind} {id} already validated")]
    AlreadyValidated { kind: &'static str, id: DocumentId },

    /// Idempotency guard for adjustments.
    #[error("adjustment {0} already applied")]
    AlreadyApplied(DocumentId),

    /// Not enough stock at a warehouse to cover a line.
    #[error(
        "insufficient stock for product {product_name} in warehouse {warehouse_id} \
         (available: {available}, requested: {requested})"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        warehouse_id: WarehouseId,
        available: Quantity,
        requested: Quantity,
    },

    /// A lifecycle transition that the document's status does not allow.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A warehouse still holds positive stock and cannot be removed.
    #[error("warehouse {0} still holds stock")]
    WarehouseInUse(WarehouseId),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn document_not_found(kind: &'static str, id: DocumentId) -> Self {
        Self::DocumentNotFound { kind, id }
    }

    /// True for the "referenced thing is absent" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound(_) | Self::WarehouseNotFound(_) | Self::DocumentNotFound { .. }
        )
    }

    /// True for business-rule rejections the caller could fix by changing input
    /// or state (as opposed to missing references).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientStock { .. }
                | Self::AlreadyValidated { .. }
                | Self::AlreadyApplied(_)
                | Self::InvalidTransition(_)
                | Self::WarehouseInUse(_)
        )
    }
}
