//! Inventory state storage abstractions.
//!
//! All mutable engine state (products with their stock, warehouses, the four
//! document collections, the ledger) lives in one [`InventoryState`]. Stores
//! hand it out through closures so a whole validate call runs inside one
//! critical section.

pub mod collection;
pub mod in_memory;
pub mod state;

use std::sync::Arc;

use thiserror::Error;

pub use collection::Collection;
pub use in_memory::InMemoryInventoryStore;
pub use state::{Documents, InventoryState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A writer panicked while holding the lock; state may be inconsistent.
    #[error("inventory store lock poisoned")]
    Poisoned,
}

/// Transactional access to [`InventoryState`].
///
/// `write` is the transaction boundary: implementations must guarantee that
/// no other reader or writer observes the state while the closure runs.
pub trait InventoryStore: Send + Sync {
    fn read<R>(&self, f: impl FnOnce(&InventoryState) -> R) -> Result<R, StoreError>;

    fn write<R>(&self, f: impl FnOnce(&mut InventoryState) -> R) -> Result<R, StoreError>;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn read<R>(&self, f: impl FnOnce(&InventoryState) -> R) -> Result<R, StoreError> {
        (**self).read(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut InventoryState) -> R) -> Result<R, StoreError> {
        (**self).write(f)
    }
}
