use std::sync::RwLock;

use super::{InventoryState, InventoryStore, StoreError};

/// In-memory store guarded by a single `RwLock`.
///
/// One global lock around the whole state: every validate call holds the
/// write half for all of its lines, reads share the read half and see a
/// consistent snapshot.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    inner: RwLock<InventoryState>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-built state (fixtures, restored snapshots).
    pub fn with_state(state: InventoryState) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn read<R>(&self, f: impl FnOnce(&InventoryState) -> R) -> Result<R, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&state))
    }

    fn write<R>(&self, f: impl FnOnce(&mut InventoryState) -> R) -> Result<R, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut state))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn writes_are_visible_to_later_reads() {
        let store = InMemoryInventoryStore::new();
        let defaults = stockmaster_inventory::default_warehouses(chrono::Utc::now());
        store.write(|s| s.insert_warehouses(defaults)).unwrap();
        let count = store.read(|s| s.warehouses().len()).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn with_state_starts_from_given_state() {
        let mut state = InventoryState::default();
        state.insert_warehouses(stockmaster_inventory::default_warehouses(chrono::Utc::now()));
        let store = InMemoryInventoryStore::with_state(state);

        let names: Vec<String> = store
            .read(|s| s.warehouses().iter().map(|w| w.name().to_string()).collect())
            .unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(store.write(|s| s.ledger().len()).unwrap(), 0);
    }

    #[test]
    fn poisoned_lock_surfaces_as_error() {
        let store = Arc::new(InMemoryInventoryStore::new());
        let poisoner = store.clone();
        let _ = thread::spawn(move || {
            let _ = poisoner.write(|_| panic!("writer died"));
        })
        .join();

        assert_eq!(store.read(|_| ()), Err(StoreError::Poisoned));
        assert_eq!(store.write(|_| ()), Err(StoreError::Poisoned));
    }
}
