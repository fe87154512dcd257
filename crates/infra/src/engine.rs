//! Stock engine: the application service in front of the inventory state.
//!
//! Every operation runs as one closure against the [`InventoryStore`], so the
//! store's lock is the transaction boundary.
//!
//! ## Validation flow
//!
//! ```text
//! validate::<D>(id, actor)            (write lock held throughout)
//!   ↓
//! 1. Look up the document             DocumentNotFound
//!   ↓
//! 2. Idempotency guard                AlreadyValidated / AlreadyApplied
//!   ↓
//! 3. Plan every line read-only        ProductNotFound / WarehouseNotFound /
//!   ↓                                 InsufficientStock
//! 4. Commit movements to stock
//!   ↓
//! 5. Append one ledger entry per movement
//!   ↓
//! 6. Flip the document to done
//! ```
//!
//! A failure in steps 1 to 3 leaves stock, ledger and status untouched. Steps
//! 4 to 6 only fail if a product vanished between planning and committing,
//! which the lock rules out; such a failure surfaces as `InvariantViolation`.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{Span, debug, info, instrument, warn};

use stockmaster_core::{
    Clock, DocumentId, DomainError, Entity, ProductId, Quantity, SystemClock, UserId, WarehouseId,
};
use stockmaster_inventory::{
    Adjustment, Catalog, Delivery, DocumentFilter, LedgerEntry, LedgerQuery, NewAdjustment,
    NewDelivery, NewProduct, NewReceipt, NewTransfer, NewWarehouse, Product, Receipt,
    StockDocument, StockTable, Transfer, Warehouse, commit, default_warehouses,
};

use crate::config::EngineConfig;
use crate::projections::{DashboardKpis, dashboard};
use crate::store::{Documents, InventoryState, InventoryStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Business failure; the state is unchanged.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(e) => Some(e),
            EngineError::Store(_) => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Stock-mutation and ledger engine.
///
/// Generic over the store (anything implementing [`InventoryStore`]) and the
/// clock, so tests can drive ledger dates deterministically.
#[derive(Debug)]
pub struct StockEngine<S, C = SystemClock> {
    store: S,
    clock: C,
    config: EngineConfig,
}

impl<S> StockEngine<S, SystemClock>
where
    S: InventoryStore,
{
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S, C> StockEngine<S, C>
where
    S: InventoryStore,
    C: Clock,
{
    pub fn with_clock(store: S, clock: C, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Seed the default warehouses when enabled and the store has none.
    /// Returns how many were created.
    #[instrument(skip(self), err)]
    pub fn bootstrap(&self) -> EngineResult<usize> {
        if !self.config.seed_default_warehouses {
            return Ok(0);
        }
        let now = self.now();
        let seeded = self.store.write(|state| {
            if !state.warehouses().is_empty() {
                return 0;
            }
            let defaults = default_warehouses(now);
            let n = defaults.len();
            state.insert_warehouses(defaults);
            n
        })?;
        if seeded > 0 {
            info!(seeded, "seeded default warehouses");
        }
        Ok(seeded)
    }

    // ---- products & warehouses ----

    /// Register a product. Every initial-stock warehouse must exist.
    #[instrument(
        skip(self, req),
        fields(name = %req.name, product_id = tracing::field::Empty),
        err
    )]
    pub fn register_product(&self, req: NewProduct) -> EngineResult<Product> {
        let now = self.now();
        let product = self.store.write(|state| {
            for s in &req.initial_stock {
                state.require_warehouse(s.warehouse_id)?;
            }
            let product = Product::register(ProductId::new(), req, now)?;
            state.insert_product(product.clone());
            Ok::<_, DomainError>(product)
        })??;
        Span::current().record("product_id", tracing::field::display(product.id_typed()));
        info!(sku = product.sku(), "product registered");
        Ok(product)
    }

    #[instrument(skip(self, req), fields(name = %req.name), err)]
    pub fn register_warehouse(&self, req: NewWarehouse, actor: UserId) -> EngineResult<Warehouse> {
        let warehouse = Warehouse::register(WarehouseId::new(), req, actor, self.now())?;
        self.store
            .write(|state| state.insert_warehouse(warehouse.clone()))?;
        info!(warehouse_id = %warehouse.id_typed(), "warehouse registered");
        Ok(warehouse)
    }

    #[instrument(skip(self), err)]
    pub fn delete_warehouse(&self, id: WarehouseId) -> EngineResult<Warehouse> {
        let removed = self.store.write(|state| state.remove_warehouse(id))??;
        info!(name = removed.name(), "warehouse deleted");
        Ok(removed)
    }

    pub fn product(&self, id: ProductId) -> EngineResult<Product> {
        let product = self
            .store
            .read(|state| state.require_product(id).cloned())??;
        Ok(product)
    }

    pub fn warehouse(&self, id: WarehouseId) -> EngineResult<Warehouse> {
        let warehouse = self
            .store
            .read(|state| state.require_warehouse(id).cloned())??;
        Ok(warehouse)
    }

    pub fn products(&self) -> EngineResult<Vec<Product>> {
        Ok(self
            .store
            .read(|state| state.products().iter().cloned().collect())?)
    }

    pub fn warehouses(&self) -> EngineResult<Vec<Warehouse>> {
        Ok(self
            .store
            .read(|state| state.warehouses().iter().cloned().collect())?)
    }

    /// Quantity of a product at a warehouse; zero when never touched.
    pub fn quantity(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
    ) -> EngineResult<Quantity> {
        Ok(self
            .store
            .read(|state| state.quantity(product_id, warehouse_id))?)
    }

    // ---- drafts ----

    pub fn create_receipt(&self, req: NewReceipt, actor: UserId) -> EngineResult<Receipt> {
        self.create(|state, id, now| Receipt::draft(id, req, state, actor, now))
    }

    pub fn create_delivery(&self, req: NewDelivery, actor: UserId) -> EngineResult<Delivery> {
        self.create(|state, id, now| Delivery::draft(id, req, state, actor, now))
    }

    pub fn create_transfer(&self, req: NewTransfer, actor: UserId) -> EngineResult<Transfer> {
        self.create(|state, id, now| Transfer::draft(id, req, state, actor, now))
    }

    /// Create an adjustment draft. The recorded quantity is snapshotted here.
    pub fn create_adjustment(
        &self,
        req: NewAdjustment,
        actor: UserId,
    ) -> EngineResult<Adjustment> {
        self.create(|state, id, now| Adjustment::draft(id, req, state, actor, now))
    }

    #[instrument(
        skip_all,
        fields(kind = D::KIND.as_str(), document_id = tracing::field::Empty),
        err
    )]
    fn create<D, F>(&self, build: F) -> EngineResult<D>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
        F: FnOnce(&InventoryState, DocumentId, DateTime<Utc>) -> Result<D, DomainError>,
    {
        let now = self.now();
        let doc = self.store.write(|state| {
            let doc = build(state, DocumentId::new(), now)?;
            <InventoryState as Documents<D>>::documents_mut(state).insert(doc.clone());
            Ok::<_, DomainError>(doc)
        })??;
        Span::current().record("document_id", tracing::field::display(doc.id()));
        debug!("draft created");
        Ok(doc)
    }

    // ---- draft edits ----

    pub fn update_receipt(&self, id: DocumentId, req: NewReceipt) -> EngineResult<Receipt> {
        self.update::<Receipt, _>(id, |doc, state, now| doc.revise(req, state, now))
    }

    pub fn update_delivery(&self, id: DocumentId, req: NewDelivery) -> EngineResult<Delivery> {
        self.update::<Delivery, _>(id, |doc, state, now| doc.revise(req, state, now))
    }

    pub fn update_transfer(&self, id: DocumentId, req: NewTransfer) -> EngineResult<Transfer> {
        self.update::<Transfer, _>(id, |doc, state, now| doc.revise(req, state, now))
    }

    /// Edit a pending document in place. Done and canceled documents are
    /// rejected by the document itself; stock is not touched.
    #[instrument(skip(self, edit), fields(kind = D::KIND.as_str(), document_id = %id), err)]
    fn update<D, F>(&self, id: DocumentId, edit: F) -> EngineResult<D>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
        F: FnOnce(&mut D, &InventoryState, DateTime<Utc>) -> Result<(), DomainError>,
    {
        let now = self.now();
        let doc = self.store.write(|state| {
            let mut doc = <InventoryState as Documents<D>>::documents(state)
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::document_not_found(D::KIND.as_str(), id))?;
            edit(&mut doc, &*state, now)?;
            <InventoryState as Documents<D>>::documents_mut(state).insert(doc.clone());
            Ok::<_, DomainError>(doc)
        })??;
        debug!("draft updated");
        Ok(doc)
    }

    // ---- validation ----

    pub fn validate_receipt(&self, id: DocumentId, actor: UserId) -> EngineResult<Receipt> {
        self.validate(id, actor)
    }

    pub fn validate_delivery(&self, id: DocumentId, actor: UserId) -> EngineResult<Delivery> {
        self.validate(id, actor)
    }

    pub fn validate_transfer(&self, id: DocumentId, actor: UserId) -> EngineResult<Transfer> {
        self.validate(id, actor)
    }

    pub fn apply_adjustment(&self, id: DocumentId, actor: UserId) -> EngineResult<Adjustment> {
        self.validate(id, actor)
    }

    /// Validate a pending document: move its stock, append its ledger
    /// entries and mark it done, all or nothing.
    #[instrument(
        skip(self),
        fields(
            kind = D::KIND.as_str(),
            document_id = %id,
            actor = %actor,
            movements = tracing::field::Empty
        )
    )]
    pub fn validate<D>(&self, id: DocumentId, actor: UserId) -> EngineResult<D>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
    {
        let now = self.now();
        let outcome = self
            .store
            .write(|state| Self::validate_locked::<D>(state, id, actor, now))?;

        match outcome {
            Ok((doc, movements)) => {
                Span::current().record("movements", movements);
                info!(status = %doc.status(), "document validated");
                Ok(doc)
            }
            Err(e) => {
                warn!(error = %e, "document rejected");
                Err(e.into())
            }
        }
    }

    fn validate_locked<D>(
        state: &mut InventoryState,
        id: DocumentId,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<(D, usize), DomainError>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
    {
        let movements = {
            let doc = <InventoryState as Documents<D>>::documents(state)
                .get(&id)
                .ok_or_else(|| DomainError::document_not_found(D::KIND.as_str(), id))?;
            doc.ensure_open()?;
            doc.plan(&*state)?
        };

        commit(state, &movements, now).map_err(|e| {
            DomainError::invariant(format!(
                "{} {id} failed to commit after planning: {e}",
                D::KIND.as_str()
            ))
        })?;

        let movement_type = D::KIND.movement_type();
        state.append_ledger(
            movements
                .iter()
                .map(|m| LedgerEntry::record(movement_type, id, m, actor, now)),
        );

        let doc = <InventoryState as Documents<D>>::documents_mut(state)
            .get_mut(&id)
            .ok_or_else(|| {
                DomainError::invariant(format!(
                    "{} {id} disappeared during validation",
                    D::KIND.as_str()
                ))
            })?;
        doc.complete(actor, now);
        Ok((doc.clone(), movements.len()))
    }

    /// Cancel a document that is not yet done.
    #[instrument(skip(self), fields(kind = D::KIND.as_str()), err)]
    pub fn cancel<D>(&self, id: DocumentId) -> EngineResult<D>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
    {
        let now = self.now();
        let doc = self.store.write(|state| {
            let doc = <InventoryState as Documents<D>>::documents_mut(state)
                .get_mut(&id)
                .ok_or_else(|| DomainError::document_not_found(D::KIND.as_str(), id))?;
            doc.cancel(now)?;
            Ok::<_, DomainError>(doc.clone())
        })??;
        info!("document canceled");
        Ok(doc)
    }

    // ---- document queries ----

    pub fn document<D>(&self, id: DocumentId) -> EngineResult<D>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
    {
        let doc = self.store.read(|state| {
            <InventoryState as Documents<D>>::documents(state)
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::document_not_found(D::KIND.as_str(), id))
        })??;
        Ok(doc)
    }

    /// Documents of one kind matching `filter`, in creation order.
    pub fn documents<D>(&self, filter: &DocumentFilter) -> EngineResult<Vec<D>>
    where
        D: StockDocument,
        InventoryState: Documents<D>,
    {
        Ok(self.store.read(|state| {
            <InventoryState as Documents<D>>::documents(state)
                .iter()
                .filter(|d| d.matches(filter))
                .cloned()
                .collect()
        })?)
    }

    // ---- ledger & dashboard ----

    pub fn ledger(&self, query: &LedgerQuery) -> EngineResult<Vec<LedgerEntry>> {
        Ok(self.store.read(|state| query.select(state.ledger()))?)
    }

    pub fn product_ledger(&self, product_id: ProductId) -> EngineResult<Vec<LedgerEntry>> {
        self.ledger(&LedgerQuery::for_product(product_id))
    }

    /// Newest ledger entries across all products.
    pub fn recent_activity(&self) -> EngineResult<Vec<LedgerEntry>> {
        self.ledger(&LedgerQuery::recent(self.config.recent_activity_limit))
    }

    #[instrument(skip(self), err)]
    pub fn dashboard(&self, warehouse: Option<WarehouseId>) -> EngineResult<DashboardKpis> {
        let limit = self.config.dashboard_detail_limit;
        Ok(self
            .store
            .read(|state| dashboard::compute(state, warehouse, limit))?)
    }
}
