//! Products and their per-warehouse stock rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{DomainError, DomainResult, Entity, ProductId, Quantity, WarehouseId};

/// Quantity of a product held at one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub warehouse_id: WarehouseId,
    pub quantity: Quantity,
}

impl Stock {
    pub fn new(warehouse_id: WarehouseId, quantity: Quantity) -> Self {
        Self {
            warehouse_id,
            quantity,
        }
    }
}

/// Request: register a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub sku: Option<String>,
    pub category: String,
    pub unit_of_measure: String,
    pub description: Option<String>,
    /// Opening stock per warehouse. Sign is not checked.
    #[serde(default)]
    pub initial_stock: Vec<Stock>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit_of_measure: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            sku: None,
            category: category.into(),
            unit_of_measure: unit_of_measure.into(),
            description: None,
            initial_stock: Vec::new(),
        }
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_stock(mut self, warehouse_id: WarehouseId, quantity: Quantity) -> Self {
        self.initial_stock.push(Stock::new(warehouse_id, quantity));
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if self.unit_of_measure.trim().is_empty() {
            return Err(DomainError::validation("unit of measure is required"));
        }
        for (idx, stock) in self.initial_stock.iter().enumerate() {
            if self.initial_stock[..idx]
                .iter()
                .any(|s| s.warehouse_id == stock.warehouse_id)
            {
                return Err(DomainError::validation(format!(
                    "initial stock lists warehouse {} more than once",
                    stock.warehouse_id
                )));
            }
        }
        Ok(())
    }
}

/// Product with its embedded per-warehouse stock entries.
///
/// Invariant: at most one [`Stock`] entry per warehouse. Entries are created
/// lazily the first time a warehouse is touched and are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    sku: String,
    category: String,
    unit_of_measure: String,
    description: String,
    stock: Vec<Stock>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a product from a validated registration request.
    ///
    /// A missing SKU defaults to `SKU-<unix millis>`.
    pub fn register(id: ProductId, req: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        req.validate()?;
        let sku = req
            .sku
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| format!("SKU-{}", now.timestamp_millis()));

        Ok(Self {
            id,
            name: req.name,
            sku,
            category: req.category,
            unit_of_measure: req.unit_of_measure,
            description: req.description.unwrap_or_default(),
            stock: req.initial_stock,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit_of_measure(&self) -> &str {
        &self.unit_of_measure
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stock(&self) -> &[Stock] {
        &self.stock
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Quantity held at a warehouse; absence means zero.
    pub fn quantity_in(&self, warehouse_id: WarehouseId) -> Quantity {
        self.entry(warehouse_id)
            .map(|s| s.quantity)
            .unwrap_or(Quantity::ZERO)
    }

    /// Sum across all warehouses.
    pub fn total_quantity(&self) -> Quantity {
        self.stock.iter().map(|s| s.quantity).sum()
    }

    pub fn has_stock_in(&self, warehouse_id: WarehouseId) -> bool {
        self.quantity_in(warehouse_id).is_positive()
    }

    pub fn has_any_stock(&self) -> bool {
        self.stock.iter().any(|s| s.quantity.is_positive())
    }

    /// Add `delta` to the warehouse entry, creating it if needed.
    ///
    /// Returns the resulting quantity. Sufficiency is the caller's concern.
    pub fn apply_delta(
        &mut self,
        warehouse_id: WarehouseId,
        delta: Quantity,
        now: DateTime<Utc>,
    ) -> Quantity {
        let quantity = match self.entry_mut(warehouse_id) {
            Some(entry) => {
                entry.quantity += delta;
                entry.quantity
            }
            None => {
                self.stock.push(Stock::new(warehouse_id, delta));
                delta
            }
        };
        self.updated_at = now;
        quantity
    }

    /// Overwrite the warehouse entry with an absolute quantity.
    pub fn set_quantity(
        &mut self,
        warehouse_id: WarehouseId,
        quantity: Quantity,
        now: DateTime<Utc>,
    ) {
        match self.entry_mut(warehouse_id) {
            Some(entry) => entry.quantity = quantity,
            None => self.stock.push(Stock::new(warehouse_id, quantity)),
        }
        self.updated_at = now;
    }

    fn entry(&self, warehouse_id: WarehouseId) -> Option<&Stock> {
        self.stock.iter().find(|s| s.warehouse_id == warehouse_id)
    }

    fn entry_mut(&mut self, warehouse_id: WarehouseId) -> Option<&mut Stock> {
        self.stock.iter_mut().find(|s| s.warehouse_id == warehouse_id)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
