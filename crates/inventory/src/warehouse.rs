//! Warehouses and the default pair seeded on bootstrap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockmaster_core::{DomainError, DomainResult, Entity, UserId, WarehouseId};

/// Request: register a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWarehouse {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
}

impl NewWarehouse {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            description: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() || self.location.trim().is_empty() {
            return Err(DomainError::validation("name and location are required"));
        }
        Ok(())
    }
}

/// A physical stock location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    id: WarehouseId,
    name: String,
    location: String,
    description: String,
    created_at: DateTime<Utc>,
    /// `None` for warehouses seeded at startup.
    created_by: Option<UserId>,
}

impl Warehouse {
    pub fn register(
        id: WarehouseId,
        req: NewWarehouse,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        req.validate()?;
        Ok(Self {
            id,
            name: req.name,
            location: req.location,
            description: req.description.unwrap_or_default(),
            created_at: now,
            created_by: Some(actor),
        })
    }

    fn seeded(name: &str, location: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: WarehouseId::new(),
            name: name.to_string(),
            location: location.to_string(),
            description: String::new(),
            created_at: now,
            created_by: None,
        }
    }

    pub fn id_typed(&self) -> WarehouseId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The two warehouses a fresh installation starts with.
pub fn default_warehouses(now: DateTime<Utc>) -> Vec<Warehouse> {
    vec![
        Warehouse::seeded("Main Warehouse", "Headquarters", now),
        Warehouse::seeded("Production Floor", "Building A", now),
    ]
}
