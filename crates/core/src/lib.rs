//! `stockmaster-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the stock engine
//! (identifiers, quantities, errors, time). No infrastructure concerns.

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod quantity;
pub mod value_object;

pub use clock::{Clock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, LedgerEntryId, ProductId, UserId, WarehouseId};
pub use quantity::Quantity;
pub use value_object::ValueObject;
