//! Order persistence boundary.
//!
//! `OrderStore` is the seam an external persistence technology implements to
//! replace the in-memory default. Its four operations are the whole contract:
//!
//! - `save` upserts by order id and keeps an independent copy, never the
//!   caller's live value;
//! - `find_by_id` / `list_all` hand out independent copies;
//! - `delete_by_id` is idempotent.
//!
//! Stores do not detect lost updates: the last `save` for an id wins.
//! Callers that read-modify-save must serialize per order themselves (see
//! [`crate::service::OrderService`]).

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use orderdesk_core::OrderId;
use orderdesk_orders::Order;

pub use in_memory::InMemoryOrderStore;

/// Store operation error.
///
/// These are **infrastructure errors** (backend unavailable, poisoned lock),
/// as opposed to domain errors. "Not found" is not an error at this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("order store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence contract for the order aggregate.
pub trait OrderStore: Send + Sync {
    fn save(&self, order: &Order) -> Result<(), StoreError>;
    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
    /// Every stored order, in no particular order.
    fn list_all(&self) -> Result<Vec<Order>, StoreError>;
    fn delete_by_id(&self, id: OrderId) -> Result<(), StoreError>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn save(&self, order: &Order) -> Result<(), StoreError> {
        (**self).save(order)
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).find_by_id(id)
    }

    fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        (**self).list_all()
    }

    fn delete_by_id(&self, id: OrderId) -> Result<(), StoreError> {
        (**self).delete_by_id(id)
    }
}
