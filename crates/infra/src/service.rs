//! Order use cases (application-level orchestration).
//!
//! Every mutating use case is the same read-modify-save cycle:
//!
//! ```text
//! acquire per-order lock
//!   ↓
//! 1. Load a snapshot from the store (absent → NotFound)
//!   ↓
//! 2. Run one aggregate operation (validates, then mutates)
//!   ↓
//! 3. Save the snapshot back
//! ```
//!
//! The store keeps whatever was saved last, so the per-order lock is what
//! prevents two concurrent cycles on the same order from losing an update.
//! Different orders never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use orderdesk_core::{Currency, DomainError, DomainResult, ErrorKind, Money, OrderId, ProductRef};
use orderdesk_orders::{Address, CustomerId, Order};

use crate::config::Config;
use crate::store::{OrderStore, StoreError};

/// Unvalidated address as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressRequest {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl TryFrom<AddressRequest> for Address {
    type Error = DomainError;

    fn try_from(value: AddressRequest) -> Result<Self, Self::Error> {
        Address::new(value.street, value.city, value.postal_code, value.country)
    }
}

/// A line to add; the unit price is expressed in the order's currency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineRequest {
    pub product: ProductRef,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Use case input: place a new order with at least one line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlaceOrder {
    pub customer_id: String,
    pub shipping_address: AddressRequest,
    /// ISO-4217 code; the configured default when absent.
    #[serde(default)]
    pub currency: Option<String>,
    pub lines: Vec<LineRequest>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("order not found: {0}")]
    NotFound(OrderId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Classify within the shared taxonomy. Store failures count as internal.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(e) => e.kind(),
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Store(_) => ErrorKind::Internal,
        }
    }
}

/// Application service for orders over any [`OrderStore`].
#[derive(Debug)]
pub struct OrderService<S> {
    store: S,
    default_currency: Currency,
    locks: Mutex<HashMap<OrderId, Arc<Mutex<()>>>>,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_currency: Currency::EUR,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(store: S, config: &Config) -> Self {
        Self::new(store).with_default_currency(config.default_currency)
    }

    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- create ---

    pub fn place_order(&self, request: PlaceOrder) -> Result<Order, ServiceError> {
        if request.lines.is_empty() {
            return Err(DomainError::invalid_argument("an order must have at least one line").into());
        }

        let customer_id = CustomerId::new(request.customer_id)?;
        let address = Address::try_from(request.shipping_address)?;
        let currency = match request.currency.as_deref() {
            Some(code) => Currency::from_code(code)?,
            None => self.default_currency,
        };

        let mut order = Order::create(customer_id, address, currency);
        for line in request.lines {
            add_priced_line(&mut order, line)?;
        }

        self.store.save(&order)?;
        tracing::info!(
            order_id = %order.id_typed(),
            customer_id = %order.customer_id(),
            total = %order.total(),
            "order placed"
        );
        Ok(order)
    }

    // --- read ---

    pub fn find_order(&self, id: OrderId) -> Result<Option<Order>, ServiceError> {
        Ok(self.store.find_by_id(id)?)
    }

    pub fn get_order(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.find_order(id)?.ok_or(ServiceError::NotFound(id))
    }

    pub fn list_orders(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.store.list_all()?)
    }

    // --- update ---

    pub fn change_shipping_address(
        &self,
        id: OrderId,
        address: AddressRequest,
    ) -> Result<Order, ServiceError> {
        let address = Address::try_from(address)?;
        self.modify(id, "update shipping address", |order| {
            order.update_shipping_address(address)
        })
    }

    pub fn add_line(&self, id: OrderId, line: LineRequest) -> Result<Order, ServiceError> {
        self.modify(id, "add line", |order| add_priced_line(order, line))
    }

    pub fn remove_line(&self, id: OrderId, product: ProductRef) -> Result<Order, ServiceError> {
        self.modify(id, "remove line", |order| order.remove_line(product))
    }

    pub fn update_line_quantity(
        &self,
        id: OrderId,
        product: ProductRef,
        quantity: u32,
    ) -> Result<Order, ServiceError> {
        self.modify(id, "update line quantity", |order| {
            order.update_line_quantity(product, quantity)
        })
    }

    pub fn confirm(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.modify(id, "confirm", Order::confirm)
    }

    pub fn ship(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.modify(id, "ship", Order::ship)
    }

    pub fn deliver(&self, id: OrderId) -> Result<Order, ServiceError> {
        self.modify(id, "deliver", Order::deliver)
    }

    pub fn cancel(&self, id: OrderId, reason: &str) -> Result<Order, ServiceError> {
        self.modify(id, "cancel", |order| order.cancel(reason))
    }

    // --- delete ---

    /// Remove an order. Deleting an unknown order succeeds.
    pub fn delete_order(&self, id: OrderId) -> Result<(), ServiceError> {
        self.with_order_lock(id, || Ok(self.store.delete_by_id(id)?))
    }

    // --- internals ---

    /// Run `f` inside the critical section for `id`.
    ///
    /// Table entries live only while some call holds or waits on them, so
    /// unknown ids and idle orders leave nothing behind.
    fn with_order_lock<T, F>(&self, id: OrderId, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Result<T, ServiceError>,
    {
        let lock = self.lock_for(id)?;
        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(_) => Err(lock_poisoned(id)),
        };
        let released = self.release(id, lock);

        let value = result?;
        released?;
        Ok(value)
    }

    fn lock_for(&self, id: OrderId) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self.locks.lock().map_err(|_| lock_table_poisoned())?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    fn release(&self, id: OrderId, lock: Arc<Mutex<()>>) -> Result<(), ServiceError> {
        let mut locks = self.locks.lock().map_err(|_| lock_table_poisoned())?;
        // Two references: the table's and ours. Nobody else is waiting.
        let idle = locks.get(&id).is_some_and(|held| Arc::ptr_eq(held, &lock))
            && Arc::strong_count(&lock) == 2;
        if idle {
            locks.remove(&id);
        }
        Ok(())
    }

    fn modify<F>(&self, id: OrderId, operation: &'static str, apply: F) -> Result<Order, ServiceError>
    where
        F: FnOnce(&mut Order) -> DomainResult<()>,
    {
        self.with_order_lock(id, || {
            let mut order = self
                .store
                .find_by_id(id)?
                .ok_or(ServiceError::NotFound(id))?;

            if let Err(err) = apply(&mut order) {
                tracing::debug!(order_id = %id, operation, error = %err, "order operation rejected");
                return Err(err.into());
            }

            self.store.save(&order)?;
            tracing::debug!(order_id = %id, operation, status = %order.status(), "order updated");
            Ok(order)
        })
    }
}

fn add_priced_line(order: &mut Order, line: LineRequest) -> DomainResult<()> {
    let price = Money::new(line.unit_price, order.currency())?;
    order.add_line(line.product, line.quantity, price)
}

fn lock_table_poisoned() -> ServiceError {
    DomainError::internal("order lock table poisoned").into()
}

fn lock_poisoned(id: OrderId) -> ServiceError {
    DomainError::internal(format!("lock for order {id} poisoned")).into()
}
