//! Flat, serializable copy of an order for persistence backends and transport.
//!
//! Going `Order -> OrderRecord` only fails if a line subtotal cannot be
//! computed, which is an `Internal` error. Going back re-validates every
//! aggregate invariant, so a tampered or stale record never yields an order
//! in an inconsistent state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, Money, OrderId, ProductRef};

use crate::address::Address;
use crate::customer::CustomerId;
use crate::line::OrderLine;
use crate::order::Order;
use crate::status::OrderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub product: ProductRef,
    pub quantity: u32,
    pub unit_price: Money,
    /// Derived; ignored when rebuilding the order.
    pub subtotal: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub shipping_address: Address,
    pub lines: Vec<OrderLineRecord>,
    pub total: Money,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: DateTime<Utc>,
}

impl TryFrom<&Order> for OrderRecord {
    type Error = DomainError;

    fn try_from(order: &Order) -> Result<Self, Self::Error> {
        let lines = order
            .lines()
            .iter()
            .map(|line| {
                let subtotal = line.subtotal().map_err(|e| {
                    DomainError::internal(format!(
                        "subtotal of line {} could not be computed: {e}",
                        line.product()
                    ))
                })?;
                Ok(OrderLineRecord {
                    product: line.product(),
                    quantity: line.quantity(),
                    unit_price: line.unit_price().clone(),
                    subtotal,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(Self {
            id: order.id_typed(),
            customer_id: order.customer_id().clone(),
            shipping_address: order.shipping_address().clone(),
            lines,
            total: order.total().clone(),
            status: order.status(),
            cancellation_reason: order.cancellation_reason().map(str::to_string),
            created_at: order.created_at(),
            last_modified_at: order.last_modified_at(),
        })
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = DomainError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let lines = record
            .lines
            .into_iter()
            .map(|l| OrderLine::new(l.product, l.quantity, l.unit_price))
            .collect::<Result<Vec<_>, _>>()?;

        Order::restore(
            record.id,
            record.customer_id,
            record.shipping_address,
            lines,
            record.total,
            record.status,
            record.cancellation_reason,
            record.created_at,
            record.last_modified_at,
        )
    }
}
