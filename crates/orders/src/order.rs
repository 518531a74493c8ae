use chrono::{DateTime, Utc};

use orderdesk_core::{
    AggregateRoot, Currency, DomainError, DomainResult, Money, OrderId, ProductRef,
};

use crate::address::Address;
use crate::customer::CustomerId;
use crate::line::OrderLine;
use crate::status::{OrderOperation, OrderStatus};

/// Aggregate root: Order.
///
/// Invariants, true after every public call:
/// - `total` is in the currency chosen at creation and equals the exact sum
///   of every line's `unit_price × quantity`;
/// - no two lines share a product;
/// - status only moves along the table in [`crate::status`];
/// - lines change only while `PENDING`/`PROCESSING`, and so does the address.
///
/// Every mutating method validates first and writes last: on `Err` the order
/// is untouched, including `last_modified_at`.
///
/// The aggregate does no locking. Two callers mutating the same instance
/// need external serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    shipping_address: Address,
    lines: Vec<OrderLine>,
    total: Money,
    status: OrderStatus,
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    last_modified_at: DateTime<Utc>,
}

impl Order {
    /// Create a new `PENDING` order with no lines and a zero total in `currency`.
    pub fn create(
        customer_id: CustomerId,
        shipping_address: Address,
        currency: Currency,
    ) -> Self {
        Self::create_with_id(OrderId::new(), customer_id, shipping_address, currency)
    }

    pub fn create_with_id(
        id: OrderId,
        customer_id: CustomerId,
        shipping_address: Address,
        currency: Currency,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id,
            shipping_address,
            lines: Vec::new(),
            total: Money::zero(currency),
            status: OrderStatus::Pending,
            cancellation_reason: None,
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Rebuild an order from already-persisted parts, re-checking every invariant.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: OrderId,
        customer_id: CustomerId,
        shipping_address: Address,
        lines: Vec<OrderLine>,
        total: Money,
        status: OrderStatus,
        cancellation_reason: Option<String>,
        created_at: DateTime<Utc>,
        last_modified_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let currency = total.currency();
        for (idx, line) in lines.iter().enumerate() {
            if line.unit_price().currency() != currency {
                return Err(DomainError::invalid_argument(format!(
                    "line {idx} is priced in {} but the order is in {currency}",
                    line.unit_price().currency()
                )));
            }
            if lines[..idx].iter().any(|l| l.product() == line.product()) {
                return Err(DomainError::invalid_argument(format!(
                    "duplicate line for product {}",
                    line.product()
                )));
            }
        }

        if cancellation_reason.is_some() != (status == OrderStatus::Cancelled) {
            return Err(DomainError::invalid_argument(
                "cancellation reason must be present exactly when the order is cancelled",
            ));
        }

        if last_modified_at < created_at {
            return Err(DomainError::invalid_argument(
                "last_modified_at precedes created_at",
            ));
        }

        let order = Self {
            id,
            customer_id,
            shipping_address,
            lines,
            total: Money::zero(currency),
            status,
            cancellation_reason,
            created_at,
            last_modified_at,
        };

        let expected = order.total_of(&order.lines)?;
        if expected != total {
            return Err(DomainError::invalid_argument(format!(
                "stored total {total} does not match the lines ({expected})"
            )));
        }

        Ok(Self { total, ..order })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, product: ProductRef) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.product() == product)
    }

    pub fn total(&self) -> &Money {
        &self.total
    }

    pub fn currency(&self) -> Currency {
        self.total.currency()
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_modified_at(&self) -> DateTime<Utc> {
        self.last_modified_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    // --- line operations ---

    /// Add `quantity` units of `product` at `unit_price`.
    ///
    /// If the product already has a line its quantity grows and the line keeps
    /// its original unit price; the new price is not reconciled.
    pub fn add_line(
        &mut self,
        product: ProductRef,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<()> {
        self.status.guard(OrderOperation::AddLine)?;

        if unit_price.currency() != self.currency() {
            return Err(DomainError::invalid_argument(format!(
                "line currency ({}) does not match the order currency ({})",
                unit_price.currency(),
                self.currency()
            )));
        }

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product() == product) {
            Some(existing) => {
                if quantity == 0 {
                    return Err(DomainError::invalid_argument("quantity must be positive"));
                }
                existing.increase_quantity(quantity)?;
            }
            None => lines.push(OrderLine::new(product, quantity, unit_price)?),
        }

        self.commit_lines(lines)
    }

    pub fn remove_line(&mut self, product: ProductRef) -> DomainResult<()> {
        self.status.guard(OrderOperation::RemoveLine)?;

        let idx = self.position_of(product)?;
        let mut lines = self.lines.clone();
        lines.remove(idx);

        self.commit_lines(lines)
    }

    pub fn update_line_quantity(&mut self, product: ProductRef, quantity: u32) -> DomainResult<()> {
        self.status.guard(OrderOperation::UpdateLineQuantity)?;

        if quantity == 0 {
            return Err(DomainError::invalid_argument("new quantity must be positive"));
        }
        let idx = self.position_of(product)?;
        let mut lines = self.lines.clone();
        lines[idx].set_quantity(quantity)?;

        self.commit_lines(lines)
    }

    pub fn update_shipping_address(&mut self, address: Address) -> DomainResult<()> {
        self.status.guard(OrderOperation::UpdateShippingAddress)?;

        self.shipping_address = address;
        self.touch();
        Ok(())
    }

    // --- lifecycle ---

    pub fn confirm(&mut self) -> DomainResult<()> {
        let next = self.status.guard(OrderOperation::Confirm)?;
        if self.lines.is_empty() {
            return Err(DomainError::invalid_state(
                self.status,
                OrderOperation::Confirm,
                "cannot confirm an empty order",
            ));
        }

        self.move_to(next);
        Ok(())
    }

    pub fn ship(&mut self) -> DomainResult<()> {
        let next = self.status.guard(OrderOperation::Ship)?;
        self.move_to(next);
        Ok(())
    }

    pub fn deliver(&mut self) -> DomainResult<()> {
        let next = self.status.guard(OrderOperation::Deliver)?;
        self.move_to(next);
        Ok(())
    }

    /// Cancel with a non-blank reason. Cancelling a cancelled order is a no-op.
    pub fn cancel(&mut self, reason: &str) -> DomainResult<()> {
        if reason.trim().is_empty() {
            return Err(DomainError::invalid_argument("cancellation reason cannot be blank"));
        }

        let next = self.status.guard(OrderOperation::Cancel)?;
        if self.status == OrderStatus::Cancelled {
            return Ok(());
        }

        self.cancellation_reason = Some(reason.to_string());
        self.move_to(next);
        Ok(())
    }

    // --- internals ---

    fn position_of(&self, product: ProductRef) -> DomainResult<usize> {
        self.lines
            .iter()
            .position(|l| l.product() == product)
            .ok_or_else(|| DomainError::line_not_found(product))
    }

    /// Sum of line subtotals, seeded at zero in the order currency.
    ///
    /// A foreign-currency line here means an earlier guard was bypassed.
    fn total_of(&self, lines: &[OrderLine]) -> DomainResult<Money> {
        let currency = self.currency();
        lines.iter().try_fold(Money::zero(currency), |acc, line| {
            let subtotal = line.subtotal()?;
            if subtotal.currency() != currency {
                return Err(DomainError::internal(format!(
                    "currency mismatch while computing the order total (order: {currency}, line: {})",
                    subtotal.currency()
                )));
            }
            acc.add(&subtotal)
        })
    }

    fn commit_lines(&mut self, lines: Vec<OrderLine>) -> DomainResult<()> {
        let total = self.total_of(&lines)?;
        self.lines = lines;
        self.total = total;
        self.touch();
        Ok(())
    }

    fn move_to(&mut self, status: OrderStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        // Never move backwards, even if the wall clock does.
        self.last_modified_at = Utc::now().max(self.last_modified_at);
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Order {{ id: {}, customer: {}, status: {}, total: {}, lines: {} }}",
            self.id,
            self.customer_id,
            self.status,
            self.total,
            self.lines.len()
        )
    }
}
