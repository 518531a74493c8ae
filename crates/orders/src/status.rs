//! Order status lifecycle and the single transition table guarding it.
//!
//! ```text
//! PENDING ──confirm──▶ PROCESSING ──ship──▶ SHIPPED ──deliver──▶ DELIVERED
//!    │                     │                   │
//!    └───────cancel────────┴───────cancel──────┴──▶ CANCELLED
//! ```
//!
//! Every public operation of [`crate::Order`] asks [`OrderStatus::guard`]
//! before touching state, so the rules live in one `match`.

use serde::{Deserialize, Serialize};

use orderdesk_core::{DomainError, DomainResult};

/// Order status lifecycle. `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Status reached by applying `operation`, or `None` if the table forbids it.
    ///
    /// Operations that do not move the lifecycle (line and address edits)
    /// resolve to the current status when allowed. Cancelling a cancelled
    /// order resolves to `Cancelled` (idempotent).
    pub fn next(self, operation: OrderOperation) -> Option<OrderStatus> {
        use OrderOperation as Op;
        use OrderStatus::*;

        match (self, operation) {
            (Pending | Processing, Op::AddLine | Op::RemoveLine | Op::UpdateLineQuantity) => {
                Some(self)
            }
            (Pending | Processing, Op::UpdateShippingAddress) => Some(self),
            (Pending, Op::Confirm) => Some(Processing),
            (Processing, Op::Ship) => Some(Shipped),
            (Shipped, Op::Deliver) => Some(Delivered),
            (Pending | Processing | Shipped | Cancelled, Op::Cancel) => Some(Cancelled),
            _ => None,
        }
    }

    /// Like [`OrderStatus::next`], but a rejection becomes `InvalidState`.
    pub fn guard(self, operation: OrderOperation) -> DomainResult<OrderStatus> {
        self.next(operation)
            .ok_or_else(|| DomainError::invalid_state(self, operation, rejection(self, operation)))
    }
}

fn rejection(status: OrderStatus, operation: OrderOperation) -> String {
    use OrderOperation as Op;

    match (status, operation) {
        (OrderStatus::Delivered, Op::Cancel) => "cannot cancel a delivered order".to_string(),
        (_, Op::Confirm) => "only pending orders can be confirmed".to_string(),
        (_, Op::Ship) => "only processing orders can be shipped".to_string(),
        (_, Op::Deliver) => "only shipped orders can be delivered".to_string(),
        (_, Op::UpdateShippingAddress) => format!(
            "the address of a {} order can no longer change",
            status.as_str().to_lowercase()
        ),
        _ => format!(
            "order lines are locked once the order is {}",
            status.as_str().to_lowercase()
        ),
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every operation that the status table arbitrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderOperation {
    AddLine,
    RemoveLine,
    UpdateLineQuantity,
    UpdateShippingAddress,
    Confirm,
    Ship,
    Deliver,
    Cancel,
}

impl OrderOperation {
    pub const ALL: [OrderOperation; 8] = [
        OrderOperation::AddLine,
        OrderOperation::RemoveLine,
        OrderOperation::UpdateLineQuantity,
        OrderOperation::UpdateShippingAddress,
        OrderOperation::Confirm,
        OrderOperation::Ship,
        OrderOperation::Deliver,
        OrderOperation::Cancel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderOperation::AddLine => "add line",
            OrderOperation::RemoveLine => "remove line",
            OrderOperation::UpdateLineQuantity => "update line quantity",
            OrderOperation::UpdateShippingAddress => "update shipping address",
            OrderOperation::Confirm => "confirm",
            OrderOperation::Ship => "ship",
            OrderOperation::Deliver => "deliver",
            OrderOperation::Cancel => "cancel",
        }
    }
}

impl core::fmt::Display for OrderOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderdesk_core::ErrorKind;

    #[test]
    fn lifecycle_edges() {
        use OrderOperation as Op;
        use OrderStatus::*;

        assert_eq!(Pending.next(Op::Confirm), Some(Processing));
        assert_eq!(Processing.next(Op::Ship), Some(Shipped));
        assert_eq!(Shipped.next(Op::Deliver), Some(Delivered));
        for from in [Pending, Processing, Shipped, Cancelled] {
            assert_eq!(from.next(Op::Cancel), Some(Cancelled));
        }
        assert_eq!(Delivered.next(Op::Cancel), None);
    }

    #[test]
    fn line_edits_only_while_pending_or_processing() {
        for status in OrderStatus::ALL {
            let open = matches!(status, OrderStatus::Pending | OrderStatus::Processing);
            for op in [
                OrderOperation::AddLine,
                OrderOperation::RemoveLine,
                OrderOperation::UpdateLineQuantity,
                OrderOperation::UpdateShippingAddress,
            ] {
                assert_eq!(status.next(op).is_some(), open, "{status} / {op}");
            }
        }
    }

    #[test]
    fn terminal_states_accept_nothing_but_idempotent_cancel() {
        for op in OrderOperation::ALL {
            assert_eq!(OrderStatus::Delivered.next(op), None, "{op}");
            let expected = (op == OrderOperation::Cancel).then_some(OrderStatus::Cancelled);
            assert_eq!(OrderStatus::Cancelled.next(op), expected, "{op}");
        }
    }

    #[test]
    fn guard_reports_status_and_operation() {
        let err = OrderStatus::Delivered.guard(OrderOperation::Cancel).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(
            err,
            DomainError::InvalidState {
                status: "DELIVERED".to_string(),
                operation: "cancel".to_string(),
                message: "cannot cancel a delivered order".to_string(),
            }
        );
    }

    #[test]
    fn status_serializes_in_upper_case() {
        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"PROCESSING\"");
    }
}
