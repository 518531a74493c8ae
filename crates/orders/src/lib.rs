//! Orders domain module.
//!
//! This crate contains the business rules for the order aggregate, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod address;
pub mod customer;
pub mod line;
pub mod order;
pub mod record;
pub mod status;

pub use address::Address;
pub use customer::CustomerId;
pub use line::OrderLine;
pub use order::Order;
pub use record::{OrderLineRecord, OrderRecord};
pub use status::{OrderOperation, OrderStatus};
