//! `orderdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod currency;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::AggregateRoot;
pub use currency::Currency;
pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{OrderId, ProductRef};
pub use money::Money;
pub use value_object::ValueObject;
