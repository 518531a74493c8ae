//! Infrastructure layer: order persistence, use-case orchestration, config.

pub mod config;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError};
pub use service::{AddressRequest, LineRequest, OrderService, PlaceOrder, ServiceError};
pub use store::{InMemoryOrderStore, OrderStore, StoreError};
