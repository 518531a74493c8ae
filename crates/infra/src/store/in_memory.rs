use std::collections::HashMap;
use std::sync::RwLock;

use orderdesk_core::OrderId;
use orderdesk_orders::Order;

use super::{OrderStore, StoreError};

/// In-memory order store for tests/dev.
///
/// Snapshot isolation comes from structural copies: `Order` owns all of its
/// data, so `clone()` is a deep copy. `save` stores a clone of the caller's
/// value and every read returns a fresh clone, so no reference ever reaches
/// the stored state.
///
/// The map sits behind an `RwLock`; callers need no locking of their own and a
/// write for one key is never observed half-done.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.orders.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl OrderStore for InMemoryOrderStore {
    fn save(&self, order: &Order) -> Result<(), StoreError> {
        let snapshot = order.clone();
        let id = snapshot.id_typed();

        let mut orders = self.orders.write().map_err(|_| poisoned())?;
        orders.insert(id, snapshot);
        drop(orders);

        tracing::info!(order_id = %id, "order saved");
        Ok(())
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| poisoned())?;
        Ok(orders.values().cloned().collect())
    }

    fn delete_by_id(&self, id: OrderId) -> Result<(), StoreError> {
        let removed = self.orders.write().map_err(|_| poisoned())?.remove(&id);

        match removed {
            Some(_) => tracing::info!(order_id = %id, "order deleted"),
            None => tracing::warn!(order_id = %id, "delete requested for unknown order"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use orderdesk_core::{Currency, Money, ProductRef};
    use orderdesk_orders::{Address, CustomerId, OrderStatus};

    fn test_order() -> Order {
        let mut order = Order::create(
            CustomerId::new("c1").unwrap(),
            Address::new("Calle Falsa 123", "Springfield", "12345", "España").unwrap(),
            Currency::EUR,
        );
        order
            .add_line(ProductRef::new(), 2, Money::parse("10.50", "EUR").unwrap())
            .unwrap();
        order
    }

    #[test]
    fn save_then_find_returns_equal_snapshot() {
        let store = InMemoryOrderStore::new();
        let order = test_order();

        store.save(&order).unwrap();
        let found = store.find_by_id(order.id_typed()).unwrap().unwrap();
        assert_eq!(found, order);
    }

    #[test]
    fn find_unknown_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.find_by_id(OrderId::new()).unwrap().is_none());
    }

    #[test]
    fn mutating_the_saved_value_does_not_leak_into_the_store() {
        let store = InMemoryOrderStore::new();
        let mut order = test_order();
        store.save(&order).unwrap();

        order.confirm().unwrap();

        let stored = store.find_by_id(order.id_typed()).unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Pending);
    }

    #[test]
    fn mutating_a_read_does_not_affect_later_reads() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        store.save(&order).unwrap();

        let mut first = store.find_by_id(order.id_typed()).unwrap().unwrap();
        first.cancel("changed mind").unwrap();
        first
            .add_line(ProductRef::new(), 1, Money::parse("1", "EUR").unwrap())
            .unwrap_err();

        let second = store.find_by_id(order.id_typed()).unwrap().unwrap();
        assert_eq!(second, order);

        store.save(&first).unwrap();
        let third = store.find_by_id(order.id_typed()).unwrap().unwrap();
        assert_eq!(third.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn save_upserts_by_id() {
        let store = InMemoryOrderStore::new();
        let mut order = test_order();
        store.save(&order).unwrap();

        order.confirm().unwrap();
        store.save(&order).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        let stored = store.find_by_id(order.id_typed()).unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Processing);
    }

    #[test]
    fn list_all_returns_every_order() {
        let store = InMemoryOrderStore::new();
        let a = test_order();
        let b = test_order();
        store.save(&a).unwrap();
        store.save(&b).unwrap();

        let mut ids: Vec<OrderId> = store.list_all().unwrap().iter().map(|o| o.id_typed()).collect();
        ids.sort_by_key(|id| *id.as_uuid());
        let mut expected = vec![a.id_typed(), b.id_typed()];
        expected.sort_by_key(|id| *id.as_uuid());
        assert_eq!(ids, expected);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryOrderStore::new();
        let order = test_order();
        store.save(&order).unwrap();

        store.delete_by_id(order.id_typed()).unwrap();
        assert!(store.find_by_id(order.id_typed()).unwrap().is_none());

        let unknown = OrderId::new();
        store.delete_by_id(unknown).unwrap();
        store.delete_by_id(unknown).unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn poisoned_lock_is_reported_as_unavailable() {
        let store = Arc::new(InMemoryOrderStore::new());
        store.save(&test_order()).unwrap();

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.orders.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        let unavailable = StoreError::Unavailable("lock poisoned".to_string());
        assert_eq!(store.len().unwrap_err(), unavailable);
        assert_eq!(store.is_empty().unwrap_err(), unavailable);
        assert_eq!(store.list_all().unwrap_err(), unavailable);
        assert_eq!(store.save(&test_order()).unwrap_err(), unavailable);
    }

    #[test]
    fn concurrent_saves_and_reads_never_see_partial_writes() {
        let store = Arc::new(InMemoryOrderStore::new());
        let orders: Vec<Order> = (0..8).map(|_| test_order()).collect();

        let handles: Vec<_> = orders
            .iter()
            .cloned()
            .map(|order| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut order = order;
                    for _ in 0..50 {
                        store.save(&order).unwrap();
                        let seen = store.find_by_id(order.id_typed()).unwrap().unwrap();
                        assert_eq!(seen.id_typed(), order.id_typed());
                        assert_eq!(
                            seen.total().amount(),
                            seen.lines()
                                .iter()
                                .map(|l| l.subtotal().unwrap().amount())
                                .sum::<rust_decimal::Decimal>()
                        );
                        let _ = store.list_all().unwrap();
                        let product = seen.lines()[0].product();
                        let quantity = seen.lines()[0].quantity() + 1;
                        order.update_line_quantity(product, quantity).unwrap();
                    }
                    store.save(&order).unwrap();
                    order
                })
            })
            .collect();

        for handle in handles {
            let last = handle.join().unwrap();
            let stored = store.find_by_id(last.id_typed()).unwrap().unwrap();
            assert_eq!(stored, last);
        }
        assert_eq!(store.len().unwrap(), orders.len());
    }
}
