use std::time::Duration;

use parking_lot::RwLock;

use petalflow_core::{DomainError, DomainResult};

use super::state::StoreState;
use super::TransactionalStore;

/// Default deadline for lock acquisition.
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// In-memory transactional store.
///
/// Writers are serialized through a single `RwLock` write guard, which gives
/// serializable isolation: a transaction always sees (and replaces) a fully
/// committed state. The closure works on a clone of the state; the clone is
/// swapped in only when it returns `Ok`, so every error path rolls back.
///
/// Intended for tests/dev and as the reference semantics for a real
/// database-backed implementation. Not optimized for large data sets.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    lock_timeout: Duration,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Store with a custom lock-acquisition deadline.
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            state: RwLock::new(StoreState::new()),
            lock_timeout,
        }
    }
}

impl TransactionalStore for InMemoryStore {
    fn read<R>(&self, f: impl FnOnce(&StoreState) -> DomainResult<R>) -> DomainResult<R> {
        let guard = self
            .state
            .try_read_for(self.lock_timeout)
            .ok_or_else(|| DomainError::timeout("store read lock not acquired within deadline"))?;
        f(&guard)
    }

    fn transaction<R>(
        &self,
        f: impl FnOnce(&mut StoreState) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let mut guard = self
            .state
            .try_write_for(self.lock_timeout)
            .ok_or_else(|| DomainError::timeout("store write lock not acquired within deadline"))?;

        let mut working = guard.clone();
        let result = f(&mut working)?;
        *guard = working;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use petalflow_core::AggregateId;
    use petalflow_orders::{Order, OrderId};
    use petalflow_parties::PartyId;

    fn draft_order() -> Order {
        Order::create(
            OrderId::new(AggregateId::new()),
            PartyId::new(AggregateId::new()),
            Utc::now(),
        )
    }

    #[test]
    fn committed_transactions_are_visible_to_readers() {
        let store = InMemoryStore::new();
        let order = draft_order();
        let order_id = order.id_typed();

        store
            .transaction(|state| {
                state.upsert_order(order.clone());
                Ok(())
            })
            .unwrap();

        let found = store
            .read(|state| Ok(state.order(order_id).cloned()))
            .unwrap();
        assert_eq!(found, Some(order));
    }

    #[test]
    fn failed_transactions_roll_back_every_change() {
        let store = InMemoryStore::new();
        let order_id = draft_order().id_typed();

        let err = store
            .transaction(|state| {
                state.upsert_order(draft_order());
                state.upsert_order(draft_order());
                Err::<(), DomainError>(DomainError::invalid_state("induced failure"))
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        let count = store
            .read(|state| Ok(state.orders().count()))
            .unwrap();
        assert_eq!(count, 0);
        assert!(store.read(|s| Ok(s.order(order_id).is_none())).unwrap());
    }

    #[test]
    fn write_lock_contention_surfaces_timeout() {
        let store = InMemoryStore::with_lock_timeout(Duration::from_millis(10));

        // A transaction attempted while a read snapshot is still open cannot
        // acquire the write lock and must fail with Timeout instead of
        // blocking indefinitely.
        let err = store
            .read(|_| {
                store
                    .transaction(|_| Ok(()))
                    .map(|_| ())
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Timeout(_)));
    }
}
