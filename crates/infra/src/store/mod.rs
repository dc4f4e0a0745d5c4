//! Transactional persistence seam.
//!
//! Every multi-step mutation in the system (item add/remove plus totals
//! recalculation, order completion with stock deduction, consolidation)
//! runs through [`TransactionalStore::transaction`], which guarantees
//! all-or-nothing application: an `Err` from the closure leaves the store
//! untouched.

pub mod memory;
pub mod state;

pub use memory::InMemoryStore;
pub use state::StoreState;

use std::sync::Arc;

use petalflow_core::DomainResult;

/// Atomic read/write access to the full persistent state.
///
/// Implementations must provide:
/// - **Atomicity**: `transaction` commits everything the closure did, or
///   nothing at all if it returns `Err`.
/// - **Isolation**: concurrent transactions must not observe each other's
///   partial effects; writers are serialized (this subsumes the row-level
///   locking the stock check needs).
/// - **Bounded waiting**: lock/connection acquisition is subject to a
///   deadline and surfaces `DomainError::Timeout`, never an indefinite block.
pub trait TransactionalStore: Send + Sync {
    /// Run a read-only closure against a consistent snapshot.
    fn read<R>(&self, f: impl FnOnce(&StoreState) -> DomainResult<R>) -> DomainResult<R>;

    /// Run a mutating closure as a single atomic transaction.
    fn transaction<R>(&self, f: impl FnOnce(&mut StoreState) -> DomainResult<R>)
        -> DomainResult<R>;
}

impl<S> TransactionalStore for Arc<S>
where
    S: TransactionalStore + ?Sized,
{
    fn read<R>(&self, f: impl FnOnce(&StoreState) -> DomainResult<R>) -> DomainResult<R> {
        (**self).read(f)
    }

    fn transaction<R>(
        &self,
        f: impl FnOnce(&mut StoreState) -> DomainResult<R>,
    ) -> DomainResult<R> {
        (**self).transaction(f)
    }
}
