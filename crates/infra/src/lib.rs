//! Infrastructure layer: transactional store and application services.
//!
//! The store is the persistence seam (atomic multi-row writes with rollback);
//! the services are the plain operations the core exposes to whatever
//! transport layer sits in front of it.

pub mod services;
pub mod store;

pub use services::{
    ConsolidationOutcome, ConsolidationService, DirectoryService, ExportService, NewProduct,
    OrderService,
};
pub use store::{InMemoryStore, StoreState, TransactionalStore};
