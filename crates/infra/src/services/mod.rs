//! Application services: the plain operations the core exposes to its
//! transport boundary.
//!
//! Each operation runs as a single store transaction; the boundary performs
//! capability checks before calling in and maps `DomainError` variants onto
//! its own status codes.

pub mod consolidation;
pub mod directory;
pub mod export;
pub mod orders;

pub use consolidation::{ConsolidationOutcome, ConsolidationService};
pub use directory::{DirectoryService, NewProduct};
pub use export::ExportService;
pub use orders::OrderService;
