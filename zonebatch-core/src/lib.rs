//! zonebatch Core Library
//!
//! The bulk operation engine behind the zonebatch CLI:
//! - Filter expression language over DNS records (filter)
//! - Paginated record fetcher (fetch)
//! - Chunked concurrent batch runner with dry-run and progress reporting (bulk)
//! - JSON/CSV import/export codec (codec)
//! - The `BulkService` wiring them over a `ZoneApi` implementation (service)
//!
//! The crate is network-agnostic: everything talks to the API through
//! `Arc<dyn ZoneApi>`, so tests drive the engine with in-memory mocks.

pub mod bulk;
pub mod codec;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod service;
pub mod types;

// Re-export common types
pub use bulk::{BulkError, BulkOptions, BulkProgress, BulkResult, ProgressCallback};
pub use codec::{ExportFormat, ImportRecord};
pub use error::{CoreError, CoreResult};
pub use filter::RecordFilter;
pub use service::BulkService;
pub use types::{DeletedRecord, RecordChanges};
