//! # zonebatch-provider
//!
//! Cloudflare API client for the zonebatch bulk operation engine.
//!
//! The crate exposes two things:
//!
//! - [`CloudflareApi`] — a thin, typed client over the Cloudflare v4 REST API
//!   (zones, DNS records, firewall rules, worker scripts, BIND zone export),
//!   authenticated with a static bearer token.
//! - [`ZoneApi`] — the trait seam the bulk engine drives. `CloudflareApi`
//!   implements it; tests implement it with in-memory mocks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonebatch_provider::{CloudflareApi, RecordPayload, RecordType, ZoneApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = CloudflareApi::new("your-token");
//!
//!     // List the first page of records in a zone
//!     let page = api.list_records("zone-id", 1, 100).await?;
//!     for record in &page.records {
//!         println!("{} {} -> {}", record.record_type, record.name, record.content);
//!     }
//!
//!     // Create a record
//!     let payload = RecordPayload::new(RecordType::A, "www.example.com", "1.2.3.4");
//!     let record = api.create_record("zone-id", &payload).await?;
//!     println!("created {}", record.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError). Cloudflare
//! error codes are mapped to structured variants ([`ProviderError::InvalidCredentials`],
//! [`ProviderError::RecordExists`], [`ProviderError::RateLimited`], ...). Transient
//! failures are surfaced immediately — this client performs no retries; pacing is
//! the caller's concern (the bulk engine uses a fixed inter-batch delay).

mod cloudflare;
mod error;
mod traits;
mod types;

pub use cloudflare::CloudflareApi;
pub use error::{ProviderError, Result};
pub use traits::ZoneApi;
pub use types::{
    DnsRecord, FirewallRule, FirewallRulePayload, RecordPage, RecordPayload, RecordType,
    WorkerScript, WorkerScriptPayload, Zone,
};
