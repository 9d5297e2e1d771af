//! Paginated record fetcher
//!
//! Pulls every page of a zone's record listing into memory, filtering
//! client-side as it goes. The backend is never asked to filter.

use zonebatch_provider::{DnsRecord, ZoneApi};

use crate::error::CoreResult;
use crate::filter::RecordFilter;

/// Fixed page size used when draining a zone listing.
pub const FETCH_PAGE_SIZE: u32 = 100;

/// Fetch all records in a zone, keeping those that match the filter.
///
/// Pages are 1-indexed; the loop continues while the server reports
/// `current_page < total_pages` and stops otherwise. Server page ordering is
/// preserved and no cross-page deduplication is performed.
///
/// There is deliberately no iteration ceiling: a backend that never reports
/// completion keeps this looping (see DESIGN.md).
pub async fn fetch_all_records(
    api: &dyn ZoneApi,
    zone_id: &str,
    filter: Option<&RecordFilter>,
) -> CoreResult<Vec<DnsRecord>> {
    let mut records = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = api.list_records(zone_id, page, FETCH_PAGE_SIZE).await?;
        let current_page = batch.current_page;
        let total_pages = batch.total_pages;

        log::debug!(
            "fetched page {current_page}/{total_pages} of zone {zone_id} ({} records)",
            batch.records.len()
        );

        match filter {
            Some(f) => records.extend(batch.records.into_iter().filter(|r| f.matches(r))),
            None => records.extend(batch.records),
        }

        if current_page >= total_pages {
            break;
        }
        page += 1;
    }

    Ok(records)
}
