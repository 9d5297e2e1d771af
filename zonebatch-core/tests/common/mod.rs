//! Shared test mock for the `ZoneApi` seam.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use zonebatch_provider::{
    DnsRecord, FirewallRule, FirewallRulePayload, ProviderError, RecordPage, RecordPayload,
    RecordType, Result, WorkerScript, WorkerScriptPayload, Zone, ZoneApi,
};

/// In-memory `ZoneApi` with scripted failures, mutation counters and an
/// in-flight gauge for concurrency assertions.
pub struct MockZoneApi {
    /// Zone content served by `list_records`, in insertion order.
    pub records: Mutex<Vec<DnsRecord>>,
    /// Record names whose creation fails.
    pub fail_creates: Mutex<HashSet<String>>,
    /// Record ids whose update fails.
    pub fail_updates: Mutex<HashSet<String>>,
    /// Record ids whose deletion fails.
    pub fail_deletes: Mutex<HashSet<String>>,
    /// Make the firewall batch endpoint fail as a whole.
    pub fail_firewall: AtomicBool,
    /// Artificial latency per mutation, so concurrent items actually overlap.
    pub op_latency: Duration,

    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub firewall_calls: AtomicUsize,
    pub worker_calls: AtomicUsize,

    in_flight: AtomicUsize,
    /// High-water mark of simultaneously in-flight mutations.
    pub max_in_flight: AtomicUsize,
    next_id: AtomicUsize,
}

impl MockZoneApi {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_creates: Mutex::new(HashSet::new()),
            fail_updates: Mutex::new(HashSet::new()),
            fail_deletes: Mutex::new(HashSet::new()),
            fail_firewall: AtomicBool::new(false),
            op_latency: Duration::ZERO,
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            firewall_calls: AtomicUsize::new(0),
            worker_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.op_latency = latency;
        self
    }

    async fn begin_op(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.op_latency.is_zero() {
            tokio::time::sleep(self.op_latency).await;
        }
    }

    fn end_op(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn unknown_error(detail: &str) -> ProviderError {
        ProviderError::Unknown {
            provider: "mock".to_string(),
            raw_code: None,
            raw_message: detail.to_string(),
        }
    }
}

/// Record factory with sane defaults.
pub fn make_record(id: &str, record_type: RecordType, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        zone_id: "zone-1".to_string(),
        record_type,
        name: name.to_string(),
        content: content.to_string(),
        ttl: 300,
        proxied: None,
        priority: None,
        comment: None,
        tags: Vec::new(),
        created_on: None,
        modified_on: None,
    }
}

#[async_trait]
impl ZoneApi for MockZoneApi {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn verify_token(&self) -> Result<bool> {
        Ok(true)
    }

    async fn list_zones(&self, _page: u32, _page_size: u32) -> Result<Vec<Zone>> {
        Ok(vec![Zone {
            id: "zone-1".to_string(),
            name: "example.com".to_string(),
            status: "active".to_string(),
        }])
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Zone> {
        Ok(Zone {
            id: zone_id.to_string(),
            name: "example.com".to_string(),
            status: "active".to_string(),
        })
    }

    async fn list_records(&self, _zone_id: &str, page: u32, page_size: u32) -> Result<RecordPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let records = self.records.lock().expect("records lock");
        let size = page_size.max(1) as usize;
        let start = (page.max(1) as usize - 1) * size;
        let slice: Vec<DnsRecord> = records.iter().skip(start).take(size).cloned().collect();
        let total_pages = u32::try_from(records.len().div_ceil(size)).unwrap_or(u32::MAX);

        Ok(RecordPage {
            records: slice,
            current_page: page,
            total_pages,
        })
    }

    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<DnsRecord> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_op().await;

        let outcome = if self
            .fail_creates
            .lock()
            .expect("fail_creates lock")
            .contains(&payload.name)
        {
            Err(Self::unknown_error("create failed by test script"))
        } else {
            Ok(DnsRecord {
                id: self.fresh_id("created"),
                zone_id: zone_id.to_string(),
                record_type: payload.record_type.clone(),
                name: payload.name.clone(),
                content: payload.content.clone(),
                ttl: payload.ttl,
                proxied: payload.proxied,
                priority: payload.priority,
                comment: payload.comment.clone(),
                tags: Vec::new(),
                created_on: None,
                modified_on: None,
            })
        };

        self.end_op();
        outcome
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_op().await;

        let outcome = if self
            .fail_updates
            .lock()
            .expect("fail_updates lock")
            .contains(record_id)
        {
            Err(Self::unknown_error("update failed by test script"))
        } else {
            Ok(DnsRecord {
                id: record_id.to_string(),
                zone_id: zone_id.to_string(),
                record_type: payload.record_type.clone(),
                name: payload.name.clone(),
                content: payload.content.clone(),
                ttl: payload.ttl,
                proxied: payload.proxied,
                priority: payload.priority,
                comment: payload.comment.clone(),
                tags: Vec::new(),
                created_on: None,
                modified_on: None,
            })
        };

        self.end_op();
        outcome
    }

    async fn delete_record(&self, _zone_id: &str, record_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_op().await;

        let outcome = if self
            .fail_deletes
            .lock()
            .expect("fail_deletes lock")
            .contains(record_id)
        {
            Err(Self::unknown_error("delete failed by test script"))
        } else {
            Ok(())
        };

        self.end_op();
        outcome
    }

    async fn create_firewall_rules(
        &self,
        _zone_id: &str,
        rules: &[FirewallRulePayload],
    ) -> Result<Vec<FirewallRule>> {
        self.firewall_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_firewall.load(Ordering::SeqCst) {
            return Err(Self::unknown_error("firewall endpoint failed by test script"));
        }

        Ok(rules
            .iter()
            .map(|rule| FirewallRule {
                id: self.fresh_id("fw"),
                expression: rule.expression.clone(),
                action: rule.action.clone(),
                description: rule.description.clone(),
                paused: rule.paused,
                priority: rule.priority,
            })
            .collect())
    }

    async fn upload_worker(&self, script: &WorkerScriptPayload) -> Result<WorkerScript> {
        self.worker_calls.fetch_add(1, Ordering::SeqCst);
        self.begin_op().await;
        self.end_op();

        Ok(WorkerScript {
            id: script.name.clone(),
            modified_on: None,
        })
    }

    async fn export_zone_file(&self, zone_id: &str) -> Result<String> {
        Ok(format!(
            ";; zone file for {zone_id}\nexample.com.\t300\tIN\tA\t1.2.3.4\n"
        ))
    }
}
