//! End-to-end tests for the bulk engine over a mock zone API.

mod common;

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::{make_record, MockZoneApi};
use zonebatch_core::{
    BulkOptions, BulkProgress, BulkService, ExportFormat, RecordChanges, RecordFilter,
};
use zonebatch_provider::{FirewallRulePayload, RecordPayload, RecordType, WorkerScriptPayload};

fn service(mock: MockZoneApi) -> (BulkService, Arc<MockZoneApi>) {
    let api = Arc::new(mock);
    (BulkService::new(api.clone()), api)
}

fn payloads(count: usize) -> Vec<RecordPayload> {
    (0..count)
        .map(|i| RecordPayload::new(RecordType::A, format!("host{i}.example.com"), "1.2.3.4"))
        .collect()
}

/// A 500-record fixture zone: 12 type-A records under `*.staging.example.com`,
/// plus prod A records, staging TXT records (type mismatch), prod CNAME
/// records, and the bare apex `staging.example.com` (glob anchoring).
fn fixture_zone() -> Vec<zonebatch_provider::DnsRecord> {
    let mut records = Vec::with_capacity(500);
    for i in 0..12 {
        records.push(make_record(
            &format!("target-{i}"),
            RecordType::A,
            &format!("svc{i}.staging.example.com"),
            "10.0.0.1",
        ));
    }
    for i in 0..237 {
        records.push(make_record(
            &format!("web-{i}"),
            RecordType::A,
            &format!("web{i}.example.com"),
            "192.0.2.1",
        ));
    }
    // name matches the glob but the type does not
    for i in 0..150 {
        records.push(make_record(
            &format!("txt-{i}"),
            RecordType::Txt,
            &format!("v{i}.staging.example.com"),
            "v=spf1 -all",
        ));
    }
    for i in 0..100 {
        records.push(make_record(
            &format!("cname-{i}"),
            RecordType::Cname,
            &format!("c{i}.prod.example.com"),
            "web0.example.com",
        ));
    }
    // type matches but the glob requires a non-empty dotted prefix
    records.push(make_record(
        "apex-staging",
        RecordType::A,
        "staging.example.com",
        "10.0.0.99",
    ));
    assert_eq!(records.len(), 500);
    records
}

// ---- concurrency bound ----

#[tokio::test]
async fn concurrency_never_exceeds_configured_bound() {
    let (service, api) = service(MockZoneApi::new().with_latency(Duration::from_millis(10)));

    let options = BulkOptions {
        concurrency: 3,
        ..BulkOptions::default()
    };
    let result = service
        .bulk_create_records("zone-1", payloads(20), &options)
        .await
        .expect("bulk create");

    assert!(result.success);
    assert_eq!(result.succeeded, 20);
    let max = api.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 3, "in-flight high-water mark was {max}");
    assert_eq!(max, 3, "batches of 3 should actually overlap");
}

// ---- dry-run purity ----

#[tokio::test]
async fn dry_run_create_performs_no_mutations() {
    let (service, api) = service(MockZoneApi::new());

    let options = BulkOptions {
        dry_run: true,
        ..BulkOptions::default()
    };
    let result = service
        .bulk_create_records("zone-1", payloads(8), &options)
        .await
        .expect("bulk create");

    assert!(result.dry_run);
    assert!(result.success);
    assert_eq!(result.succeeded, 8);
    assert_eq!(result.failed, 0);
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);

    // fabricated results echo the input with placeholder ids and a timestamp
    assert_eq!(result.items.len(), 8);
    for item in &result.items {
        assert!(item.id.starts_with("dry-run-"));
        assert!(item.created_on.is_some());
    }
}

#[tokio::test]
async fn dry_run_update_merges_changes_without_calls() {
    let records = vec![
        make_record("rec-1", RecordType::A, "a.example.com", "1.1.1.1"),
        make_record("rec-2", RecordType::A, "b.example.com", "2.2.2.2"),
    ];
    let (service, api) = service(MockZoneApi::with_records(records));

    let changes = RecordChanges {
        ttl: Some(60),
        ..RecordChanges::default()
    };
    let options = BulkOptions {
        dry_run: true,
        ..BulkOptions::default()
    };
    let result = service
        .bulk_update_records("zone-1", None, changes, &options)
        .await
        .expect("bulk update");

    assert!(result.success && result.dry_run);
    assert_eq!(result.succeeded, 2);
    assert_eq!(api.update_calls.load(Ordering::SeqCst), 0);
    // passthrough of the existing record, merged with the change
    assert!(result.items.iter().all(|r| r.ttl == 60));
    assert!(result.items.iter().any(|r| r.id == "rec-1"));
}

// ---- end-to-end scenario ----

#[tokio::test]
async fn preview_then_dry_run_delete_on_fixture_zone() {
    let (service, api) = service(MockZoneApi::with_records(fixture_zone()));

    let filter = RecordFilter::parse("type=A name=*.staging.example.com");
    let matched = service
        .preview_records("zone-1", Some(&filter))
        .await
        .expect("preview");

    assert_eq!(matched.len(), 12);
    assert!(matched
        .iter()
        .all(|r| r.name.ends_with(".staging.example.com")));

    let options = BulkOptions {
        dry_run: true,
        ..BulkOptions::default()
    };
    let result = service
        .bulk_delete_records("zone-1", Some(&filter), &options)
        .await
        .expect("bulk delete");

    assert!(result.dry_run);
    assert_eq!(result.succeeded, 12);
    assert_eq!(result.failed, 0);
    assert_eq!(api.delete_calls.load(Ordering::SeqCst), 0);
    // the delete result is the identifier/name pair
    assert!(result.items.iter().any(|d| d.id == "target-0"));
}

// ---- pagination ----

#[tokio::test]
async fn fetch_drains_every_page_in_order() {
    let records: Vec<_> = (0..250)
        .map(|i| {
            make_record(
                &format!("rec-{i:03}"),
                RecordType::A,
                &format!("h{i}.example.com"),
                "1.2.3.4",
            )
        })
        .collect();
    let (service, api) = service(MockZoneApi::with_records(records));

    let all = service.preview_records("zone-1", None).await.expect("preview");

    assert_eq!(all.len(), 250);
    // server page ordering preserved, no dedup
    let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    // 250 records at page size 100 -> 3 list calls
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 3);
}

// ---- continue-on-error semantics ----

#[tokio::test]
async fn continue_on_error_lets_every_item_settle() {
    let records: Vec<_> = (0..10)
        .map(|i| {
            make_record(
                &format!("rec-{i}"),
                RecordType::A,
                &format!("h{i}.example.com"),
                "1.2.3.4",
            )
        })
        .collect();
    let mock = MockZoneApi::with_records(records);
    // items 4 and 7 (ids rec-3 and rec-6) are engineered to fail
    {
        let mut failures = mock.fail_updates.lock().expect("fail_updates lock");
        failures.insert("rec-3".to_string());
        failures.insert("rec-6".to_string());
    }
    let (service, api) = service(mock);

    let snapshots: Arc<Mutex<Vec<BulkProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    let options = BulkOptions {
        concurrency: 3,
        continue_on_error: true,
        progress: Some(Arc::new(move |p: &BulkProgress| {
            if let Ok(mut all) = sink.lock() {
                all.push(p.clone());
            }
        })),
        ..BulkOptions::default()
    };

    let changes = RecordChanges {
        content: Some("9.9.9.9".to_string()),
        ..RecordChanges::default()
    };
    let result = service
        .bulk_update_records("zone-1", None, changes, &options)
        .await
        .expect("bulk update");

    assert!(!result.success);
    assert_eq!(result.completed, 10);
    assert_eq!(result.succeeded, 8);
    assert_eq!(result.failed, 2);
    assert_eq!(api.update_calls.load(Ordering::SeqCst), 10);
    assert_eq!(result.errors.len(), 2);
    assert!(result
        .errors
        .iter()
        .all(|e| e.error.contains("update failed by test script")));

    // accounting invariant at every intermediate snapshot
    let all = snapshots.lock().map(|s| s.clone()).unwrap_or_default();
    assert_eq!(all.len(), 10);
    for snapshot in &all {
        assert_eq!(snapshot.completed, snapshot.succeeded + snapshot.failed);
        assert_eq!(snapshot.total, 10);
    }
}

#[tokio::test]
async fn abort_on_first_error_skips_remaining_batches() {
    let records: Vec<_> = (0..10)
        .map(|i| {
            make_record(
                &format!("rec-{i}"),
                RecordType::A,
                &format!("h{i}.example.com"),
                "1.2.3.4",
            )
        })
        .collect();
    let mock = MockZoneApi::with_records(records);
    {
        let mut failures = mock.fail_updates.lock().expect("fail_updates lock");
        failures.insert("rec-3".to_string());
        failures.insert("rec-6".to_string());
    }
    let (service, api) = service(mock);

    let options = BulkOptions {
        concurrency: 3,
        continue_on_error: false,
        ..BulkOptions::default()
    };
    let changes = RecordChanges {
        content: Some("9.9.9.9".to_string()),
        ..RecordChanges::default()
    };
    let result = service
        .bulk_update_records("zone-1", None, changes, &options)
        .await
        .expect("bulk update");

    // rec-3 fails in the second batch (items 3..6); that batch still settles,
    // but the batches containing rec-6 and beyond never start
    assert!(!result.success);
    assert_eq!(result.completed, 6);
    assert!(result.completed < result.total);
    assert_eq!(result.failed, 1);
    assert_eq!(result.succeeded, 5);
    assert_eq!(api.update_calls.load(Ordering::SeqCst), 6);
}

// ---- firewall single-shot path ----

#[tokio::test]
async fn firewall_rules_go_out_as_one_request() {
    let (service, api) = service(MockZoneApi::new());

    let rules = vec![
        FirewallRulePayload {
            expression: "ip.src eq 203.0.113.7".to_string(),
            action: "block".to_string(),
            description: Some("bad actor".to_string()),
            paused: false,
            priority: Some(1),
        },
        FirewallRulePayload {
            expression: "http.user_agent contains \"curl\"".to_string(),
            action: "challenge".to_string(),
            description: None,
            paused: false,
            priority: None,
        },
    ];

    let result = service
        .bulk_create_firewall_rules("zone-1", rules, &BulkOptions::default())
        .await
        .expect("firewall create");

    assert!(result.success);
    assert_eq!(result.succeeded, 2);
    assert_eq!(result.items.len(), 2);
    // single request regardless of rule count
    assert_eq!(api.firewall_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn firewall_dry_run_synthesizes_locally() {
    let (service, api) = service(MockZoneApi::new());

    let rules = vec![FirewallRulePayload {
        expression: "ip.src eq 198.51.100.1".to_string(),
        action: "block".to_string(),
        description: None,
        paused: true,
        priority: None,
    }];
    let options = BulkOptions {
        dry_run: true,
        ..BulkOptions::default()
    };
    let result = service
        .bulk_create_firewall_rules("zone-1", rules, &options)
        .await
        .expect("firewall create");

    assert!(result.dry_run && result.success);
    assert_eq!(result.succeeded, 1);
    assert!(result.items[0].id.starts_with("dry-run-"));
    assert!(result.items[0].paused);
    assert_eq!(api.firewall_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn firewall_whole_call_failure_fails_every_item_with_one_error() {
    let mock = MockZoneApi::new();
    mock.fail_firewall.store(true, Ordering::SeqCst);
    let (service, _api) = service(mock);

    let rules: Vec<_> = (0..4)
        .map(|i| FirewallRulePayload {
            expression: format!("ip.src eq 203.0.113.{i}"),
            action: "block".to_string(),
            description: None,
            paused: false,
            priority: None,
        })
        .collect();

    let result = service
        .bulk_create_firewall_rules("zone-1", rules, &BulkOptions::default())
        .await
        .expect("firewall create");

    assert!(!result.success);
    assert_eq!(result.succeeded, 0);
    assert_eq!(result.failed, 4);
    assert_eq!(result.completed, 4);
    assert_eq!(result.errors.len(), 1, "one synthetic error for the whole call");
    assert!(result.items.is_empty());
}

// ---- worker deploys ----

#[tokio::test]
async fn worker_deploy_runs_per_script() {
    let (service, api) = service(MockZoneApi::new());

    let scripts = vec![
        WorkerScriptPayload {
            name: "edge-router".to_string(),
            content: "export default { fetch() {} }".to_string(),
        },
        WorkerScriptPayload {
            name: "redirects".to_string(),
            content: "export default { fetch() {} }".to_string(),
        },
    ];

    let result = service
        .bulk_deploy_workers(scripts, &BulkOptions::default())
        .await
        .expect("worker deploy");

    assert!(result.success);
    assert_eq!(result.succeeded, 2);
    assert_eq!(api.worker_calls.load(Ordering::SeqCst), 2);

    let mut ids: Vec<&str> = result.items.iter().map(|s| s.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["edge-router", "redirects"]);
}

#[tokio::test]
async fn worker_dry_run_uploads_nothing() {
    let (service, api) = service(MockZoneApi::new());

    let scripts = vec![WorkerScriptPayload {
        name: "edge-router".to_string(),
        content: "export default { fetch() {} }".to_string(),
    }];
    let options = BulkOptions {
        dry_run: true,
        ..BulkOptions::default()
    };
    let result = service
        .bulk_deploy_workers(scripts, &options)
        .await
        .expect("worker deploy");

    assert!(result.success && result.dry_run);
    assert_eq!(api.worker_calls.load(Ordering::SeqCst), 0);
}

// ---- export / import through the service ----

#[tokio::test]
async fn bind_export_is_delegated_verbatim() {
    let (service, _api) = service(MockZoneApi::new());

    let exported = service
        .export_records("zone-1", None, ExportFormat::Bind, false)
        .await
        .expect("bind export");

    assert!(exported.starts_with(";; zone file for zone-1"));
}

#[tokio::test]
async fn json_export_respects_filter() {
    let records = vec![
        make_record("rec-1", RecordType::A, "a.example.com", "1.1.1.1"),
        make_record("rec-2", RecordType::Txt, "b.example.com", "v=spf1"),
    ];
    let (service, _api) = service(MockZoneApi::with_records(records));

    let filter = RecordFilter::parse("type=TXT");
    let exported = service
        .export_records("zone-1", Some(&filter), ExportFormat::Json, false)
        .await
        .expect("json export");

    assert!(exported.contains("b.example.com"));
    assert!(!exported.contains("a.example.com"));
}

#[tokio::test]
async fn import_creates_records_from_json() {
    let (service, api) = service(MockZoneApi::new());

    let data = r#"[
        {"type": "a", "name": "one.example.com", "content": "1.1.1.1", "ttl": 300},
        {"type": "cname", "name": "two.example.com", "content": "one.example.com"}
    ]"#;

    let result = service
        .import_records("zone-1", data, ExportFormat::Json, &BulkOptions::default())
        .await
        .expect("import");

    assert!(result.success);
    assert_eq!(result.succeeded, 2);
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 2);
    assert!(result.items.iter().any(|r| r.name == "one.example.com"));
}

#[tokio::test]
async fn import_rejects_malformed_csv() {
    let (service, api) = service(MockZoneApi::new());

    let result = service
        .import_records(
            "zone-1",
            "type,name,content\n",
            ExportFormat::Csv,
            &BulkOptions::default(),
        )
        .await;

    assert!(result.is_err());
    assert_eq!(api.create_calls.load(Ordering::SeqCst), 0);
}
