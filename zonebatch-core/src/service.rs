//! Bulk operation service
//!
//! Wires the filter parser, paginated fetcher, batch runner and codec over a
//! [`ZoneApi`] implementation. Every method consumes its inputs within a
//! single invocation; nothing is persisted.

use std::sync::Arc;

use zonebatch_provider::{
    DnsRecord, FirewallRule, FirewallRulePayload, RecordPayload, WorkerScript,
    WorkerScriptPayload, ZoneApi,
};

use crate::bulk::{run_batched, BulkError, BulkOptions, BulkProgress, BulkResult};
use crate::codec::{self, ExportFormat, ImportRecord};
use crate::error::CoreResult;
use crate::fetch::fetch_all_records;
use crate::filter::RecordFilter;
use crate::types::{DeletedRecord, RecordChanges};

/// Bulk DNS/firewall/worker operations over a zone API.
pub struct BulkService {
    api: Arc<dyn ZoneApi>,
}

impl BulkService {
    /// Create a service instance over the given API client.
    #[must_use]
    pub fn new(api: Arc<dyn ZoneApi>) -> Self {
        Self { api }
    }

    /// List every record in the zone that matches the filter, without
    /// changing anything.
    pub async fn preview_records(
        &self,
        zone_id: &str,
        filter: Option<&RecordFilter>,
    ) -> CoreResult<Vec<DnsRecord>> {
        fetch_all_records(self.api.as_ref(), zone_id, filter).await
    }

    /// Create records in batches.
    pub async fn bulk_create_records(
        &self,
        zone_id: &str,
        payloads: Vec<RecordPayload>,
        options: &BulkOptions,
    ) -> CoreResult<BulkResult<DnsRecord>> {
        log::debug!(
            "bulk create: {} records in zone {zone_id} (dry_run={})",
            payloads.len(),
            options.dry_run
        );

        let api = Arc::clone(&self.api);
        let zone = zone_id.to_string();
        let dry_run = options.dry_run;

        let result = run_batched(
            payloads,
            options,
            |payload| format!("{} {}", payload.record_type, payload.name),
            move |payload| {
                let api = Arc::clone(&api);
                let zone = zone.clone();
                async move {
                    if dry_run {
                        Ok(synthesize_created_record(&zone, &payload))
                    } else {
                        api.create_record(&zone, &payload)
                            .await
                            .map_err(|e| e.to_string())
                    }
                }
            },
        )
        .await;

        Ok(result)
    }

    /// Update every record matching the filter, merging `changes` onto each.
    pub async fn bulk_update_records(
        &self,
        zone_id: &str,
        filter: Option<&RecordFilter>,
        changes: RecordChanges,
        options: &BulkOptions,
    ) -> CoreResult<BulkResult<DnsRecord>> {
        let targets = fetch_all_records(self.api.as_ref(), zone_id, filter).await?;
        log::debug!(
            "bulk update: {} matching records in zone {zone_id} (dry_run={})",
            targets.len(),
            options.dry_run
        );

        let api = Arc::clone(&self.api);
        let zone = zone_id.to_string();
        let dry_run = options.dry_run;

        let result = run_batched(
            targets,
            options,
            |record| format!("{} {}", record.record_type, record.name),
            move |record| {
                let api = Arc::clone(&api);
                let zone = zone.clone();
                let changes = changes.clone();
                async move {
                    if dry_run {
                        // passthrough of the input merged with the requested changes
                        Ok(changes.merged_record(&record))
                    } else {
                        let payload = changes.apply_to(&record);
                        api.update_record(&zone, &record.id, &payload)
                            .await
                            .map_err(|e| e.to_string())
                    }
                }
            },
        )
        .await;

        Ok(result)
    }

    /// Delete every record matching the filter.
    pub async fn bulk_delete_records(
        &self,
        zone_id: &str,
        filter: Option<&RecordFilter>,
        options: &BulkOptions,
    ) -> CoreResult<BulkResult<DeletedRecord>> {
        let targets = fetch_all_records(self.api.as_ref(), zone_id, filter).await?;
        log::debug!(
            "bulk delete: {} matching records in zone {zone_id} (dry_run={})",
            targets.len(),
            options.dry_run
        );

        let api = Arc::clone(&self.api);
        let zone = zone_id.to_string();
        let dry_run = options.dry_run;

        let result = run_batched(
            targets,
            options,
            |record| format!("{} {}", record.record_type, record.name),
            move |record| {
                let api = Arc::clone(&api);
                let zone = zone.clone();
                async move {
                    let deleted = DeletedRecord {
                        id: record.id.clone(),
                        name: record.name.clone(),
                    };
                    if dry_run {
                        Ok(deleted)
                    } else {
                        api.delete_record(&zone, &record.id)
                            .await
                            .map(|()| deleted)
                            .map_err(|e| e.to_string())
                    }
                }
            },
        )
        .await;

        Ok(result)
    }

    /// Create firewall rules.
    ///
    /// Unlike the per-item batching of the record verbs, the whole rule list
    /// goes to the API in a single request — the endpoint natively accepts
    /// multiple rules. A failure of that one call fails every item, recorded
    /// as a single synthetic error.
    pub async fn bulk_create_firewall_rules(
        &self,
        zone_id: &str,
        rules: Vec<FirewallRulePayload>,
        options: &BulkOptions,
    ) -> CoreResult<BulkResult<FirewallRule>> {
        let total = rules.len();
        let mut progress = BulkProgress::new(total);

        if options.dry_run {
            let mut items = Vec::with_capacity(total);
            for rule in &rules {
                let synthesized = synthesize_firewall_rule(rule);
                settle(&mut progress, options, describe_rule(rule));
                items.push(synthesized);
            }
            return Ok(finish(progress, options.dry_run, items));
        }

        match self.api.create_firewall_rules(zone_id, &rules).await {
            Ok(created) => {
                for rule in &rules {
                    settle(&mut progress, options, describe_rule(rule));
                }
                Ok(finish(progress, false, created))
            }
            Err(e) => {
                log::warn!("firewall rule batch creation failed: {e}");
                // one synthetic error entry describes the whole-call failure;
                // every item still counts as failed
                progress.errors.push(BulkError {
                    item: format!("firewall rules ({total} rules)"),
                    error: e.to_string(),
                });
                for rule in &rules {
                    progress.completed += 1;
                    progress.failed += 1;
                    progress.current = Some(describe_rule(rule));
                    if let Some(callback) = &options.progress {
                        callback(&progress);
                    }
                }
                Ok(finish(progress, false, Vec::new()))
            }
        }
    }

    /// Deploy worker scripts in batches.
    pub async fn bulk_deploy_workers(
        &self,
        scripts: Vec<WorkerScriptPayload>,
        options: &BulkOptions,
    ) -> CoreResult<BulkResult<WorkerScript>> {
        log::debug!(
            "bulk deploy: {} worker scripts (dry_run={})",
            scripts.len(),
            options.dry_run
        );

        let api = Arc::clone(&self.api);
        let dry_run = options.dry_run;

        let result = run_batched(
            scripts,
            options,
            |script| script.name.clone(),
            move |script| {
                let api = Arc::clone(&api);
                async move {
                    if dry_run {
                        Ok(WorkerScript {
                            id: script.name.clone(),
                            modified_on: Some(chrono::Utc::now().to_rfc3339()),
                        })
                    } else {
                        api.upload_worker(&script).await.map_err(|e| e.to_string())
                    }
                }
            },
        )
        .await;

        Ok(result)
    }

    /// Export matching records in the requested format.
    ///
    /// BIND output is generated by the API and passed through verbatim — it
    /// always covers the whole zone, and `include_ids` does not apply.
    pub async fn export_records(
        &self,
        zone_id: &str,
        filter: Option<&RecordFilter>,
        format: ExportFormat,
        include_ids: bool,
    ) -> CoreResult<String> {
        if format == ExportFormat::Bind {
            return Ok(self.api.export_zone_file(zone_id).await?);
        }

        let records = fetch_all_records(self.api.as_ref(), zone_id, filter).await?;
        codec::export_records(&records, format, include_ids)
    }

    /// Parse an import file and create its records in batches.
    pub async fn import_records(
        &self,
        zone_id: &str,
        data: &str,
        format: ExportFormat,
        options: &BulkOptions,
    ) -> CoreResult<BulkResult<DnsRecord>> {
        let imported = codec::import_records(data, format)?;
        let payloads: Vec<RecordPayload> =
            imported.into_iter().map(ImportRecord::into_payload).collect();
        self.bulk_create_records(zone_id, payloads, options).await
    }
}

fn describe_rule(rule: &FirewallRulePayload) -> String {
    format!(
        "{} {}",
        rule.action,
        rule.description.as_deref().unwrap_or(&rule.expression)
    )
}

/// Record one successful settlement on a single-shot run and fire the callback.
fn settle(progress: &mut BulkProgress, options: &BulkOptions, label: String) {
    progress.completed += 1;
    progress.succeeded += 1;
    progress.current = Some(label);
    if let Some(callback) = &options.progress {
        callback(progress);
    }
}

fn finish<T>(progress: BulkProgress, dry_run: bool, items: Vec<T>) -> BulkResult<T> {
    BulkResult {
        success: progress.failed == 0,
        dry_run,
        total: progress.total,
        completed: progress.completed,
        succeeded: progress.succeeded,
        failed: progress.failed,
        items,
        errors: progress.errors,
    }
}

/// Fabricate a created record for dry runs: the input echoed back with a
/// placeholder identifier and the current timestamp.
fn synthesize_created_record(zone_id: &str, payload: &RecordPayload) -> DnsRecord {
    let now = chrono::Utc::now().to_rfc3339();
    DnsRecord {
        id: format!("dry-run-{}", uuid::Uuid::new_v4()),
        zone_id: zone_id.to_string(),
        record_type: payload.record_type.clone(),
        name: payload.name.clone(),
        content: payload.content.clone(),
        ttl: payload.ttl,
        proxied: payload.proxied,
        priority: payload.priority,
        comment: payload.comment.clone(),
        tags: Vec::new(),
        created_on: Some(now.clone()),
        modified_on: Some(now),
    }
}

fn synthesize_firewall_rule(rule: &FirewallRulePayload) -> FirewallRule {
    FirewallRule {
        id: format!("dry-run-{}", uuid::Uuid::new_v4()),
        expression: rule.expression.clone(),
        action: rule.action.clone(),
        description: rule.description.clone(),
        paused: rule.paused,
        priority: rule.priority,
    }
}
