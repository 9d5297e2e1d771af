//! Firewall rule subcommands

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use zonebatch_core::{BulkOptions, BulkService};
use zonebatch_provider::FirewallRulePayload;

use crate::output;

/// Create firewall rules from a JSON file. The whole list goes to the API in
/// one request — only `--dry-run` changes what happens per rule.
pub async fn import(
    service: &BulkService,
    zone: &str,
    file: &Path,
    options: &BulkOptions,
) -> Result<()> {
    let data = fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;
    let rules: Vec<FirewallRulePayload> = serde_json::from_str(&data)
        .with_context(|| format!("malformed rule file {}", file.display()))?;

    let result = service
        .bulk_create_firewall_rules(zone, rules, options)
        .await?;
    output::print_bulk_summary("firewall import", &result);
    Ok(())
}
