//! Worker script subcommands

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::fs;
use zonebatch_core::{BulkOptions, BulkService};
use zonebatch_provider::WorkerScriptPayload;

use crate::output;

/// One entry of a deploy manifest.
#[derive(Debug, Deserialize)]
struct ManifestEntry {
    name: String,
    file: String,
}

/// Deploy one script (`--name` + `--file`) or a manifest of scripts.
pub async fn deploy(
    service: &BulkService,
    name: Option<&str>,
    file: Option<&Path>,
    manifest: Option<&Path>,
    options: &BulkOptions,
) -> Result<()> {
    let scripts = match (name, file, manifest) {
        (Some(name), Some(file), None) => {
            let content = fs::read_to_string(file)
                .await
                .with_context(|| format!("cannot read {}", file.display()))?;
            vec![WorkerScriptPayload {
                name: name.to_string(),
                content,
            }]
        }
        (None, None, Some(manifest_path)) => {
            let data = fs::read_to_string(manifest_path)
                .await
                .with_context(|| format!("cannot read {}", manifest_path.display()))?;
            let entries: Vec<ManifestEntry> = serde_json::from_str(&data)
                .with_context(|| format!("malformed manifest {}", manifest_path.display()))?;

            // script paths are relative to the manifest
            let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
            let mut scripts = Vec::with_capacity(entries.len());
            for entry in entries {
                let path = base.join(&entry.file);
                let content = fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("cannot read {}", path.display()))?;
                scripts.push(WorkerScriptPayload {
                    name: entry.name,
                    content,
                });
            }
            scripts
        }
        _ => bail!("pass either --name with --file, or --manifest"),
    };

    let result = service.bulk_deploy_workers(scripts, options).await?;
    output::print_bulk_summary("worker deploy", &result);
    Ok(())
}
