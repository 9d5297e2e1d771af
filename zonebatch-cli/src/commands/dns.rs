//! DNS record subcommands: preview, export, import, update, delete

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tokio::fs;
use zonebatch_core::{BulkOptions, BulkService, ExportFormat, RecordChanges, RecordFilter};

use crate::output;

fn display_ttl(ttl: u32) -> String {
    if ttl == 1 {
        "auto".to_string()
    } else {
        ttl.to_string()
    }
}

pub async fn preview(service: &BulkService, zone: &str, filter: Option<&str>) -> Result<()> {
    let filter = filter.map(RecordFilter::parse);
    let records = service.preview_records(zone, filter.as_ref()).await?;

    for record in &records {
        let proxied = match record.proxied {
            Some(true) => " proxied",
            _ => "",
        };
        println!(
            "{:<6} {:<42} {:<32} ttl={}{}",
            record.record_type.to_string(),
            record.name,
            record.content,
            display_ttl(record.ttl),
            proxied
        );
    }
    println!("{} record(s) matched", records.len());
    Ok(())
}

pub async fn export(
    service: &BulkService,
    zone: &str,
    filter: Option<&str>,
    format: &str,
    include_ids: bool,
    output_path: Option<&Path>,
) -> Result<()> {
    let format = ExportFormat::from_str(format)?;
    let filter = filter.map(RecordFilter::parse);

    let data = service
        .export_records(zone, filter.as_ref(), format, include_ids)
        .await?;

    match output_path {
        Some(path) => {
            fs::write(path, &data)
                .await
                .with_context(|| format!("cannot write {}", path.display()))?;
            println!("{} exported to {}", "✓".green(), path.display());
        }
        None => print!("{data}"),
    }
    Ok(())
}

pub async fn import(
    service: &BulkService,
    zone: &str,
    file: &Path,
    format: &str,
    options: &BulkOptions,
) -> Result<()> {
    let format = ExportFormat::from_str(format)?;
    let data = fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;

    let result = service.import_records(zone, &data, format, options).await?;
    output::print_bulk_summary("import", &result);
    Ok(())
}

pub async fn update(
    service: &BulkService,
    zone: &str,
    filter: &str,
    changes: RecordChanges,
    options: &BulkOptions,
) -> Result<()> {
    if changes.is_empty() {
        bail!("nothing to change: pass at least one of --content, --ttl, --proxied, --priority, --comment");
    }

    let filter = RecordFilter::parse(filter);
    let result = service
        .bulk_update_records(zone, Some(&filter), changes, options)
        .await?;
    output::print_bulk_summary("update", &result);
    Ok(())
}

pub async fn delete(
    service: &BulkService,
    zone: &str,
    filter: &str,
    options: &BulkOptions,
) -> Result<()> {
    let filter = RecordFilter::parse(filter);
    if filter.is_empty() {
        // an empty filter matches the whole zone; require that to be explicit
        bail!("refusing to delete with an empty filter; pass e.g. --filter 'name=*' to target everything");
    }

    let result = service
        .bulk_delete_records(zone, Some(&filter), options)
        .await?;
    output::print_bulk_summary("delete", &result);
    Ok(())
}
