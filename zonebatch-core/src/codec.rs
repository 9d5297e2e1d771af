//! Import/export codec for DNS record collections
//!
//! JSON and CSV are handled here; BIND export is delegated to the zone API's
//! native export endpoint and never reimplemented (see
//! [`BulkService::export_records`](crate::BulkService::export_records)).
//!
//! The CSV writer/parser is hand-rolled on purpose: its quoting behavior
//! (RFC 4180-style doubling, mid-field quotes toggling quoted mode) is part
//! of the format contract and round-trips with the writer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use zonebatch_provider::{DnsRecord, RecordPayload, RecordType};

use crate::error::{CoreError, CoreResult};

/// Supported import/export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array.
    Json,
    /// RFC 4180-style CSV with a header row.
    Csv,
    /// BIND zone file (export only; generated by the API, passed through
    /// verbatim).
    Bind,
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "bind" => Ok(Self::Bind),
            other => Err(CoreError::ValidationError(format!(
                "unknown format '{other}' (expected json, csv or bind)"
            ))),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Csv => f.write_str("csv"),
            Self::Bind => f.write_str("bind"),
        }
    }
}

/// A record parsed from an import file.
///
/// Field types mirror the coercions the importer applies: `type` is
/// upper-cased, `ttl`/`priority` become numbers when present, `proxied`
/// becomes a boolean, everything else stays a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Upper-cased record type string.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Full record name.
    pub name: String,
    /// Record content.
    pub content: String,
    /// TTL in seconds, when present and parseable.
    pub ttl: Option<u32>,
    /// Proxied flag, when the field was present.
    pub proxied: Option<bool>,
    /// Priority, when present and parseable.
    pub priority: Option<u16>,
    /// Comment. CSV imports yield `Some("")` for an empty cell — unset
    /// optionals come back as empty strings, not as absent fields.
    pub comment: Option<String>,
}

impl ImportRecord {
    /// Convert into a creation payload (automatic TTL when unset; empty
    /// comments dropped).
    #[must_use]
    pub fn into_payload(self) -> RecordPayload {
        RecordPayload {
            record_type: RecordType::parse(&self.record_type),
            name: self.name,
            content: self.content,
            ttl: self.ttl.unwrap_or(1),
            proxied: self.proxied,
            priority: self.priority,
            comment: self.comment.filter(|c| !c.is_empty()),
        }
    }
}

/// Serialized shape of one exported record. Field order is the wire contract:
/// `id` (only with ids), then `type,name,content,ttl,proxied,priority,comment`.
#[derive(Serialize)]
struct ExportRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

/// Serialize records to the requested format.
///
/// BIND is not produced locally — asking for it here is an error; callers go
/// through the service, which delegates BIND to the API.
pub fn export_records(
    records: &[DnsRecord],
    format: ExportFormat,
    include_ids: bool,
) -> CoreResult<String> {
    match format {
        ExportFormat::Json => export_json(records, include_ids),
        ExportFormat::Csv => Ok(export_csv(records, include_ids)),
        ExportFormat::Bind => Err(CoreError::ExportError(
            "BIND output is generated by the zone API, not the codec".to_string(),
        )),
    }
}

fn export_json(records: &[DnsRecord], include_ids: bool) -> CoreResult<String> {
    let shaped: Vec<ExportRecord<'_>> = records
        .iter()
        .map(|r| ExportRecord {
            id: include_ids.then_some(r.id.as_str()),
            record_type: r.record_type.as_str(),
            name: &r.name,
            content: &r.content,
            ttl: r.ttl,
            proxied: r.proxied,
            priority: r.priority,
            comment: r.comment.as_deref(),
        })
        .collect();

    serde_json::to_string_pretty(&shaped).map_err(|e| CoreError::SerializationError(e.to_string()))
}

fn export_csv(records: &[DnsRecord], include_ids: bool) -> String {
    let mut header = vec!["type", "name", "content", "ttl", "proxied", "priority", "comment"];
    if include_ids {
        header.insert(0, "id");
    }

    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');

    for record in records {
        let mut fields: Vec<String> = Vec::with_capacity(header.len());
        if include_ids {
            fields.push(record.id.clone());
        }
        fields.push(record.record_type.to_string());
        fields.push(record.name.clone());
        fields.push(record.content.clone());
        fields.push(record.ttl.to_string());
        fields.push(record.proxied.map(|p| p.to_string()).unwrap_or_default());
        fields.push(record.priority.map(|p| p.to_string()).unwrap_or_default());
        fields.push(record.comment.clone().unwrap_or_default());

        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// RFC 4180 quoting: wrap in double quotes and double any embedded quote
/// whenever the field contains a comma, a quote, or a newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse records from JSON or CSV.
pub fn import_records(data: &str, format: ExportFormat) -> CoreResult<Vec<ImportRecord>> {
    match format {
        ExportFormat::Json => import_json(data),
        ExportFormat::Csv => import_csv(data),
        ExportFormat::Bind => Err(CoreError::ImportError(
            "BIND import is not supported".to_string(),
        )),
    }
}

fn import_json(data: &str) -> CoreResult<Vec<ImportRecord>> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| CoreError::ImportError(format!("invalid JSON: {e}")))?;

    // a single object and an array of objects are both accepted
    let objects = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    objects.iter().map(coerce_json_record).collect()
}

fn coerce_json_record(value: &Value) -> CoreResult<ImportRecord> {
    let Some(obj) = value.as_object() else {
        return Err(CoreError::ImportError(
            "expected a JSON object per record".to_string(),
        ));
    };

    Ok(ImportRecord {
        record_type: json_string(obj.get("type")).to_uppercase(),
        name: json_string(obj.get("name")),
        content: json_string(obj.get("content")),
        ttl: obj.get("ttl").and_then(json_number),
        proxied: obj.get("proxied").map(json_bool),
        priority: obj.get("priority").and_then(json_number),
        comment: obj.get("comment").map(|v| json_string(Some(v))),
    })
}

/// Everything that isn't a string is coerced to one.
fn json_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Numbers and numeric strings both count as "present as a number".
fn json_number<T: TryFrom<u64> + FromStr>(value: &Value) -> Option<T> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| T::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `true` literal or the string `"true"` (case-insensitive); anything else is
/// false.
fn json_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn import_csv(data: &str) -> CoreResult<Vec<ImportRecord>> {
    let lines: Vec<&str> = data.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(CoreError::ImportError(
            "CSV must contain a header row and at least one record".to_string(),
        ));
    }

    let headers: Vec<String> = parse_csv_line(lines[0])
        .into_iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut records = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let fields = parse_csv_line(line);

        records.push(ImportRecord {
            record_type: column(&headers, &fields, "type")
                .unwrap_or("")
                .to_uppercase(),
            name: column(&headers, &fields, "name").unwrap_or("").to_string(),
            content: column(&headers, &fields, "content")
                .unwrap_or("")
                .to_string(),
            ttl: column(&headers, &fields, "ttl").and_then(parse_cell_number),
            proxied: column(&headers, &fields, "proxied").map(|v| v.eq_ignore_ascii_case("true")),
            priority: column(&headers, &fields, "priority").and_then(parse_cell_number),
            comment: column(&headers, &fields, "comment").map(str::to_string),
        });
    }

    Ok(records)
}

/// Look a row cell up by (lower-cased) header name. A missing column is
/// `None`, which keeps the corresponding field unset.
fn column<'a>(headers: &[String], fields: &'a [String], key: &str) -> Option<&'a str> {
    headers
        .iter()
        .position(|h| h == key)
        .and_then(|i| fields.get(i))
        .map(String::as_str)
}

fn parse_cell_number<T: FromStr>(cell: &str) -> Option<T> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse().ok()
    }
}

/// Hand-rolled CSV line parser.
///
/// Inside quotes, `""` is a literal embedded quote and a lone quote closes
/// the quoted run; outside quotes, a quote (re)opens quoted mode mid-field
/// and commas split fields.
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    fields
}
