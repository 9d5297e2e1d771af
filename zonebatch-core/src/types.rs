//! Bulk operation request/result helper types

use serde::{Deserialize, Serialize};
use zonebatch_provider::{DnsRecord, RecordPayload};

/// Field-level changes merged onto existing records in a bulk update.
///
/// Unset fields keep the record's current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordChanges {
    /// New record content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New TTL in seconds (`1` for automatic).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Enable/disable the CDN proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    /// New priority, for MX-like types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// New comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RecordChanges {
    /// True when no field is set (the update would be a no-op).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.ttl.is_none()
            && self.proxied.is_none()
            && self.priority.is_none()
            && self.comment.is_none()
    }

    /// Merge these changes onto an existing record, producing the update
    /// request body.
    #[must_use]
    pub fn apply_to(&self, record: &DnsRecord) -> RecordPayload {
        RecordPayload {
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: self
                .content
                .clone()
                .unwrap_or_else(|| record.content.clone()),
            ttl: self.ttl.unwrap_or(record.ttl),
            proxied: self.proxied.or(record.proxied),
            priority: self.priority.or(record.priority),
            comment: self.comment.clone().or_else(|| record.comment.clone()),
        }
    }

    /// The record as it would look after the update. Used for dry-run
    /// synthesis: the existing record merged with the requested changes.
    #[must_use]
    pub fn merged_record(&self, record: &DnsRecord) -> DnsRecord {
        let mut merged = record.clone();
        if let Some(content) = &self.content {
            merged.content = content.clone();
        }
        if let Some(ttl) = self.ttl {
            merged.ttl = ttl;
        }
        if let Some(proxied) = self.proxied {
            merged.proxied = Some(proxied);
        }
        if let Some(priority) = self.priority {
            merged.priority = Some(priority);
        }
        if let Some(comment) = &self.comment {
            merged.comment = Some(comment.clone());
        }
        merged
    }
}

/// Identifier/name pair produced by a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedRecord {
    /// Record identifier.
    pub id: String,
    /// Full record name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonebatch_provider::RecordType;

    fn record() -> DnsRecord {
        DnsRecord {
            id: "rec-1".to_string(),
            zone_id: "zone-1".to_string(),
            record_type: RecordType::A,
            name: "www.example.com".to_string(),
            content: "1.2.3.4".to_string(),
            ttl: 300,
            proxied: Some(false),
            priority: None,
            comment: Some("old".to_string()),
            tags: Vec::new(),
            created_on: None,
            modified_on: None,
        }
    }

    #[test]
    fn empty_changes_keep_everything() {
        let changes = RecordChanges::default();
        assert!(changes.is_empty());
        let payload = changes.apply_to(&record());
        assert_eq!(payload.content, "1.2.3.4");
        assert_eq!(payload.ttl, 300);
        assert_eq!(payload.proxied, Some(false));
        assert_eq!(payload.comment.as_deref(), Some("old"));
    }

    #[test]
    fn set_fields_override() {
        let changes = RecordChanges {
            content: Some("5.6.7.8".to_string()),
            ttl: Some(1),
            ..RecordChanges::default()
        };
        let payload = changes.apply_to(&record());
        assert_eq!(payload.content, "5.6.7.8");
        assert_eq!(payload.ttl, 1);
        // untouched fields carried over
        assert_eq!(payload.name, "www.example.com");
        assert_eq!(payload.record_type, RecordType::A);
    }

    #[test]
    fn merged_record_reflects_changes() {
        let changes = RecordChanges {
            proxied: Some(true),
            comment: Some("new".to_string()),
            ..RecordChanges::default()
        };
        let merged = changes.merged_record(&record());
        assert_eq!(merged.proxied, Some(true));
        assert_eq!(merged.comment.as_deref(), Some("new"));
        assert_eq!(merged.id, "rec-1");
        assert_eq!(merged.content, "1.2.3.4");
    }
}
