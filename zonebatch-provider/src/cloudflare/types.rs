//! Cloudflare API 类型定义

use serde::{Deserialize, Serialize};

use crate::types::{DnsRecord, FirewallRule, RecordPayload, RecordType};

/// Cloudflare API 通用响应
#[derive(Debug, Deserialize)]
pub struct CfResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<CfError>>,
    pub result_info: Option<CfResultInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CfError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CfResultInfo {
    pub page: u32,
    #[allow(dead_code)]
    pub per_page: u32,
    #[allow(dead_code)]
    pub total_count: u32,
    /// 部分端点（dns_records）才返回
    pub total_pages: Option<u32>,
}

/// Cloudflare Zone 结构
#[derive(Debug, Deserialize)]
pub struct CfZone {
    pub id: String,
    pub name: String,
    pub status: String,
}

/// Cloudflare DNS Record 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CfDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: Option<bool>,
    pub priority: Option<u16>,
    pub comment: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_on: Option<String>,
    pub modified_on: Option<String>,
}

impl CfDnsRecord {
    /// 转换为统一的 `DnsRecord`
    pub fn into_record(self, zone_id: &str) -> DnsRecord {
        DnsRecord {
            id: self.id,
            zone_id: zone_id.to_string(),
            record_type: RecordType::parse(&self.record_type),
            name: self.name,
            content: self.content,
            ttl: self.ttl,
            proxied: self.proxied,
            priority: self.priority,
            comment: self.comment,
            tags: self.tags,
            created_on: self.created_on,
            modified_on: self.modified_on,
        }
    }
}

/// DNS record 创建/更新请求体
#[derive(Debug, Serialize)]
pub struct CfRecordBody {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<&RecordPayload> for CfRecordBody {
    fn from(payload: &RecordPayload) -> Self {
        Self {
            record_type: payload.record_type.as_str().to_string(),
            name: payload.name.clone(),
            content: payload.content.clone(),
            ttl: payload.ttl,
            proxied: payload.proxied,
            priority: payload.priority,
            comment: payload.comment.clone(),
        }
    }
}

/// Firewall rule 创建请求体（单条）
#[derive(Debug, Serialize)]
pub struct CfFirewallRuleBody {
    pub action: String,
    pub filter: CfFilterBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub paused: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CfFilterBody {
    pub expression: String,
}

/// Firewall rule 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CfFirewallRule {
    pub id: String,
    pub action: String,
    pub description: Option<String>,
    #[serde(default)]
    pub paused: bool,
    pub priority: Option<u32>,
    pub filter: CfFilter,
}

#[derive(Debug, Deserialize)]
pub struct CfFilter {
    #[allow(dead_code)]
    pub id: Option<String>,
    #[serde(default)]
    pub expression: String,
}

impl From<CfFirewallRule> for FirewallRule {
    fn from(rule: CfFirewallRule) -> Self {
        Self {
            id: rule.id,
            expression: rule.filter.expression,
            action: rule.action,
            description: rule.description,
            paused: rule.paused,
            priority: rule.priority,
        }
    }
}

/// Worker script 结构（响应）
#[derive(Debug, Deserialize)]
pub struct CfWorkerScript {
    pub id: String,
    pub modified_on: Option<String>,
}
