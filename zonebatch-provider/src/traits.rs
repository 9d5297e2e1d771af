use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    DnsRecord, FirewallRule, FirewallRulePayload, RecordPage, RecordPayload, WorkerScript,
    WorkerScriptPayload, Zone,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（Cloudflare 为数字码，这里统一存字符串）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// Zone（用于 `ZoneNotFound` 等错误）
    pub zone: Option<String>,
}

/// API 错误映射 Trait（内部使用）
/// 将原始 API 错误映射到统一错误类型
pub(crate) trait ApiErrorMapper {
    /// 返回客户端标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// The zone-level API surface the bulk engine drives.
///
/// [`CloudflareApi`](crate::CloudflareApi) is the production implementation;
/// tests drive the engine with in-memory implementations of this trait.
///
/// Paging is 1-indexed. A listing endpoint signals completion through the
/// [`RecordPage`] metadata (`current_page >= total_pages`).
#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Client identifier (used in error messages and logs).
    fn id(&self) -> &'static str;

    /// Verify that the configured token is valid and active.
    async fn verify_token(&self) -> Result<bool>;

    /// List zones visible to the token (one page).
    async fn list_zones(&self, page: u32, page_size: u32) -> Result<Vec<Zone>>;

    /// Fetch a single zone by id.
    async fn get_zone(&self, zone_id: &str) -> Result<Zone>;

    /// List DNS records in a zone (one page, with pagination metadata).
    async fn list_records(&self, zone_id: &str, page: u32, page_size: u32) -> Result<RecordPage>;

    /// Create a DNS record.
    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<DnsRecord>;

    /// Update an existing DNS record.
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord>;

    /// Delete a DNS record.
    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// Create multiple firewall rules in a single request.
    ///
    /// The endpoint natively accepts an array; there is no per-rule batching
    /// on the client side.
    async fn create_firewall_rules(
        &self,
        zone_id: &str,
        rules: &[FirewallRulePayload],
    ) -> Result<Vec<FirewallRule>>;

    /// Upload (deploy) a worker script under the configured account.
    async fn upload_worker(&self, script: &WorkerScriptPayload) -> Result<WorkerScript>;

    /// Export the zone as a BIND zone file (verbatim passthrough).
    async fn export_zone_file(&self, zone_id: &str) -> Result<String>;
}
