//! Cloudflare API 客户端

mod api;
mod error;
mod http;
mod types;

use std::time::Duration;

use reqwest::Client;

pub(crate) use types::{CfDnsRecord, CfFirewallRule, CfResponse, CfResultInfo, CfZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare Zones API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;
/// Cloudflare DNS Records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cloudflare API client.
///
/// Cheap to clone is not a goal here — hold it in an `Arc` (the bulk engine
/// takes `Arc<dyn ZoneApi>`).
pub struct CloudflareApi {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    /// Account id, required only for worker script deploys.
    pub(crate) account_id: Option<String>,
}

impl CloudflareApi {
    /// Create a client authenticated with a static bearer token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: create_http_client(),
            api_token: api_token.into(),
            account_id: None,
        }
    }

    /// Attach the account id used by account-scoped endpoints (worker deploys).
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }
}

/// 创建带超时配置的 HTTP Client
fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}
