//! Cloudflare `ZoneApi` trait 实现

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::traits::{ApiErrorMapper, ErrorContext, ZoneApi};
use crate::types::{
    DnsRecord, FirewallRule, FirewallRulePayload, RecordPage, RecordPayload, WorkerScript,
    WorkerScriptPayload, Zone,
};

use super::types::{CfFilterBody, CfFirewallRuleBody, CfRecordBody, CfWorkerScript};
use super::{
    CfDnsRecord, CfFirewallRule, CloudflareApi, CfZone, MAX_PAGE_SIZE_RECORDS,
    MAX_PAGE_SIZE_ZONES,
};

impl CloudflareApi {
    fn zone_context(zone_id: &str) -> ErrorContext {
        ErrorContext {
            zone: Some(zone_id.to_string()),
            ..ErrorContext::default()
        }
    }
}

#[async_trait]
impl ZoneApi for CloudflareApi {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn verify_token(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct VerifyResponse {
            status: String,
        }

        match self
            .get::<VerifyResponse>("/user/tokens/verify", ErrorContext::default())
            .await
        {
            Ok(resp) => Ok(resp.status == "active"),
            Err(_) => Ok(false),
        }
    }

    async fn list_zones(&self, page: u32, page_size: u32) -> Result<Vec<Zone>> {
        // Cloudflare zones API 最大 per_page 是 50
        let path = format!(
            "/zones?page={}&per_page={}",
            page.max(1),
            page_size.clamp(1, MAX_PAGE_SIZE_ZONES)
        );
        let (zones, _info): (Vec<CfZone>, _) =
            self.get_with_info(&path, ErrorContext::default()).await?;
        Ok(zones
            .into_iter()
            .map(|z| Zone {
                id: z.id,
                name: z.name,
                status: z.status,
            })
            .collect())
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Zone> {
        let zone: CfZone = self
            .get(&format!("/zones/{zone_id}"), Self::zone_context(zone_id))
            .await?;
        Ok(Zone {
            id: zone.id,
            name: zone.name,
            status: zone.status,
        })
    }

    async fn list_records(&self, zone_id: &str, page: u32, page_size: u32) -> Result<RecordPage> {
        let path = format!(
            "/zones/{}/dns_records?page={}&per_page={}",
            zone_id,
            page.max(1),
            page_size.clamp(1, MAX_PAGE_SIZE_RECORDS)
        );
        let (cf_records, info): (Vec<CfDnsRecord>, _) =
            self.get_with_info(&path, Self::zone_context(zone_id)).await?;

        // 无分页元数据时按"最后一页"处理，让调用方的翻页循环终止
        let (current_page, total_pages) = match info {
            Some(i) => {
                let total = i.total_pages.unwrap_or(i.page);
                (i.page, total)
            }
            None => (page, page),
        };

        Ok(RecordPage {
            records: cf_records
                .into_iter()
                .map(|r| r.into_record(zone_id))
                .collect(),
            current_page,
            total_pages,
        })
    }

    async fn create_record(&self, zone_id: &str, payload: &RecordPayload) -> Result<DnsRecord> {
        let body = CfRecordBody::from(payload);
        let context = ErrorContext {
            record_name: Some(payload.name.clone()),
            zone: Some(zone_id.to_string()),
            ..ErrorContext::default()
        };

        let cf_record: CfDnsRecord = self
            .post(&format!("/zones/{zone_id}/dns_records"), &body, context)
            .await?;

        Ok(cf_record.into_record(zone_id))
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord> {
        let body = CfRecordBody::from(payload);
        let context = ErrorContext {
            record_name: Some(payload.name.clone()),
            record_id: Some(record_id.to_string()),
            zone: Some(zone_id.to_string()),
        };

        let cf_record: CfDnsRecord = self
            .patch(
                &format!("/zones/{zone_id}/dns_records/{record_id}"),
                &body,
                context,
            )
            .await?;

        Ok(cf_record.into_record(zone_id))
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let context = ErrorContext {
            record_id: Some(record_id.to_string()),
            zone: Some(zone_id.to_string()),
            ..ErrorContext::default()
        };
        self.delete(
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            context,
        )
        .await
    }

    async fn create_firewall_rules(
        &self,
        zone_id: &str,
        rules: &[FirewallRulePayload],
    ) -> Result<Vec<FirewallRule>> {
        // 该端点原生接受规则数组，一次请求创建全部规则
        let body: Vec<CfFirewallRuleBody> = rules
            .iter()
            .map(|rule| CfFirewallRuleBody {
                action: rule.action.clone(),
                filter: CfFilterBody {
                    expression: rule.expression.clone(),
                },
                description: rule.description.clone(),
                paused: rule.paused,
                priority: rule.priority,
            })
            .collect();

        let created: Vec<CfFirewallRule> = self
            .post(
                &format!("/zones/{zone_id}/firewall/rules"),
                &body,
                Self::zone_context(zone_id),
            )
            .await?;

        Ok(created.into_iter().map(FirewallRule::from).collect())
    }

    async fn upload_worker(&self, script: &WorkerScriptPayload) -> Result<WorkerScript> {
        let account_id =
            self.account_id
                .as_deref()
                .ok_or_else(|| ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "account_id".to_string(),
                    detail: "worker deploys require an account id".to_string(),
                })?;

        let path = format!(
            "/accounts/{}/workers/scripts/{}",
            account_id,
            urlencoding::encode(&script.name)
        );
        let uploaded: CfWorkerScript = self
            .put_script(&path, script.content.clone(), ErrorContext::default())
            .await?;

        Ok(WorkerScript {
            id: uploaded.id,
            modified_on: uploaded.modified_on,
        })
    }

    async fn export_zone_file(&self, zone_id: &str) -> Result<String> {
        // 导出端点返回纯文本 zone file，没有 JSON envelope
        self.get_text(&format!("/zones/{zone_id}/dns_records/export"))
            .await
    }
}
