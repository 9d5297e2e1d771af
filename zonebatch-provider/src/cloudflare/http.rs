//! Cloudflare HTTP 请求方法

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ProviderError, Result};
use crate::traits::{ApiErrorMapper, ErrorContext, RawApiError};

use super::{CfResponse, CfResultInfo, CloudflareApi, CF_API_BASE};

impl CloudflareApi {
    /// 发送请求并读取响应文本
    ///
    /// 统一处理：超时/网络错误、HTTP 429、HTTP 5xx、日志
    async fn execute(&self, request: RequestBuilder, method: &str, path: &str) -> Result<String> {
        log::debug!("[cloudflare] {method} {path}");

        let response = request
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        provider: self.provider_name().to_string(),
                        detail: e.to_string(),
                    }
                } else {
                    ProviderError::NetworkError {
                        provider: self.provider_name().to_string(),
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        log::debug!("[cloudflare] Response Status: {status}");

        // Retry-After 需要在消费 body 之前读取
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[cloudflare] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[cloudflare] Server error (HTTP {status})");
            return Err(ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let response_text = response.text().await.map_err(|e| ProviderError::NetworkError {
            provider: self.provider_name().to_string(),
            detail: format!("读取响应失败: {e}"),
        })?;

        log::debug!("[cloudflare] Response Body: {response_text}");

        Ok(response_text)
    }

    /// 解析响应 envelope，失败响应按错误码映射为结构化错误
    fn parse_envelope<T: DeserializeOwned>(
        &self,
        response_text: &str,
        context: ErrorContext,
    ) -> Result<CfResponse<T>> {
        let cf_response: CfResponse<T> = serde_json::from_str(response_text).map_err(|e| {
            log::error!("[cloudflare] JSON 解析失败: {e}");
            log::error!("[cloudflare] 原始响应: {response_text}");
            self.parse_error(e)
        })?;

        if !cf_response.success {
            let raw = match cf_response.errors.as_ref().and_then(|errors| errors.first()) {
                Some(e) => RawApiError::with_code(e.code.to_string(), e.message.clone()),
                None => RawApiError::new("Unknown error"),
            };
            log::error!("[cloudflare] API 错误: {}", raw.message);
            return Err(self.map_error(raw, context));
        }

        Ok(cf_response)
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let request = self.client.get(format!("{CF_API_BASE}{path}"));
        let text = self.execute(request, "GET", path).await?;
        let cf_response = self.parse_envelope::<T>(&text, context)?;
        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 GET 请求（返回 result 与分页元数据）
    pub(crate) async fn get_with_info<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<(T, Option<CfResultInfo>)> {
        let request = self.client.get(format!("{CF_API_BASE}{path}"));
        let text = self.execute(request, "GET", path).await?;
        let cf_response = self.parse_envelope::<T>(&text, context)?;
        let info = cf_response.result_info.clone();
        let result = cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))?;
        Ok((result, info))
    }

    /// 执行 GET 请求（纯文本响应，无 envelope；用于 BIND 导出）
    pub(crate) async fn get_text(&self, path: &str) -> Result<String> {
        let request = self.client.get(format!("{CF_API_BASE}{path}"));
        self.execute(request, "GET", path).await
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        if log::log_enabled!(log::Level::Debug) {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "无法序列化请求体".to_string());
            log::debug!("[cloudflare] Request Body: {body_json}");
        }

        let request = self.client.post(format!("{CF_API_BASE}{path}")).json(body);
        let text = self.execute(request, "POST", path).await?;
        let cf_response = self.parse_envelope::<T>(&text, context)?;
        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 PATCH 请求
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        if log::log_enabled!(log::Level::Debug) {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "无法序列化请求体".to_string());
            log::debug!("[cloudflare] Request Body: {body_json}");
        }

        let request = self
            .client
            .patch(format!("{CF_API_BASE}{path}"))
            .json(body);
        let text = self.execute(request, "PATCH", path).await?;
        let cf_response = self.parse_envelope::<T>(&text, context)?;
        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 PUT 请求（JavaScript 请求体，用于 worker 上传）
    pub(crate) async fn put_script<T: DeserializeOwned>(
        &self,
        path: &str,
        script: String,
        context: ErrorContext,
    ) -> Result<T> {
        let request = self
            .client
            .put(format!("{CF_API_BASE}{path}"))
            .header("Content-Type", "application/javascript")
            .body(script);
        let text = self.execute(request, "PUT", path).await?;
        let cf_response = self.parse_envelope::<T>(&text, context)?;
        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let request = self.client.delete(format!("{CF_API_BASE}{path}"));
        let text = self.execute(request, "DELETE", path).await?;
        self.parse_envelope::<serde_json::Value>(&text, context)?;
        Ok(())
    }
}
