//! 面向站点的 HTTP 客户端封装
//!
//! 在 `HttpService` 之上附加按次超时与状态码检查。非 2xx 响应被视为
//! 抓取失败并转换为错误，由上层的 URL 模板回退链接管。

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Response;

use crate::core::error::{MetaError, Result};
use crate::network::service::HttpService;

#[derive(Clone)]
pub struct SiteClient {
    http: Arc<HttpService>,
    timeout: Duration,
}

impl SiteClient {
    pub fn new(http: Arc<HttpService>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// 派生一个使用指定超时的客户端（用于按调用传入的超时值）
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            http: self.http.clone(),
            timeout,
        }
    }

    /// 执行通用 GET 请求
    pub async fn get(&self, url: &str) -> Result<Response> {
        let resp = self.http.get(url, self.timeout).await?;
        let resp = resp.error_for_status().map_err(MetaError::Network)?;
        Ok(resp)
    }

    /// 获取文本内容（字符集按响应头解码）
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let resp = self.get(url).await?;
        let text = resp.text().await.map_err(MetaError::Network)?;
        Ok(text)
    }

    /// 获取二进制内容
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let resp = self.get(url).await?;
        let bytes = resp.bytes().await.map_err(MetaError::Network)?;
        Ok(bytes)
    }
}
