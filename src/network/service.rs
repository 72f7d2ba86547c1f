//! HTTP 服务层
//!
//! 负责底层 `reqwest::Client` 的构建与持有：在构建期将会话中的
//! UA 与标准 Header 注入为默认 Header，并统一连接参数。

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::core::error::{MetaError, Result};
use crate::network::session::Session;

#[derive(Clone)]
pub struct HttpService {
    client: reqwest::Client,
}

impl HttpService {
    pub fn new(session: Arc<Session>) -> Result<Self> {
        let client = Self::try_build_internal_client(&session)?;
        Ok(Self { client })
    }

    /// 构建底层的 HTTP 客户端
    fn try_build_internal_client(session: &Session) -> Result<reqwest::Client> {
        let mut headers = HeaderMap::new();

        // 基础 Header 注入
        let ua = session.get_ua();
        if !ua.is_empty()
            && let Ok(val) = HeaderValue::from_str(&ua)
        {
            headers.insert(USER_AGENT, val);
        }

        // 批量注入 Session Headers
        headers.extend(
            session
                .get_headers()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(MetaError::Network)?;

        Ok(client)
    }

    /// 执行 GET 请求，超时由调用方按次传入
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(MetaError::Network)?;
        Ok(resp)
    }
}
