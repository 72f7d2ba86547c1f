//! Qidian 封面获取器
//!
//! 依序抓取最新封面与旧版封面。每次请求前固定延时一小段时间，
//! 避免触发图床的反爬（固定间隔，非退避算法）。单个封面失败只记录
//! 日志并继续，绝不中断整个下载操作。

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::resolver::{cover_url, legacy_cover_url};
use crate::core::model::CoverPayload;
use crate::core::sink::ResultSink;
use crate::network::client::SiteClient;

pub struct QidianCoverFetcher {
    provider: String,
    delay: Duration,
}

impl QidianCoverFetcher {
    pub fn new(provider: &str, delay: Duration) -> Self {
        Self {
            provider: provider.to_string(),
            delay,
        }
    }

    /// 抓取封面并投递，产出 0 / 1 / 2 个载荷
    pub async fn fetch(
        &self,
        id: &str,
        sink: &ResultSink<CoverPayload>,
        abort: &CancellationToken,
        client: &SiteClient,
        best_cover_only: bool,
    ) {
        let mut urls = vec![cover_url(id)];
        if !best_cover_only {
            urls.push(legacy_cover_url(id));
        }

        for url in urls {
            if abort.is_cancelled() {
                debug!("封面下载被中止 (id={})", id);
                return;
            }

            tokio::time::sleep(self.delay).await;

            match client.get_bytes(&url).await {
                Ok(data) if !data.is_empty() => {
                    debug!("封面下载成功: {} ({} bytes)", url, data.len());
                    sink.put(CoverPayload {
                        provider: self.provider.clone(),
                        url,
                        data,
                    });
                }
                Ok(_) => {
                    debug!("封面响应为空，跳过: {}", url);
                }
                Err(e) => {
                    warn!("封面下载失败，跳过: {} ({})", url, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_url_order() {
        // 最新封面在前，旧版在后
        let current = cover_url("1979049");
        let legacy = legacy_cover_url("1979049");
        assert!(!current.ends_with('/'));
        assert!(legacy.ends_with('/'));
        assert_eq!(format!("{}/", current), legacy);
    }
}
