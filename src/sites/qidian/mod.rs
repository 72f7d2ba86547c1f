//! Qidian (起点中文网) 元数据源
//!
//! 检索状态机：有站点 ID 时直接按 ID 解析并产出；无 ID 但有标题时
//! 走搜索回退，逐个候选解析并校验，只投递校验通过的记录。
//! 除解析器内部的 URL 模板回退与搜索的"仅标题重试"外没有其他重试。

mod cover;
mod extractor;
mod redirect;
mod resolver;
mod search;
mod selectors;

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use self::cover::QidianCoverFetcher;
pub use self::extractor::{BookFields, extract_fields};
pub use self::redirect::resolve_click_tracking;
pub use self::resolver::QidianResolver;
pub use self::search::QidianSearch;
pub use self::selectors::SiteSelectors;

use crate::core::config::SiteConfig;
use crate::core::model::{BookRecord, BookUrl, CoverPayload};
use crate::core::sink::ResultSink;
use crate::interfaces::source::{Identifiers, IdentifyQuery, MetadataSource};
use crate::network::client::SiteClient;
use crate::network::context::ServiceContext;
use crate::utils::fuzzy_contains;

/// 源标识，同时是标识符映射中的键名
pub const PROVIDER_ID: &str = "qidian";

/// 面向用户的站点名称
pub const DISPLAY_NAME: &str = "起点中文网";

/// Qidian 源实现
pub struct Qidian {
    client: SiteClient,
    resolver: QidianResolver,
    search: QidianSearch,
    cover: QidianCoverFetcher,
    max_candidates: usize,
}

impl Qidian {
    /// 创建新的 Qidian 源实例
    pub fn new(config: SiteConfig, ctx: ServiceContext) -> Self {
        let lookup = &ctx.config.lookup;

        Self {
            resolver: QidianResolver,
            search: QidianSearch::new(config.search_base),
            cover: QidianCoverFetcher::new(
                PROVIDER_ID,
                Duration::from_millis(lookup.cover_delay_ms),
            ),
            max_candidates: lookup.max_candidates,
            client: SiteClient::new(ctx.http.clone(), ctx.default_timeout()),
        }
    }

    /// 应用按次传入的超时
    fn request_client(&self, query: &IdentifyQuery) -> SiteClient {
        if query.timeout.is_zero() {
            self.client.clone()
        } else {
            self.client.with_timeout(query.timeout)
        }
    }

    /// 搜索回退主流程：搜索 → 截断 → 逐候选解析 → 校验
    ///
    /// 候选间检查中止标志；解析失败或校验不过的候选直接跳过。
    async fn search_matches(
        &self,
        title: &str,
        query: &IdentifyQuery,
        abort: &CancellationToken,
        client: &SiteClient,
    ) -> Vec<BookRecord> {
        let author = query.first_author();

        let mut candidates = self.search.search(title, author, client).await;
        if candidates.is_empty() && author.is_some() {
            debug!("标题+作者无结果，仅按标题重试");
            candidates = self.search.search(title, None, client).await;
        }

        let mut records = Vec::new();
        for candidate in candidates.into_iter().take(self.max_candidates) {
            if abort.is_cancelled() {
                debug!("检索被中止，停止处理剩余候选");
                break;
            }

            let Some(record) = self.resolver.resolve(&candidate.site_id, client).await else {
                continue;
            };

            if !verify_match(title, &query.authors, &record) {
                debug!(
                    "候选校验未通过，丢弃 (id={}, title={})",
                    candidate.site_id, record.title
                );
                continue;
            }

            records.push(record);
        }
        records
    }
}

/// 搜索候选校验：标题双向宽松匹配；给了作者时还须命中至少一位候选作者
///
/// 刻意保持宽松（子串而非全等），以容忍音译与空白差异。
fn verify_match(title: &str, authors: &[String], record: &BookRecord) -> bool {
    if !fuzzy_contains(title, &record.title) {
        return false;
    }
    if authors.is_empty() {
        return true;
    }
    authors
        .iter()
        .any(|qa| record.authors.iter().any(|ca| fuzzy_contains(qa, ca)))
}

#[async_trait]
impl MetadataSource for Qidian {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn display_name(&self) -> &str {
        DISPLAY_NAME
    }

    fn book_url(&self, identifiers: &Identifiers) -> Option<BookUrl> {
        let id = identifiers.get(PROVIDER_ID)?;
        Some(BookUrl {
            provider: PROVIDER_ID.to_string(),
            id: id.clone(),
            url: resolver::canonical_url(id),
        })
    }

    fn id_from_url(&self, url: &str) -> Option<String> {
        resolver::id_from_url(url)
    }

    async fn identify(
        &self,
        sink: &ResultSink<BookRecord>,
        abort: &CancellationToken,
        query: &IdentifyQuery,
    ) {
        let client = self.request_client(query);

        if let Some(id) = query.identifiers.get(PROVIDER_ID) {
            info!("按站点 ID 检索: {}", id);
            if let Some(record) = self.resolver.resolve(id, &client).await {
                sink.put(record);
            }
            return;
        }

        let Some(title) = query.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            warn!("既无站点 ID 也无标题，无法检索");
            return;
        };

        info!("按标题检索: {}", title);
        for record in self.search_matches(title, query, abort, &client).await {
            sink.put(record);
        }
    }

    async fn download_cover(
        &self,
        sink: &ResultSink<CoverPayload>,
        abort: &CancellationToken,
        query: &IdentifyQuery,
        best_cover_only: bool,
    ) {
        let client = self.request_client(query);

        let id = match query.identifiers.get(PROVIDER_ID) {
            Some(id) => Some(id.clone()),
            None => {
                info!("标识符中无站点 ID，先执行检索");
                match query.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    Some(title) => self
                        .search_matches(title, query, abort, &client)
                        .await
                        .into_iter()
                        .next()
                        .map(|record| record.canonical_id),
                    None => None,
                }
            }
        };

        let Some(id) = id else {
            info!("检索无结果，跳过封面下载");
            return;
        };

        if abort.is_cancelled() {
            return;
        }

        self.cover
            .fetch(&id, sink, abort, &client, best_cover_only)
            .await;
    }
}
