//! 元数据源定义
//!
//! 定义宿主通过固定入口调用的元数据源接口。入口方法不返回错误：
//! 任何失败都在源内部记录日志并退化为"结果队列为空"。

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use crate::core::model::{BookRecord, BookUrl, CoverPayload};
use crate::core::sink::ResultSink;

/// 标识符映射：源标识 → 站点内书籍 ID
///
/// 保序映射，序列化输出与宿主传入顺序一致。对重复或过期的 ID
/// 不做唯一性约束，由解析路径自行容错。
pub type Identifiers = IndexMap<String, String>;

/// 一次查询的输入参数
#[derive(Debug, Clone, Default)]
pub struct IdentifyQuery {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub identifiers: Identifiers,
    /// 单次请求超时
    pub timeout: Duration,
}

impl IdentifyQuery {
    /// 搜索回退路径使用的首选作者
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(|s| s.as_str())
    }
}

/// 元数据源 Trait
///
/// 每个源需要实现此 Trait，提供：
/// - 源标识与展示名称
/// - 标识符与 URL 的双向映射
/// - `identify` / `download_cover` 两个检索入口
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// 源唯一标识（同时也是标识符映射中的键名）
    fn id(&self) -> &str;

    /// 面向用户的站点名称
    fn display_name(&self) -> &str;

    /// 根据标识符映射推导详情页 URL
    fn book_url(&self, identifiers: &Identifiers) -> Option<BookUrl>;

    /// 从任意 URL 中反解站点 ID
    fn id_from_url(&self, url: &str) -> Option<String>;

    /// 检索书籍元数据并投递到结果队列
    ///
    /// 有 ID 时直接按 ID 解析；否则按标题（可选作者）走搜索回退。
    /// 两条路径都可能不产出任何记录。
    async fn identify(
        &self,
        sink: &ResultSink<BookRecord>,
        abort: &CancellationToken,
        query: &IdentifyQuery,
    );

    /// 下载封面并投递到结果队列
    ///
    /// `best_cover_only` 为 true 时只取最新封面，否则同时尝试旧版封面。
    async fn download_cover(
        &self,
        sink: &ResultSink<CoverPayload>,
        abort: &CancellationToken,
        query: &IdentifyQuery,
        best_cover_only: bool,
    );
}
