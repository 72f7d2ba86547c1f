//! 领域数据模型
//!
//! 连接器产出的规范化元数据记录及搜索中间结果。

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// 规范化书籍元数据记录
///
/// 不变式：只有 `title` 与 `authors` 均非空的记录才会被投递到结果队列，
/// 缺失任一字段的页面在提取阶段即被拦截。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub publisher: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// 站点内唯一书籍标识
    pub canonical_id: String,
    /// 书籍详情页规范 URL
    pub source_url: String,
    /// 封面图 URL（未经存在性校验）
    pub cover_url: String,
}

/// 搜索回退路径产出的候选项
///
/// 瞬态数据：产出后立即经由 ID 解析换取完整记录，不做持久化。
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub site_id: String,
    pub source_url: String,
    pub display_text: String,
}

/// 封面图载荷
#[derive(Debug, Clone)]
pub struct CoverPayload {
    /// 产出此载荷的源标识
    pub provider: String,
    pub url: String,
    pub data: Bytes,
}

/// `book_url` 入口的返回值：(源标识, 站点 ID, 详情页 URL)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUrl {
    pub provider: String,
    pub id: String,
    pub url: String,
}
