//! Qidian 字段提取器
//!
//! 对已解析的详情页执行固定的元数据标签查询，产出记录所需字段。
//! 必填字段（书名、作者）缺失即提取失败，调用方不得产出记录。

use scraper::Html;

use super::selectors::SiteSelectors;
use crate::core::error::{MetaError, Result};

/// 提取结果
#[derive(Debug, Clone)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// 读取首个匹配元素的 content 属性，空白修剪后为空则视为缺失
fn meta_content(doc: &Html, selector: &scraper::Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 提取书籍字段
pub fn extract_fields(doc: &Html) -> Result<BookFields> {
    let s = SiteSelectors::get();

    // 书名：语义字段优先，页面标题字段兜底
    let title = meta_content(doc, &s.meta_book_name)
        .or_else(|| meta_content(doc, &s.meta_og_title))
        .ok_or(MetaError::MissingField("title"))?;

    // 作者：单一语义字段，无兜底
    let author = meta_content(doc, &s.meta_author).ok_or(MetaError::MissingField("author"))?;

    let description =
        meta_content(doc, &s.meta_og_description).or_else(|| meta_content(doc, &s.meta_description));

    // 分类与连载状态依序并入标签，保留插入顺序，不去重
    let mut tags = Vec::new();
    if let Some(category) = meta_content(doc, &s.meta_category) {
        tags.push(category);
    }
    if let Some(status) = meta_content(doc, &s.meta_status) {
        tags.push(status);
    }

    Ok(BookFields {
        title,
        author,
        description,
        tags,
    })
}
