//! Qidian 标识解析器
//!
//! 站点 ID 与各类页面 URL 的双向映射，以及"ID → 完整记录"的解析流程。
//! 详情页模板按序回退：移动版优先，抓取失败换下一个模板；抓取成功后
//! 提取失败则整体失败，不再尝试后续模板（页面能打开说明 ID 有效，
//! 字段缺失是页面本身的问题）。

use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;
use tracing::{debug, warn};

use super::extractor::extract_fields;
use crate::core::error::Result;
use crate::core::model::BookRecord;
use crate::network::client::SiteClient;
use crate::utils::strip_control_chars;

/// 书籍详情页 URL 模板，按尝试顺序排列
fn page_urls(id: &str) -> [String; 3] {
    [
        format!("https://m.qidian.com/book/{}/", id),
        format!("https://www.qidian.com/book/{}/", id),
        format!("https://book.qidian.com/info/{}/", id),
    ]
}

/// 详情页规范 URL
pub fn canonical_url(id: &str) -> String {
    format!("https://www.qidian.com/book/{}/", id)
}

/// 最新封面 URL
///
/// 不带尾斜杠时图床返回最新的全尺寸封面图。
pub fn cover_url(id: &str) -> String {
    format!("https://bookcover.yuewen.com/qdbimg/349573/{}", id)
}

/// 旧版封面 URL（带尾斜杠的历史路径）
pub fn legacy_cover_url(id: &str) -> String {
    format!("https://bookcover.yuewen.com/qdbimg/349573/{}/", id)
}

/// 书籍链接的固定模式，覆盖三种已知 URL 形态：
/// `book.qidian.com/info/<id>/`、`www.qidian.com/book/<id>/`、`m.qidian.com/book/<id>/`
pub fn book_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"https?://(?:(?:www|m)\.qidian\.com/book|book\.qidian\.com/info)/(\d+)")
            .unwrap()
    })
}

/// 从 URL 中反解站点 ID
///
/// 恰好匹配一个 ID 才算成功，零个或多个都丢弃。
pub fn id_from_url(url: &str) -> Option<String> {
    let mut matches = book_id_pattern().captures_iter(url);
    let first = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    Some(first[1].to_string())
}

/// ID 解析器
pub struct QidianResolver;

impl QidianResolver {
    /// 按 ID 解析完整记录
    ///
    /// 任何失败都记录日志并返回 `None`，不向上抛出。
    pub async fn resolve(&self, id: &str, client: &SiteClient) -> Option<BookRecord> {
        let html = self.fetch_page(id, client).await?;

        match self.build_record(id, &html) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("书籍页面提取失败 (id={}): {}", id, e);
                None
            }
        }
    }

    /// 依序尝试各详情页模板，返回首个抓取成功的页面
    async fn fetch_page(&self, id: &str, client: &SiteClient) -> Option<String> {
        for url in page_urls(id) {
            match client.get_text(&url).await {
                Ok(html) => {
                    debug!("详情页抓取成功: {}", url);
                    return Some(html);
                }
                Err(e) => {
                    warn!("详情页抓取失败，尝试下一模板: {} ({})", url, e);
                }
            }
        }
        warn!("所有详情页模板均不可用 (id={})", id);
        None
    }

    /// 规范化并解析页面，组装记录
    fn build_record(&self, id: &str, raw: &str) -> Result<BookRecord> {
        let cleaned = strip_control_chars(raw);
        let doc = Html::parse_document(&cleaned);
        let fields = extract_fields(&doc)?;

        Ok(BookRecord {
            title: fields.title,
            authors: vec![fields.author],
            description: fields.description,
            publisher: "起点中文网".to_string(),
            language: "zh-CN".to_string(),
            tags: fields.tags,
            canonical_id: id.to_string(),
            source_url: canonical_url(id),
            cover_url: cover_url(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_templates() {
        assert_eq!(
            canonical_url("1025325277"),
            "https://www.qidian.com/book/1025325277/"
        );
        // 最新封面不带尾斜杠，旧版带
        assert_eq!(
            cover_url("1025325277"),
            "https://bookcover.yuewen.com/qdbimg/349573/1025325277"
        );
        assert_eq!(
            legacy_cover_url("1025325277"),
            "https://bookcover.yuewen.com/qdbimg/349573/1025325277/"
        );
    }

    #[test]
    fn test_id_from_url_known_shapes() {
        assert_eq!(
            id_from_url("https://www.qidian.com/book/1025325277/"),
            Some("1025325277".to_string())
        );
        assert_eq!(
            id_from_url("https://m.qidian.com/book/1025325277"),
            Some("1025325277".to_string())
        );
        assert_eq!(
            id_from_url("https://book.qidian.com/info/1025325277/"),
            Some("1025325277".to_string())
        );
    }

    #[test]
    fn test_id_from_url_rejects_unknown_and_ambiguous() {
        assert_eq!(id_from_url("https://www.qidian.com/so/test.html"), None);
        assert_eq!(id_from_url("https://example.com/book/123/"), None);
        // 同一链接出现多个 ID 时丢弃
        assert_eq!(
            id_from_url(
                "https://www.qidian.com/book/111/?ref=https://m.qidian.com/book/222/"
            ),
            None
        );
    }

    #[test]
    fn test_build_record_populates_derived_urls() {
        let resolver = QidianResolver;
        let raw = concat!(
            "<html><head>",
            r#"<meta property="og:novel:book_name" content="我们生活在南京">"#,
            r#"<meta property="og:novel:author" content="天瑞说符">"#,
            r#"<meta property="og:novel:category" content="科幻">"#,
            "</head><body></body></html>"
        );
        let record = resolver.build_record("1025325277", raw).unwrap();
        assert_eq!(record.title, "我们生活在南京");
        assert_eq!(record.authors, vec!["天瑞说符"]);
        assert_eq!(record.canonical_id, "1025325277");
        assert_eq!(record.source_url, "https://www.qidian.com/book/1025325277/");
        assert_eq!(
            record.cover_url,
            "https://bookcover.yuewen.com/qdbimg/349573/1025325277"
        );
        assert_eq!(record.publisher, "起点中文网");
        assert_eq!(record.language, "zh-CN");
    }

    #[test]
    fn test_build_record_strips_control_chars() {
        let resolver = QidianResolver;
        let raw = concat!(
            "<html><head>",
            "<meta property=\"og:novel:book_name\" content=\"我们生活\u{0}在南京\">",
            r#"<meta property="og:novel:author" content="天瑞说符">"#,
            "</head></html>"
        );
        let record = resolver.build_record("1", raw).unwrap();
        assert_eq!(record.title, "我们生活在南京");
    }

    #[test]
    fn test_build_record_missing_author_fails() {
        let resolver = QidianResolver;
        let raw = r#"<html><head><meta property="og:novel:book_name" content="t"></head></html>"#;
        assert!(resolver.build_record("1", raw).is_err());
    }
}
