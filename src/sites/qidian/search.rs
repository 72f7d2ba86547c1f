//! Qidian 搜索回退
//!
//! 无 ID 可用时，借助通用搜索引擎做站内搜索：拼出限定站点的查询、
//! 抓取结果页、还原跳转链接，再从幸存链接中提取候选站点 ID。
//! 任何错误都被吞掉并记录，调用方最多拿到一个空列表。

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use scraper::Html;
use tracing::{debug, warn};
use url::Url;

use super::redirect::resolve_click_tracking;
use super::resolver::id_from_url;
use super::selectors::SiteSelectors;
use crate::core::error::Result;
use crate::core::model::SearchCandidate;
use crate::network::client::SiteClient;
use crate::utils::{strip_control_chars, to_absolute_url};

/// 默认搜索引擎域名
const DEFAULT_SEARCH_BASE: &str = "https://www.bing.com";

/// 限定站内搜索的范围前缀
const SEARCH_SCOPE: &str = "site:qidian.com";

/// 命中即丢弃的路径片段：搜索、分类、排行、论坛、用户页
const EXCLUDED_PATHS: [&str; 5] = ["/so/", "/all", "/rank", "/forum", "/mm"];

/// 搜索回退执行器
pub struct QidianSearch {
    base: Url,
}

impl QidianSearch {
    pub fn new(search_base: Option<String>) -> Self {
        let base = search_base.unwrap_or_else(|| DEFAULT_SEARCH_BASE.to_string());
        Self {
            base: Url::parse(&base).expect("Invalid search base URL"),
        }
    }

    /// 按标题（可选作者）搜索候选书籍
    ///
    /// 返回搜索引擎给出的相关度顺序，不去重；失败时返回空列表。
    pub async fn search(
        &self,
        title: &str,
        author: Option<&str>,
        client: &SiteClient,
    ) -> Vec<SearchCandidate> {
        match self.try_search(title, author, client).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("搜索回退失败: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        title: &str,
        author: Option<&str>,
        client: &SiteClient,
    ) -> Result<Vec<SearchCandidate>> {
        let url = self.build_search_url(title, author);
        debug!("搜索回退: {}", url);

        let html = client.get_text(&url).await?;
        let candidates = self.parse_results(&strip_control_chars(&html));
        debug!("搜索结果解析出 {} 个候选", candidates.len());
        Ok(candidates)
    }

    /// 拼装限定站点的搜索 URL
    fn build_search_url(&self, title: &str, author: Option<&str>) -> String {
        let mut query = format!("{} {}", SEARCH_SCOPE, title);
        if let Some(author) = author {
            query.push(' ');
            query.push_str(author);
        }

        // Url 渲染时域名自带尾斜杠
        let encoded = utf8_percent_encode(&query, NON_ALPHANUMERIC);
        format!("{}search?q={}", self.base, encoded)
    }

    /// 从结果页中提取候选项
    fn parse_results(&self, html: &str) -> Vec<SearchCandidate> {
        let doc = Html::parse_document(html);
        let s = SiteSelectors::get();

        doc.select(&s.search_result_link)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let text = anchor.text().collect::<String>().trim().to_string();

                // 相对链接先补全成绝对 URL 再进解码
                let target = resolve_click_tracking(&to_absolute_url(&self.base, href));
                if !is_book_page_link(&target) {
                    return None;
                }

                // 恰好一个 ID 才收，零个或多个都丢
                let id = id_from_url(&target)?;

                Some(SearchCandidate {
                    site_id: id,
                    source_url: target,
                    display_text: text,
                })
            })
            .collect()
    }
}

/// 链接是否指向目标站点的书籍页面
fn is_book_page_link(href: &str) -> bool {
    let Ok(url) = Url::parse(href) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    if host != "qidian.com" && !host.ends_with(".qidian.com") {
        return false;
    }

    let path = url.path();
    !EXCLUDED_PATHS.iter().any(|frag| path.contains(frag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::prelude::*;

    fn tracking_href(target: &str) -> String {
        format!(
            "https://www.bing.com/ck/a?!&&p=cafe&u=a1{}&ntb=1",
            BASE64_URL_SAFE_NO_PAD.encode(target.as_bytes())
        )
    }

    fn results_page(items: &[(&str, &str)]) -> String {
        let body: String = items
            .iter()
            .map(|(href, text)| {
                format!(
                    r#"<li class="b_algo"><h2><a href="{}">{}</a></h2></li>"#,
                    href, text
                )
            })
            .collect();
        format!(
            r#"<html><body><ol id="b_results">{}</ol></body></html>"#,
            body
        )
    }

    #[test]
    fn test_build_search_url_scopes_and_encodes() {
        let search = QidianSearch::new(None);
        let url = search.build_search_url("一世之尊", Some("爱潜水的乌贼"));
        assert!(url.starts_with("https://www.bing.com/search?q=site%3Aqidian%2Ecom%20"));
        assert!(!url.contains(' '));

        let mirror = QidianSearch::new(Some("https://cn.bing.com".to_string()));
        assert!(
            mirror
                .build_search_url("一世之尊", None)
                .starts_with("https://cn.bing.com/search?q=")
        );
    }

    #[test]
    fn test_parse_results_decodes_and_filters() {
        let search = QidianSearch::new(None);
        let html = results_page(&[
            // 点击统计中转，解码后是合法书籍页
            (
                &tracking_href("https://www.qidian.com/book/1979049/"),
                "一世之尊",
            ),
            // 直链移动版
            ("https://m.qidian.com/book/1025325277/", "我们生活在南京"),
            // 站外链接
            ("https://www.example.com/book/123/", "别家的书"),
            // 站内但命中排除路径
            ("https://www.qidian.com/rank/yuepiao/", "月票榜"),
            ("https://www.qidian.com/so/%E4%B8%80%E4%B8%96.html", "搜索页"),
            // 旧版信息页
            ("https://book.qidian.com/info/1979049/", "一世之尊"),
        ]);

        let candidates = search.parse_results(&html);
        let ids: Vec<&str> = candidates.iter().map(|c| c.site_id.as_str()).collect();
        // 顺序保留，ID 不去重
        assert_eq!(ids, vec!["1979049", "1025325277", "1979049"]);
        assert_eq!(candidates[0].display_text, "一世之尊");
        assert_eq!(
            candidates[1].source_url,
            "https://m.qidian.com/book/1025325277/"
        );
    }

    #[test]
    fn test_parse_results_resolves_relative_tracking_href() {
        let search = QidianSearch::new(None);
        let encoded =
            BASE64_URL_SAFE_NO_PAD.encode("https://www.qidian.com/book/1979049/".as_bytes());
        let html = results_page(&[(&format!("/ck/a?!&&u=a1{}", encoded), "一世之尊")]);

        let candidates = search.parse_results(&html);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].site_id, "1979049");
    }

    #[test]
    fn test_parse_results_all_filtered_yields_empty() {
        let search = QidianSearch::new(None);
        let html = results_page(&[
            ("https://www.qidian.com/forum/12345", "书友圈"),
            ("https://www.qidian.com/mm/87654321", "用户主页"),
            ("https://www.qidian.com/all/chanId12/", "分类页"),
            ("https://zhidao.baidu.com/question/1.html", "知道"),
        ]);
        assert!(search.parse_results(&html).is_empty());
    }

    #[test]
    fn test_parse_results_ignores_other_page_structure() {
        // 结果列表结构之外的链接不参与提取
        let search = QidianSearch::new(None);
        let html = r#"<html><body>
            <div class="b_attribution"><a href="https://www.qidian.com/book/1/">侧栏</a></div>
            <ol id="b_results"></ol>
        </body></html>"#;
        assert!(search.parse_results(html).is_empty());
    }
}
