//! Qidian 选择器
//!
//! 预编译的 CSS 选择器

use std::sync::OnceLock;

use scraper::Selector;

/// 站点选择器集合
///
/// 详情页字段全部走 `og:` 语义元数据标签，对页面版式变动不敏感；
/// 搜索结果选择器对应搜索引擎的结果列表结构。
pub struct SiteSelectors {
    pub meta_book_name: Selector,
    pub meta_og_title: Selector,
    pub meta_author: Selector,
    pub meta_og_description: Selector,
    pub meta_description: Selector,
    pub meta_category: Selector,
    pub meta_status: Selector,
    pub search_result_link: Selector,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

impl SiteSelectors {
    /// 获取全局选择器实例
    pub fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            meta_book_name: Selector::parse(r#"meta[property="og:novel:book_name"]"#).unwrap(),
            meta_og_title: Selector::parse(r#"meta[property="og:title"]"#).unwrap(),
            meta_author: Selector::parse(r#"meta[property="og:novel:author"]"#).unwrap(),
            meta_og_description: Selector::parse(r#"meta[property="og:description"]"#).unwrap(),
            meta_description: Selector::parse(r#"meta[name="description"]"#).unwrap(),
            meta_category: Selector::parse(r#"meta[property="og:novel:category"]"#).unwrap(),
            meta_status: Selector::parse(r#"meta[property="og:novel:status"]"#).unwrap(),
            search_result_link: Selector::parse("ol#b_results li.b_algo h2 a").unwrap(),
        })
    }
}
