use std::path::Path;

use tokio::fs;
use url::Url;

pub fn to_absolute_url(base: &Url, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }

    if let Some(path_without_slashes) = href.strip_prefix("//") {
        return format!("{}://{}", base.scheme(), path_without_slashes);
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// 剔除页面文本中的 C0 控制字符（保留换行与制表符）
///
/// 站点页面偶发夹带控制字符，直接喂给解析器会污染提取出的字段值。
pub fn strip_control_chars(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// 宽松包含匹配：忽略大小写，双向子串
///
/// 用于搜索结果校验。刻意保持宽松（子串而非全等），以容忍
/// 音译、空白差异等变体；不要收紧成精确匹配。
pub fn fuzzy_contains(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    a.contains(&b) || b.contains(&a)
}

pub async fn save_file(path: impl AsRef<Path>, data: &[u8]) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, data).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_absolute_url() {
        let base = Url::parse("https://www.qidian.com/so/test.html").unwrap();
        assert_eq!(
            to_absolute_url(&base, "/book/1025325277/"),
            "https://www.qidian.com/book/1025325277/"
        );
        assert_eq!(
            to_absolute_url(&base, "//m.qidian.com/book/1/"),
            "https://m.qidian.com/book/1/"
        );
        assert_eq!(
            to_absolute_url(&base, "https://book.qidian.com/info/1/"),
            "https://book.qidian.com/info/1/"
        );
        assert_eq!(to_absolute_url(&base, ""), "");
    }

    #[test]
    fn test_strip_control_chars() {
        assert_eq!(strip_control_chars("我们\u{0}生活\u{8}在南京"), "我们生活在南京");
        assert_eq!(strip_control_chars("a\tb\nc\r\n"), "a\tb\nc\r\n");
    }

    #[test]
    fn test_fuzzy_contains_both_directions() {
        assert!(fuzzy_contains("一世之尊", "一世之尊（完本）"));
        assert!(fuzzy_contains("一世之尊（完本）", "一世之尊"));
        assert!(fuzzy_contains("Tian Rui Shuo Fu", "tian rui shuo fu"));
        assert!(!fuzzy_contains("一世之尊", "诡秘之主"));
        assert!(!fuzzy_contains("", "一世之尊"));
    }
}
