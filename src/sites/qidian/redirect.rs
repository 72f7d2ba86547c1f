//! 搜索引擎跳转链接解码
//!
//! 搜索结果中的链接经过点击统计中转（`bing.com/ck/a?...&u=a1<base64>&...`），
//! 真实目标 URL 以 base64 形式藏在 `u` 参数中。这里做尽力而为的还原：
//! 任何一步失败都回退到原始链接，绝不让解码问题中断搜索流程。

use base64::prelude::*;
use url::Url;

use crate::core::error::{MetaError, Result};

/// `u` 参数值的固定前缀，非 base64 内容
const TRACKING_PARAM_PREFIX: &str = "a1";

/// 还原跳转链接指向的真实 URL
///
/// 非跳转链接原样返回。
pub fn resolve_click_tracking(href: &str) -> String {
    if !is_tracking_link(href) {
        return href.to_string();
    }

    match decode_target(href) {
        Ok(real) => real,
        Err(e) => {
            tracing::debug!("跳转链接解码失败，回退原始链接: {}", e);
            href.to_string()
        }
    }
}

/// 判断链接是否为搜索引擎的点击统计中转
fn is_tracking_link(href: &str) -> bool {
    let Ok(url) = Url::parse(href) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    (host == "bing.com" || host.ends_with(".bing.com")) && url.path().starts_with("/ck/")
}

/// 从 `u` 参数中解出真实 URL
fn decode_target(href: &str) -> Result<String> {
    let url = Url::parse(href).map_err(|e| MetaError::Decode(e.to_string()))?;

    let encoded = url
        .query_pairs()
        .find(|(k, _)| k == "u")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| MetaError::Decode("missing u parameter".into()))?;

    let encoded = encoded
        .strip_prefix(TRACKING_PARAM_PREFIX)
        .unwrap_or(&encoded);

    // 补齐到 4 的整数倍再解码
    let mut padded = encoded.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let raw = BASE64_URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|e| MetaError::Decode(e.to_string()))?;

    String::from_utf8(raw).map_err(|e| MetaError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracking_href(target: &str) -> String {
        let encoded = BASE64_URL_SAFE_NO_PAD.encode(target.as_bytes());
        format!(
            "https://www.bing.com/ck/a?!&&p=deadbeef&u=a1{}&ntb=1",
            encoded
        )
    }

    #[test]
    fn test_decode_round_trip() {
        let target = "https://www.qidian.com/book/1025325277/";
        assert_eq!(resolve_click_tracking(&tracking_href(target)), target);
    }

    #[test]
    fn test_decode_without_prefix() {
        let encoded = BASE64_URL_SAFE_NO_PAD.encode("https://m.qidian.com/book/1/".as_bytes());
        let href = format!("https://cn.bing.com/ck/a?u={}", encoded);
        assert_eq!(
            resolve_click_tracking(&href),
            "https://m.qidian.com/book/1/"
        );
    }

    #[test]
    fn test_non_tracking_link_unchanged() {
        let href = "https://www.qidian.com/book/1025325277/";
        assert_eq!(resolve_click_tracking(href), href);

        // 同域但非中转路径
        let href = "https://www.bing.com/search?q=test";
        assert_eq!(resolve_click_tracking(href), href);
    }

    #[test]
    fn test_missing_param_falls_back() {
        let href = "https://www.bing.com/ck/a?!&&p=deadbeef&ntb=1";
        assert_eq!(resolve_click_tracking(href), href);
    }

    #[test]
    fn test_bad_base64_falls_back() {
        let href = "https://www.bing.com/ck/a?u=a1!!!not-base64!!!";
        assert_eq!(resolve_click_tracking(href), href);
    }

    #[test]
    fn test_bad_utf8_falls_back() {
        let encoded = BASE64_URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0x80]);
        let href = format!("https://www.bing.com/ck/a?u=a1{}", encoded);
        assert_eq!(resolve_click_tracking(&href), href);
    }

    #[test]
    fn test_relative_href_not_tracking() {
        assert_eq!(resolve_click_tracking("/book/123/"), "/book/123/");
    }
}
