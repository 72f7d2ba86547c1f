//! 会话信息 (Session)
//!
//! 保存请求时使用的 User-Agent 与附加 Header。连接器只发起匿名只读
//! 请求，会话在构建后不再变化。

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

/// 伪装的移动端浏览器 UA
///
/// 站点对非浏览器 UA 返回拦截页，移动端 UA 同时命中移动版模板（主解析路径）。
pub const MOBILE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) \
AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";

#[derive(Debug, Default)]
pub struct Session {
    pub ua: Arc<RwLock<String>>,
    pub extra_headers: Arc<RwLock<HeaderMap>>,
}

impl Session {
    /// 构建移动端浏览器画像的会话
    pub fn mobile() -> Self {
        let session = Self::default();
        session.set_ua(MOBILE_UA.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.5"),
        );
        session.set_headers(headers);
        session
    }

    pub fn set_ua(&self, ua: String) {
        *self.ua.write() = ua;
    }

    pub fn get_ua(&self) -> String {
        self.ua.read().clone()
    }

    pub fn set_headers(&self, headers: HeaderMap) {
        *self.extra_headers.write() = headers;
    }

    pub fn get_headers(&self) -> HeaderMap {
        self.extra_headers.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_profile() {
        let session = Session::mobile();
        assert!(session.get_ua().contains("iPhone"));
        let headers = session.get_headers();
        assert!(headers.contains_key(ACCEPT));
        assert_eq!(
            headers.get(ACCEPT_LANGUAGE).unwrap().to_str().unwrap(),
            "zh-CN,zh;q=0.9,en;q=0.5"
        );
    }
}
