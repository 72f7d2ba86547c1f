//! 服务上下文 (ServiceContext)
//!
//! 打包连接器运行所需的共享服务，供站点实现的构造函数按需取用。

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::AppConfig;
use crate::network::service::HttpService;
use crate::network::session::Session;

#[derive(Clone)]
pub struct ServiceContext {
    /// HTTP 服务
    pub http: Arc<HttpService>,
    /// 会话（UA 与附加 Header）
    pub session: Arc<Session>,
    /// 应用配置
    pub config: Arc<AppConfig>,
}

impl ServiceContext {
    pub fn new(http: Arc<HttpService>, session: Arc<Session>, config: Arc<AppConfig>) -> Self {
        Self {
            http,
            session,
            config,
        }
    }

    /// 按配置返回默认请求超时
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.lookup.timeout_secs)
    }
}
