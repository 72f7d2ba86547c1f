//! 站点源注册表
//!
//! 宿主按源标识从注册表取得元数据源实例。

use std::collections::HashMap;

use crate::core::config::SiteConfig;
use crate::interfaces::MetadataSource;
use crate::network::context::ServiceContext;

pub mod qidian;

type SourceFactory =
    Box<dyn Fn(SiteConfig, ServiceContext) -> Box<dyn MetadataSource> + Send + Sync>;

pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(qidian::PROVIDER_ID, |cfg, ctx| {
            Box::new(qidian::Qidian::new(cfg, ctx))
        });
        registry
    }

    pub fn register<F>(&mut self, id: &str, factory: F)
    where
        F: Fn(SiteConfig, ServiceContext) -> Box<dyn MetadataSource> + Send + Sync + 'static,
    {
        self.factories.insert(id.to_string(), Box::new(factory));
    }

    /// 创建指定源实例，站点覆盖配置从上下文中取
    pub fn create(&self, id: &str, ctx: ServiceContext) -> Option<Box<dyn MetadataSource>> {
        let config = ctx.config.sites.get(id).cloned().unwrap_or_default();
        self.factories.get(id).map(|f| f(config, ctx))
    }

    pub fn list(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
