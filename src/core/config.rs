//! 配置管理系统 (Configuration Management)
//!
//! 负责 `config.toml` 的反序列化及其层级结构映射，所有字段均有默认值，
//! 配置文件不存在时直接回退到默认配置。

use std::collections::HashMap;
use std::path::Path;

use bon::Builder;
use config::{Config, File};
use serde::Deserialize;

use crate::core::error::Result;

/// 全局应用配置
#[derive(Debug, Deserialize, Builder, Clone, Default)]
pub struct AppConfig {
    /// 元数据查询通用参数
    #[serde(default)]
    pub lookup: LookupConfig,

    /// 站点特定配置覆盖映射
    #[serde(default)]
    pub sites: HashMap<String, SiteConfig>,
}

/// 查询参数
#[derive(Debug, Deserialize, Builder, Clone)]
pub struct LookupConfig {
    /// 单次请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 搜索回退路径最多解析的候选数
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// 每次封面请求前的固定延时（毫秒），用于规避站点反爬
    #[serde(default = "default_cover_delay_ms")]
    pub cover_delay_ms: u64,
}

/// 站点特定配置覆盖
#[derive(Debug, Deserialize, Builder, Clone, Default)]
pub struct SiteConfig {
    /// 自定义搜索引擎域名（如使用 cn.bing.com 镜像）
    pub search_base: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_candidates: default_max_candidates(),
            cover_delay_ms: default_cover_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_candidates() -> usize {
    3
}
fn default_cover_delay_ms() -> u64 {
    1000
}

impl AppConfig {
    /// 从文件系统中加载并解析配置
    pub fn load() -> Result<Self> {
        let config_path = Path::new("config.toml");
        let builder = Config::builder();

        let builder = if config_path.exists() {
            builder.add_source(File::from(config_path))
        } else {
            builder
        };

        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
    }
}
