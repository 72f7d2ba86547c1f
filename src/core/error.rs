//! 错误处理体系 (Error Handling System)
//!
//! 定义领域相关的错误类型与全局 Result 别名。
//!
//! 连接器整体遵循"软失败"策略：入口方法从不向宿主抛出错误，
//! 所有错误在各自的子操作内被捕获、记录，最终表现为结果队列为空。

use thiserror::Error;

/// 全局错误定义 (Connector Domain Errors)
#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 页面缺失必填元数据字段，禁止产出记录
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// 跳转链接解码失败（调用方应回退到原始链接）
    #[error("Link decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// 全局 Result 别名
pub type Result<T> = std::result::Result<T, MetaError>;
