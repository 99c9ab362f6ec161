//! 日志初始化

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 解析日志过滤指令，`RUST_LOG` 优先于配置
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("Invalid log filter '{}'", level)),
    }
}

/// 初始化全局日志订阅者
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.format == "compact" {
        builder.compact().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
