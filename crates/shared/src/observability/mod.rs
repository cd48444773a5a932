//! 统一可观测性模块
//!
//! 提供 logging 与 metrics 的统一初始化。
//! 前端通过单一入口点配置可观测性，确保一致的指标命名。

pub mod metrics;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;

use crate::config::ObservabilityConfig;

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志）
/// 2. Metrics（指标描述）
///
/// # Example
///
/// ```ignore
/// use pgame_shared::config::AppConfig;
/// use pgame_shared::observability;
///
/// let config = AppConfig::load("password-game")?;
/// observability::init(&config.observability, &config.service_name)?;
/// ```
pub fn init(config: &ObservabilityConfig, service_name: &str) -> Result<()> {
    tracing::init(config)?;
    metrics::describe();

    info!(
        service = %service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );

    Ok(())
}
