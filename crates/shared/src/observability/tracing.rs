//! 日志与追踪初始化
//!
//! 基于 tracing-subscriber 构建日志管线，支持环境变量过滤和 JSON 输出。

use anyhow::Result;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use super::ObservabilityConfig;

/// 初始化日志管线
///
/// 过滤规则优先取 RUST_LOG 环境变量，否则使用配置中的 log_level。
/// 重复初始化（如测试中）返回错误，由调用方决定是否忽略。
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    // 构建环境过滤器
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // 构建日志层
    let fmt_layer = if config.json_logs {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_failure() {
        let config = ObservabilityConfig::default();
        // 第一次初始化可能成功也可能因其他测试已初始化而失败，
        // 第二次必然失败且不得 panic
        let _ = init(&config);
        assert!(init(&config).is_err());
    }
}
