//! # 日志初始化
//!
//! 安装全局 `tracing` 订阅者，并把 `log` crate 的记录桥接到 `tracing`。
//!
//! 过滤规则来自 `RUST_LOG` 环境变量，未设置时使用 [`DEFAULT_FILTER`]。
//! 控制周期内的逐阶段日志是 `trace` 级别，调试时可以这样打开：
//!
//! ```text
//! RUST_LOG=basis_control=trace cargo run
//! ```

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// 未设置 `RUST_LOG` 时的默认过滤规则
pub const DEFAULT_FILTER: &str = "info";

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    /// `log` 桥接已经安装过（例如另一个 logger 先初始化了）
    #[error("Failed to install log bridge: {0}")]
    LogBridge(#[from] tracing_log::log::SetLoggerError),

    /// 全局订阅者已经设置过
    #[error("Failed to set global subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// 过滤规则无法解析
    #[error("Invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },
}

/// 初始化日志
///
/// 重复调用是安全的：已经初始化过时静默返回。
/// 需要知道初始化结果时使用 [`try_init_logger`]。
///
/// # 示例
///
/// ```rust
/// basis_sdk::logging::init_logger();
/// tracing::info!("controller ready");
/// ```
pub fn init_logger() {
    let _ = try_init_logger();
}

/// 初始化日志（返回错误而不是忽略）
///
/// # 错误
///
/// 全局订阅者或 `log` 桥接已经被安装时返回错误
pub fn try_init_logger() -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter)
}

/// 以给定的默认过滤规则初始化日志
///
/// `RUST_LOG` 仍然优先；只有环境变量未设置时才使用 `default_filter`。
///
/// # 错误
///
/// `default_filter` 无法解析时返回 `LoggingError::Filter`
pub fn try_init_logger_with(default_filter: &str) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| LoggingError::Filter {
            filter: default_filter.to_string(),
            message: e.to_string(),
        })?,
    };
    install(filter)
}

fn install(filter: EnvFilter) -> Result<(), LoggingError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_default_filter() {
        // RUST_LOG 未设置时才会用到默认规则
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let err = try_init_logger_with("basis_control=not_a_level").unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
    }

    #[test]
    fn test_second_init_reports_error() {
        init_logger();
        // 全局订阅者只能设置一次
        assert!(try_init_logger().is_err());
        // 静默版本不会 panic
        init_logger();
    }
}
