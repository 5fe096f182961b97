//! 日志输出装配。
//!
//! # 教案式说明
//! - **意图（Why）**：存储只产生 `tracing` 事件（变更、闸门拒绝、被吞掉的通知失败），是否以及如何输出
//!   由宿主决定；本模块为不想自行装配 Subscriber 的宿主与示例提供一键入口。
//! - **逻辑（How）**：组合 `registry + EnvFilter + fmt::layer`；`RUST_LOG` 未设置时默认 `info`。
//! - **契约（What）**：外部已设置全局 Subscriber 时返回 [`InstallError::SubscriberAlreadySet`]，不会覆盖。

use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("a global tracing subscriber is already installed")]
    SubscriberAlreadySet,
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 安装带环境变量过滤的格式化日志输出。
pub fn install_fmt_subscriber() -> Result<(), InstallError> {
    if dispatcher::has_been_set() {
        return Err(InstallError::SubscriberAlreadySet);
    }

    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
