//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为配置存储对外暴露的失败语义提供集中定义，让调用方能够区分“因被禁止而什么都没发生”与“成功”；
//! - 通知钩子的失败**不在**此处建模：它们在钩子调用点被吞掉，只通过日志与计数器暴露。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，可直接交给 `anyhow`/`eyre` 等上层框架；
//! - [`ConfigError::code`] 返回稳定的点分错误码，便于告警维度聚合。

use std::time::Duration;

use thiserror::Error;

/// 配置存储统一的 `Result` 别名。
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

/// 可修改性闸门拒绝变更时返回的错误。
///
/// # 教案式说明
/// - **意图 (Why)**：闸门实现并不知道自己守护的是哪个组件，因此只携带拒绝原因；
///   存储在持锁路径上捕获后再补齐组件标识，转换为 [`ConfigError::NotModifiable`]。
/// - **契约 (What)**：`reason` 需为人类可读文本，例如 `"component is running"`。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("configuration is not modifiable: {reason}")]
pub struct NotModifiable {
    reason: String,
}

impl NotModifiable {
    /// 以拒绝原因构造错误。
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// 返回拒绝原因。
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// 配置存储错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：聚合变更路径上的所有可恢复失败，取代“吞掉异常、静默返回”的做法，
///   让调用方与测试可以观察到“被禁止”“未知属性”等结果。
/// - **契约 (What)**：
///   - 所有变体均为 `Send + Sync + 'static`，可安全跨线程传播；
///   - 任何返回错误的变更操作都保证存储状态未被修改。
/// - **设计权衡 (Trade-offs)**：上下文字段使用 `String` 保存，牺牲少量分配换取易读的诊断信息。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// 调用方传入了缺失或空白的必要参数。
    ///
    /// - **契约 (What)**：`what` 描述被拒绝的参数，例如 `"property name"`；
    /// - **风险 (Trade-offs)**：属于调用方契约违约，而非存储状态问题，通常不应重试。
    #[error("invalid argument: {what} must not be empty")]
    InvalidArgument { what: &'static str },

    /// 可修改性闸门拒绝了本次变更。
    ///
    /// - **意图 (Why)**：组件处于运行等状态时禁止修改配置；
    /// - **契约 (What)**：`component_id` 为被拒绝的组件，`reason` 来自闸门。
    #[error("component `{component_id}` is not modifiable: {reason}")]
    NotModifiable {
        component_id: String,
        reason: String,
    },

    /// 属性名无法解析为组件支持的描述符。
    #[error("component `{component_id}` does not support property `{name}`")]
    UnknownProperty { component_id: String, name: String },

    /// 在配置的等待上限内未能获取变更锁。
    ///
    /// - **契约 (What)**：仅在 [`StoreOptions::lock_timeout_ms`](crate::StoreOptions) 设置时出现；
    ///   `waited` 为实际等待上限。
    #[error("component `{component_id}` mutation lock not acquired within {waited:?}")]
    LockTimeout {
        component_id: String,
        waited: Duration,
    },
}

/// [`ConfigError`] 的稳定分类，便于在不匹配上下文字段的情况下分支处理。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ConfigErrorKind {
    InvalidArgument,
    NotModifiable,
    UnknownProperty,
    LockTimeout,
}

impl ConfigError {
    /// 返回错误分类。
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            Self::InvalidArgument { .. } => ConfigErrorKind::InvalidArgument,
            Self::NotModifiable { .. } => ConfigErrorKind::NotModifiable,
            Self::UnknownProperty { .. } => ConfigErrorKind::UnknownProperty,
            Self::LockTimeout { .. } => ConfigErrorKind::LockTimeout,
        }
    }

    /// 返回稳定的点分错误码。
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ConfigErrorKind::InvalidArgument => "plugconf.invalid_argument",
            ConfigErrorKind::NotModifiable => "plugconf.not_modifiable",
            ConfigErrorKind::UnknownProperty => "plugconf.unknown_property",
            ConfigErrorKind::LockTimeout => "plugconf.lock_timeout",
        }
    }

    /// 为闸门拒绝附加组件标识。
    pub(crate) fn not_modifiable(component_id: &str, rejection: NotModifiable) -> Self {
        Self::NotModifiable {
            component_id: component_id.to_owned(),
            reason: rejection.reason,
        }
    }

    pub(crate) fn unknown_property(component_id: &str, name: &str) -> Self {
        Self::UnknownProperty {
            component_id: component_id.to_owned(),
            name: name.to_owned(),
        }
    }
}
