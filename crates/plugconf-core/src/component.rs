//! 被包装组件需要向配置存储提供的能力契约。
//!
//! # 教案式说明（Why）
//! - 描述符目录与解析逻辑归组件所有，存储只负责串行化变更并在值改变时回调组件；
//! - 通过 trait 对象持有组件，使存储可以独立于具体组件类型进行测试与组合。
//!
//! # 契约定义（What）
//! - 实现必须为 `Send + Sync`：同一组件可能被多个存储实例共享，并在不同线程上被解析与通知；
//! - [`ConfigurableComponent::on_property_modified`] 返回的错误被存储视为“尽力而为”的失败，
//!   只记录日志，不会回滚已生效的变更，也不会传播给调用方。

use std::any;

use thiserror::Error;

use crate::descriptor::PropertyDescriptor;

/// 通知钩子报告的失败。
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("property change notification failed: {message}")]
pub struct NotificationError {
    message: String,
}

impl NotificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 描述符解析器：可插拔组件向配置存储暴露的能力。
///
/// # 契约说明
/// - `property_descriptor`：未知名称返回 `None`，存储据此报告 `UnknownProperty`；
///   动态属性组件可为任意名称返回 [`PropertyDescriptor::dynamic`]。
/// - `property_descriptors`：返回组件支持的全部描述符，**顺序即有效属性视图的顺序**；
///   允许返回空列表，表示组件不声明静态描述符。
/// - `on_property_modified`：在存储持有变更锁期间被调用，`old`/`new` 为 `None` 表示“不存在”。
///   钩子可以在同一线程上重入读取或修改同一存储（变更锁可重入），但不应长时间阻塞。
pub trait ConfigurableComponent: Send + Sync {
    fn property_descriptor(&self, name: &str) -> Option<PropertyDescriptor>;

    fn property_descriptors(&self) -> Vec<PropertyDescriptor>;

    fn on_property_modified(
        &self,
        descriptor: &PropertyDescriptor,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), NotificationError>;

    /// 组件的结构化类型名，作为存储展示名称的初始值。
    ///
    /// 默认取实现类型路径的最后一段，例如 `my_crate::KafkaSink` → `KafkaSink`。
    fn component_type(&self) -> &str {
        short_type_name(any::type_name::<Self>())
    }
}

fn short_type_name(full: &str) -> &str {
    // 泛型参数中同样包含 `::`，先截掉 `<...>` 再取最后一段。
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name("a::b::KafkaSink"), "KafkaSink");
        assert_eq!(short_type_name("a::Wrapper<b::Inner>"), "Wrapper");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
