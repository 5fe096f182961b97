#![deny(unsafe_code)]
#![doc = "plugconf-core: 可插拔组件的线程安全属性配置存储。"]
#![doc = ""]
#![doc = "== 并发模型 =="]
#![doc = "所有变更（`set_property`/`remove_property`）经由单个可重入互斥锁串行化，依次执行：可修改性闸门校验 → 描述符解析 → 覆盖表更新 → 变更通知。"]
#![doc = "读取路径（`property`/`properties`/`name`/`annotation_data`）从不获取变更锁，只依赖 `DashMap` 与 `ArcSwap` 自身的线程安全保证。"]
#![doc = ""]
#![doc = "== 通知锁内执行 =="]
#![doc = "通知钩子在持锁期间调用：一个缓慢或阻塞的钩子会拖住同一实例上的其它写者。这是为换取通知顺序与变更顺序一致而接受的代价；若未来需要解耦，可把通知移出锁外，但将失去顺序保证。"]

//! # plugconf-core
//!
//! ## 定位与职责（Why）
//! - 为运行时可配置的组件保存身份标识、展示名称、注解数据以及属性覆盖值；
//! - 以 [`ComponentConfiguration`] 作为唯一的变更汇聚点，确保“闸门 → 解析 → 写入 → 通知”顺序不被打乱。
//!
//! ## 架构嵌入（Where）
//! - [`component`]：被包装组件需要实现的能力契约（描述符解析与变更通知）；
//! - [`gate`]：可修改性闸门，决定组件当前是否接受配置变更；
//! - [`store`]：配置存储本体；
//! - [`snapshot`]：请求时构造的有效属性视图；
//! - [`error`]：结构化错误，区分“参数非法”“不可修改”“未知属性”。
//!
//! ## 快速上手（How）
//! ```
//! use std::sync::Arc;
//! use plugconf_core::{AlwaysModifiable, ComponentConfiguration, PropertyDescriptor};
//! use plugconf_core::test_stubs::RecordingComponent;
//!
//! let component = Arc::new(RecordingComponent::new([
//!     PropertyDescriptor::builder("batch.size").default_value("100").build()?,
//! ]));
//! let config = ComponentConfiguration::new("proc-1", component, Arc::new(AlwaysModifiable))?;
//! config.set_property("batch.size", "500")?;
//! assert_eq!(config.property_by_name("batch.size").as_deref(), Some("500"));
//! # Ok::<(), plugconf_core::ConfigError>(())
//! ```

pub mod component;
pub mod descriptor;
pub mod error;
pub mod gate;
#[cfg(feature = "fmt-subscriber")]
pub mod observability;
pub mod options;
pub mod snapshot;
pub mod store;
/// 测试桩命名空间，集中暴露记录型组件实现，供单元测试、集成测试与文档示例复用。
///
/// # 使用方式（How）
/// - 通过 `use plugconf_core::test_stubs::RecordingComponent;` 引入；
/// - 桩对象会记录每一次通知调用，并可配置为让通知失败或 panic，用于验证“尽力而为”的通知语义。
pub mod test_stubs;
pub mod validation;

pub use component::{ConfigurableComponent, NotificationError};
pub use descriptor::{PropertyDescriptor, PropertyDescriptorBuilder};
pub use error::{ConfigError, ConfigErrorKind, NotModifiable, Result};
pub use gate::{AlwaysModifiable, LifecycleGate, ModifiabilityGate, ScheduledState};
pub use options::StoreOptions;
pub use snapshot::EffectiveProperties;
pub use store::{ComponentConfiguration, NotificationOutcome, PropertyUpdate};
pub use validation::ValidationResult;
