//! # ComponentConfiguration：组件配置存储
//!
//! ## 核心意图（Why）
//! - 为单个组件实例集中保存身份、展示名称、注解数据与属性覆盖值；
//! - 作为唯一的变更汇聚点：所有属性变更都在同一把锁内依次完成
//!   “闸门校验 → 描述符解析 → 覆盖表更新 → 变更通知”。
//!
//! ## 并发模型（How）
//! - 变更锁使用 `parking_lot::ReentrantMutex<()>`：同一时刻至多一个变更在途，
//!   而通知钩子可在同一线程上重入存储；
//! - 覆盖表使用 `DashMap`，读取不获取变更锁；读者只会观察到某个字段的写前或写后状态；
//! - 展示名称与注解数据各自使用 `ArcSwap`/`ArcSwapOption` 原子替换，与变更锁以及彼此之间均无顺序保证；
//! - 通知钩子在持锁期间执行，慢钩子会阻塞同实例上的其它写者。
//!
//! ## 行为契约（What）
//! - 闸门拒绝、未知属性、参数非法均以 [`ConfigError`] 返回，且保证状态未被修改；
//! - 钩子失败（含 panic）不回滚已生效的变更，也不返回给调用方：只记一条 `warn!` 并累加
//!   [`ComponentConfiguration::notification_failures`]，同时体现在 [`PropertyUpdate::notification`] 中。
//!
//! ## 风险提示（Trade-offs）
//! - 存储绝不应作为进程级共享状态使用；每个组件实例拥有各自的存储。

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, warn};

use crate::component::{ConfigurableComponent, NotificationError};
use crate::descriptor::PropertyDescriptor;
use crate::error::{ConfigError, Result};
use crate::gate::ModifiabilityGate;
use crate::options::StoreOptions;
use crate::snapshot::EffectiveProperties;
use crate::validation::ValidationResult;

/// 一次变更通知的投递结果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NotificationOutcome {
    /// 钩子正常返回。
    Delivered,
    /// 新旧值相同，未调用钩子。
    Skipped,
    /// 钩子返回错误或 panic；变更依然有效。
    Failed(NotificationError),
}

/// `set_property` 的成功结果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyUpdate {
    descriptor: PropertyDescriptor,
    previous: Option<String>,
    changed: bool,
    notification: NotificationOutcome,
}

impl PropertyUpdate {
    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    /// 写入前的覆盖值；新插入时为 `None`。
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn notification(&self) -> &NotificationOutcome {
        &self.notification
    }
}

/// 线程安全的组件配置存储。
///
/// # 教案式注释
/// - **意图 (Why)**：把组件配置的并发一致性问题收敛到一个类型内，组件本身只需实现
///   [`ConfigurableComponent`]，生命周期策略通过 [`ModifiabilityGate`] 注入；
/// - **契约 (What)**：
///   - `id` 构造后不再变化，并唯一决定相等性与哈希；
///   - 覆盖表从不保存“空值”，移除即删除条目；
///   - 每一次真实的值变化（旧值 ≠ 新值）恰好触发一次通知，且在释放变更锁之前完成；
/// - **风险 (Trade-offs)**：读取不加锁，读者与在途变更之间没有顺序保证。
pub struct ComponentConfiguration {
    id: Arc<str>,
    component: Arc<dyn ConfigurableComponent>,
    gate: Arc<dyn ModifiabilityGate>,
    name: ArcSwap<String>,
    annotation_data: ArcSwapOption<String>,
    mutation_lock: ReentrantMutex<()>,
    properties: DashMap<PropertyDescriptor, String>,
    options: StoreOptions,
    notification_failures: AtomicU64,
}

impl ComponentConfiguration {
    /// 以默认选项构造存储。
    ///
    /// - **前置条件**：`id` 非空，否则返回 [`ConfigError::InvalidArgument`]；
    /// - **后置条件**：展示名称初始化为组件的结构化类型名，注解数据为空，覆盖表为空。
    pub fn new(
        id: impl Into<String>,
        component: Arc<dyn ConfigurableComponent>,
        gate: Arc<dyn ModifiabilityGate>,
    ) -> Result<Self> {
        Self::with_options(id, component, gate, StoreOptions::default())
    }

    pub fn with_options(
        id: impl Into<String>,
        component: Arc<dyn ConfigurableComponent>,
        gate: Arc<dyn ModifiabilityGate>,
        options: StoreOptions,
    ) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ConfigError::InvalidArgument {
                what: "component identifier",
            });
        }
        let name = component.component_type().to_owned();
        Ok(Self {
            id: Arc::from(id),
            component,
            gate,
            name: ArcSwap::from_pointee(name),
            annotation_data: ArcSwapOption::empty(),
            mutation_lock: ReentrantMutex::new(()),
            properties: DashMap::new(),
            options,
            notification_failures: AtomicU64::new(0),
        })
    }

    #[inline]
    pub fn identifier(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Arc<String> {
        self.name.load_full()
    }

    /// 原子替换展示名称；不经过闸门，也不产生通知。
    pub fn set_name(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::InvalidArgument {
                what: "component name",
            });
        }
        self.name.store(Arc::new(name));
        Ok(())
    }

    pub fn annotation_data(&self) -> Option<Arc<String>> {
        self.annotation_data.load_full()
    }

    /// 原子替换注解数据，传入 `None` 清除。
    pub fn set_annotation_data(&self, data: Option<String>) {
        self.annotation_data.store(data.map(Arc::new));
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// 设置属性覆盖值。
    ///
    /// # 教案式说明
    /// - **流程 (How)**：
    ///   1. 校验参数（空属性名被拒绝）；
    ///   2. 获取变更锁，调用闸门；
    ///   3. 经组件解析描述符；
    ///   4. 插入或替换覆盖值，记录旧值；
    ///   5. 旧值与新值不同（不存在视为不同）时调用通知钩子。
    /// - **幂等性**：以相同值重复调用不会再次通知。
    pub fn set_property(&self, name: &str, value: impl Into<String>) -> Result<PropertyUpdate> {
        if name.is_empty() {
            return Err(ConfigError::InvalidArgument {
                what: "property name",
            });
        }
        let value = value.into();

        let _guard = self.lock_for_mutation()?;
        self.verify_modifiable()?;
        let descriptor = self.resolve(name)?;

        // 键与值在同一分片写锁内一起替换：读者看不到中间态，键也总是最新解析出的描述符。
        let previous = match self.properties.entry(descriptor.clone()) {
            Entry::Occupied(entry) => Some(entry.replace_entry(value.clone()).1),
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
                None
            }
        };
        let changed = previous.as_deref() != Some(value.as_str());
        let notification = if changed {
            self.notify(&descriptor, previous.as_deref(), Some(&value))
        } else {
            NotificationOutcome::Skipped
        };
        debug!(component_id = %self.id, property = %descriptor, changed, "property set");

        Ok(PropertyUpdate {
            descriptor,
            previous,
            changed,
            notification,
        })
    }

    /// 移除属性覆盖值。
    ///
    /// - **返回 (What)**：删除了已存在的覆盖值时返回 `true`；描述符为必填或本就没有覆盖值时返回 `false`；
    /// - **后置条件**：必填属性的覆盖值永远不会被移除，只能被替换。
    pub fn remove_property(&self, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(ConfigError::InvalidArgument {
                what: "property name",
            });
        }

        let _guard = self.lock_for_mutation()?;
        self.verify_modifiable()?;
        let descriptor = self.resolve(name)?;

        if descriptor.is_required() {
            debug!(component_id = %self.id, property = %descriptor, "required property kept");
            return Ok(false);
        }

        match self.properties.remove(&descriptor) {
            Some((_, previous)) => {
                self.notify(&descriptor, Some(&previous), None);
                debug!(component_id = %self.id, property = %descriptor, "property removed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// 直接查询覆盖表，不与组件声明的描述符合并。
    pub fn property(&self, descriptor: &PropertyDescriptor) -> Option<String> {
        self.property_by_name(descriptor.name())
    }

    pub fn property_by_name(&self, name: &str) -> Option<String> {
        self.properties.get(name).map(|entry| entry.value().clone())
    }

    /// 构造有效属性视图，规则见 [`EffectiveProperties`]。
    pub fn properties(&self) -> EffectiveProperties {
        let declared = self.component.property_descriptors();
        let overrides: HashMap<_, _> = self
            .properties
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        EffectiveProperties::merge(declared, overrides)
    }

    pub fn property_descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.component.property_descriptor(name)
    }

    pub fn property_descriptors(&self) -> Vec<PropertyDescriptor> {
        self.component.property_descriptors()
    }

    /// 直接转发给组件的通知钩子，不经过变更锁，也不吞掉错误。
    pub fn on_property_modified(
        &self,
        descriptor: &PropertyDescriptor,
        old: Option<&str>,
        new: Option<&str>,
    ) -> std::result::Result<(), NotificationError> {
        self.component.on_property_modified(descriptor, old, new)
    }

    /// 存储自身始终有效；真实校验由组件或宿主负责。
    pub fn is_valid(&self) -> bool {
        true
    }

    pub fn validation_errors(&self) -> Vec<ValidationResult> {
        Vec::new()
    }

    /// 被吞掉的通知失败次数。
    pub fn notification_failures(&self) -> u64 {
        self.notification_failures.load(Ordering::Relaxed)
    }

    fn lock_for_mutation(&self) -> Result<ReentrantMutexGuard<'_, ()>> {
        match self.options.lock_timeout() {
            None => Ok(self.mutation_lock.lock()),
            Some(waited) => self.mutation_lock.try_lock_for(waited).ok_or_else(|| {
                ConfigError::LockTimeout {
                    component_id: self.id.to_string(),
                    waited,
                }
            }),
        }
    }

    fn verify_modifiable(&self) -> Result<()> {
        self.gate.verify_modifiable().map_err(|rejection| {
            debug!(component_id = %self.id, reason = rejection.reason(), "mutation rejected by gate");
            ConfigError::not_modifiable(&self.id, rejection)
        })
    }

    fn resolve(&self, name: &str) -> Result<PropertyDescriptor> {
        self.component.property_descriptor(name).ok_or_else(|| {
            debug!(component_id = %self.id, property = name, "unknown property");
            ConfigError::unknown_property(&self.id, name)
        })
    }

    fn notify(
        &self,
        descriptor: &PropertyDescriptor,
        old: Option<&str>,
        new: Option<&str>,
    ) -> NotificationOutcome {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.component.on_property_modified(descriptor, old, new)
        }))
        .unwrap_or_else(|payload| Err(NotificationError::new(panic_message(payload.as_ref()))));

        match result {
            Ok(()) => NotificationOutcome::Delivered,
            Err(err) => {
                self.notification_failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    component_id = %self.id,
                    property = %descriptor,
                    error = %err,
                    "notification hook failed; change kept"
                );
                NotificationOutcome::Failed(err)
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("hook panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("hook panicked: {message}")
    } else {
        "hook panicked".to_owned()
    }
}

impl PartialEq for ComponentConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentConfiguration {}

impl Hash for ComponentConfiguration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ComponentConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.component.component_type(), self.id)
    }
}

impl fmt::Debug for ComponentConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentConfiguration")
            .field("id", &self.id)
            .field("name", &self.name.load())
            .field("overrides", &self.properties.len())
            .field("options", &self.options)
            .finish()
    }
}
