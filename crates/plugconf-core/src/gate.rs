//! # 可修改性闸门
//!
//! ## 核心意图（Why）
//! - 组件在运行期间通常禁止修改配置；闸门把“现在能否修改”的策略从存储中剥离出来，
//!   以注入的策略对象取代子类化，使存储保持可组合、可独立测试。
//!
//! ## 行为契约（What）
//! - 存储在**持有变更锁之后、触碰覆盖表之前**调用 [`ModifiabilityGate::verify_modifiable`]；
//! - 返回 `Err(NotModifiable)` 时整个变更中止，不产生任何部分状态。
//!
//! ## 提供的实现（How）
//! - [`AlwaysModifiable`]：永不拒绝；
//! - [`LifecycleGate`]：依据原子保存的 [`ScheduledState`] 判断，`Running` 时拒绝；
//! - 任意 `Fn() -> Result<(), NotModifiable>` 闭包。

use std::fmt;
//
// 教案级说明：启用 `--cfg loom` 时切换到 Loom 的原子类型，使模型检查能够穷举
// `set_state` 与 `verify_modifiable` 之间的所有调度交错。
#[cfg(any(loom, plugconf_loom))]
use loom::sync::atomic::{AtomicU8, Ordering};
#[cfg(not(any(loom, plugconf_loom)))]
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::NotModifiable;

/// 可修改性策略。
pub trait ModifiabilityGate: Send + Sync {
    /// 组件当前允许修改配置时返回 `Ok(())`，否则返回拒绝原因。
    fn verify_modifiable(&self) -> Result<(), NotModifiable>;
}

impl<F> ModifiabilityGate for F
where
    F: Fn() -> Result<(), NotModifiable> + Send + Sync,
{
    fn verify_modifiable(&self) -> Result<(), NotModifiable> {
        self()
    }
}

/// 永远允许修改的闸门，适用于没有生命周期约束的组件与测试。
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysModifiable;

impl ModifiabilityGate for AlwaysModifiable {
    fn verify_modifiable(&self) -> Result<(), NotModifiable> {
        Ok(())
    }
}

/// 组件的调度状态。
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum ScheduledState {
    Stopped = 0,
    Running = 1,
    Disabled = 2,
}

impl ScheduledState {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Disabled => "disabled",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::Disabled,
            _ => Self::Stopped,
        }
    }
}

impl fmt::Display for ScheduledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 基于调度状态的闸门：组件运行时拒绝配置变更。
///
/// # 教案式注释
/// - **意图 (Why)**：处理器与控制器服务在运行期间读取配置，此时修改会导致行为与配置不一致；
/// - **契约 (What)**：状态保存在 `AtomicU8` 中，[`Self::set_state`] 可从任意线程调用；
///   闸门检查与状态切换之间不存在额外同步，存储只保证检查发生在变更锁内；
/// - **风险 (Trade-offs)**：若调用方需要“检查后立即启动”的强一致性，应在自身的生命周期锁内
///   同时完成状态切换与配置写入。
#[derive(Debug)]
pub struct LifecycleGate {
    state: AtomicU8,
}

impl LifecycleGate {
    pub fn new(initial: ScheduledState) -> Self {
        Self {
            state: AtomicU8::new(initial as u8),
        }
    }

    pub fn state(&self) -> ScheduledState {
        ScheduledState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// 切换状态并返回旧状态。
    pub fn set_state(&self, next: ScheduledState) -> ScheduledState {
        ScheduledState::from_u8(self.state.swap(next as u8, Ordering::AcqRel))
    }
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self::new(ScheduledState::Stopped)
    }
}

impl ModifiabilityGate for LifecycleGate {
    fn verify_modifiable(&self) -> Result<(), NotModifiable> {
        match self.state() {
            ScheduledState::Running => Err(NotModifiable::new(format!(
                "component is {}",
                ScheduledState::Running
            ))),
            ScheduledState::Stopped | ScheduledState::Disabled => Ok(()),
        }
    }
}
