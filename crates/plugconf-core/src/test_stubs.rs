//! 记录型组件桩。
//!
//! # 设计定位（Why）
//! - 存储的单元测试、集成测试与文档示例都需要一个满足 [`ConfigurableComponent`] 的组件，
//!   并需要断言“通知被调用了几次、参数是什么”；集中实现避免在各测试文件里重复定义；
//! - 通过 [`HookBehavior`] 切换钩子行为，覆盖失败、panic、阻塞等“尽力而为”路径。
//!
//! # 契约说明（What）
//! - 仅用于测试与示例；生产代码不应依赖。

use std::sync::mpsc;

use parking_lot::Mutex;

use crate::component::{ConfigurableComponent, NotificationError};
use crate::descriptor::PropertyDescriptor;

/// 一次被记录的通知调用。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedChange {
    pub property: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// 通知钩子的行为。
#[derive(Debug, Default)]
pub enum HookBehavior {
    #[default]
    Succeed,
    Fail(String),
    Panic,
    /// 进入钩子后先发送 `entered` 信号，再等待 `release` 信号才返回。
    Block {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    },
}

/// 记录每一次通知的组件桩。
#[derive(Debug, Default)]
pub struct RecordingComponent {
    declared: Vec<PropertyDescriptor>,
    accept_dynamic: bool,
    changes: Mutex<Vec<RecordedChange>>,
    behavior: Mutex<HookBehavior>,
}

impl RecordingComponent {
    pub fn new(declared: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        Self {
            declared: declared.into_iter().collect(),
            ..Self::default()
        }
    }

    /// 未声明的属性名也解析为动态描述符。
    pub fn accepting_dynamic(mut self) -> Self {
        self.accept_dynamic = true;
        self
    }

    pub fn set_behavior(&self, behavior: HookBehavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn changes(&self) -> Vec<RecordedChange> {
        self.changes.lock().clone()
    }

    pub fn change_count(&self) -> usize {
        self.changes.lock().len()
    }
}

impl ConfigurableComponent for RecordingComponent {
    fn property_descriptor(&self, name: &str) -> Option<PropertyDescriptor> {
        self.declared
            .iter()
            .find(|descriptor| descriptor.name() == name)
            .cloned()
            .or_else(|| {
                self.accept_dynamic
                    .then(|| PropertyDescriptor::dynamic(name).ok())
                    .flatten()
            })
    }

    fn property_descriptors(&self) -> Vec<PropertyDescriptor> {
        self.declared.clone()
    }

    fn on_property_modified(
        &self,
        descriptor: &PropertyDescriptor,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), NotificationError> {
        self.changes.lock().push(RecordedChange {
            property: descriptor.name().to_owned(),
            old: old.map(str::to_owned),
            new: new.map(str::to_owned),
        });

        let behavior = self.behavior.lock();
        match &*behavior {
            HookBehavior::Succeed => Ok(()),
            HookBehavior::Fail(message) => Err(NotificationError::new(message.clone())),
            HookBehavior::Panic => {
                drop(behavior);
                panic!("recording component asked to panic")
            }
            HookBehavior::Block { entered, release } => {
                // 信号通道断开时直接返回，避免测试线程永久挂起。
                let _ = entered.lock().send(());
                let _ = release.lock().recv();
                Ok(())
            }
        }
    }
}
