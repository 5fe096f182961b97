#![cfg(feature = "fmt-subscriber")]

//! 日志装配入口的集成测试。
//!
//! 全局 Subscriber 是进程级状态，因此整个流程放在独立测试二进制的单个测试中完成。

use std::sync::Arc;

use plugconf_core::observability::{InstallError, install_fmt_subscriber};
use plugconf_core::test_stubs::{HookBehavior, RecordingComponent};
use plugconf_core::{AlwaysModifiable, ComponentConfiguration, PropertyDescriptor};

#[test]
fn second_install_is_refused_and_events_flow() {
    install_fmt_subscriber().expect("首次安装应成功");

    let again = install_fmt_subscriber().unwrap_err();
    assert!(
        matches!(again, InstallError::SubscriberAlreadySet),
        "已存在全局 Subscriber 时必须拒绝覆盖"
    );
    assert_eq!(
        again.to_string(),
        "a global tracing subscriber is already installed"
    );

    let component = Arc::new(RecordingComponent::new([PropertyDescriptor::builder("a")
        .build()
        .expect("valid descriptor")]));
    component.set_behavior(HookBehavior::Fail("sink offline".to_owned()));
    let config = ComponentConfiguration::new("logged", component, Arc::new(AlwaysModifiable))
        .expect("valid identifier");
    config.set_property("a", "1").expect("变更应成功");
    assert_eq!(config.notification_failures(), 1);
}
