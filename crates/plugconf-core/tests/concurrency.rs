//! 并发场景测试。
//!
//! # 教案级导览
//!
//! - **Why**：存储的价值在于多线程下的一致性：并发写者不能丢失更新，读者不能看到撕裂的条目，
//!   闸门切换与变更交错时不能产生部分状态。
//! - **How**：使用 `std::thread` + `Arc` 构造真实竞争路径，以 `Barrier` 对齐起跑线。
//! - **What**：N 个不同属性名的并发写入全部可见且恰好 N 次通知；读写并发只观察到完整值；
//!   闸门翻转期间每次调用要么成功、要么以 `NotModifiable` 失败。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use plugconf_core::test_stubs::RecordingComponent;
use plugconf_core::{
    AlwaysModifiable, ComponentConfiguration, ConfigErrorKind, LifecycleGate, ScheduledState,
};

const WRITERS: usize = 16;

/// ## 测试一：并发写入不丢失
///
/// - **逻辑 (How)**：16 个线程各写一个不同的动态属性，随后断言覆盖表完整、通知次数恰为 16。
#[test]
fn concurrent_distinct_writes_are_all_applied() {
    let component = Arc::new(RecordingComponent::default().accepting_dynamic());
    let config = Arc::new(
        ComponentConfiguration::new("concurrent", component.clone(), Arc::new(AlwaysModifiable))
            .unwrap(),
    );
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let config = Arc::clone(&config);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                config
                    .set_property(&format!("prop.{i}"), format!("value-{i}"))
                    .expect("写入不应失败")
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("写线程不应 panic").is_changed());
    }

    let view = config.properties();
    assert_eq!(view.len(), WRITERS);
    for i in 0..WRITERS {
        assert_eq!(view.get(&format!("prop.{i}")), Some(Some(format!("value-{i}").as_str())));
    }
    assert_eq!(component.change_count(), WRITERS);
}

/// ## 测试二：读者只看到完整值
///
/// - **逻辑 (How)**：写者在两组长字符串之间来回切换同一属性，读者持续读取；
///   每次读到的值必须完整等于两组之一（或尚未写入时为空）。
#[test]
fn readers_never_observe_torn_values() {
    let component = Arc::new(RecordingComponent::default().accepting_dynamic());
    let config = Arc::new(
        ComponentConfiguration::new("readers", component, Arc::new(AlwaysModifiable)).unwrap(),
    );
    let left = "L".repeat(512);
    let right = "R".repeat(512);
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let config = Arc::clone(&config);
        let (left, right) = (left.clone(), right.clone());
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for round in 0..500 {
                let value = if round % 2 == 0 { &left } else { &right };
                config.set_property("payload", value.as_str()).unwrap();
            }
            done.store(true, Ordering::Release);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let config = Arc::clone(&config);
            let (left, right) = (left.clone(), right.clone());
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    if let Some(value) = config.property_by_name("payload") {
                        assert!(value == left || value == right, "读到撕裂值");
                    }
                    for (_, value) in config.properties().overrides() {
                        assert!(value == left || value == right, "快照包含撕裂值");
                    }
                    thread::yield_now();
                }
            })
        })
        .collect();

    writer.join().expect("写线程不应 panic");
    for reader in readers {
        reader.join().expect("读线程不应 panic");
    }
    assert_eq!(config.property_by_name("payload"), Some(right));
}

/// ## 测试三：闸门翻转期间无部分状态
///
/// - **意图 (Why)**：组件启停与配置写入可能来自不同线程；
/// - **契约 (What)**：每次写入要么成功并被通知，要么以 `NotModifiable` 失败且不留痕迹；
///   因此成功次数必须等于通知次数，也等于最终覆盖表大小。
#[test]
fn gate_flips_never_leave_partial_state() {
    let component = Arc::new(RecordingComponent::default().accepting_dynamic());
    let gate = Arc::new(LifecycleGate::default());
    let config = Arc::new(
        ComponentConfiguration::new("flipping", component.clone(), gate.clone()).unwrap(),
    );
    let stop = Arc::new(AtomicBool::new(false));

    let flipper = {
        let gate = Arc::clone(&gate);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut running = false;
            while !stop.load(Ordering::Acquire) {
                running = !running;
                gate.set_state(if running {
                    ScheduledState::Running
                } else {
                    ScheduledState::Stopped
                });
                thread::yield_now();
            }
        })
    };

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                let mut applied = 0usize;
                for i in 0..200 {
                    match config.set_property(&format!("w{w}.{i}"), "on") {
                        Ok(update) => {
                            assert!(update.is_changed());
                            applied += 1;
                        }
                        Err(err) => assert_eq!(err.kind(), ConfigErrorKind::NotModifiable),
                    }
                }
                applied
            })
        })
        .collect();

    let applied: usize = writers
        .into_iter()
        .map(|handle| handle.join().expect("写线程不应 panic"))
        .sum();
    stop.store(true, Ordering::Release);
    flipper.join().expect("翻转线程不应 panic");

    assert_eq!(component.change_count(), applied);
    assert_eq!(config.properties().len(), applied);
}

/// ## 测试四：名称与注解数据独立原子替换
#[test]
fn name_and_annotation_swaps_are_atomic() {
    let config = Arc::new(
        ComponentConfiguration::new(
            "metadata",
            Arc::new(RecordingComponent::default()),
            Arc::new(AlwaysModifiable),
        )
        .unwrap(),
    );
    let names = ["alpha".repeat(64), "omega".repeat(64)];

    let handles: Vec<_> = names
        .iter()
        .cloned()
        .map(|name| {
            let config = Arc::clone(&config);
            thread::spawn(move || {
                for _ in 0..200 {
                    config.set_name(name.clone()).unwrap();
                    config.set_annotation_data(Some(name.clone()));
                    let observed = config.name();
                    assert!(observed.starts_with("alpha") || observed.starts_with("omega"));
                    assert!(observed.len() == 320);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("线程不应 panic");
    }
    let final_name = config.name();
    assert!(names.iter().any(|name| name.as_str() == final_name.as_str()));
    assert!(config.annotation_data().is_some());
}
