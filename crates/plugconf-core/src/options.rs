//! 存储运行选项。
//!
//! # 教案式说明
//! - **意图 (Why)**：默认对变更锁无限等待；部分宿主希望以有界等待换取可预期的尾延迟，
//!   因此把等待上限作为显式选项暴露；
//! - **非选项**：通知钩子的 panic 总是被捕获并按钩子失败处理，不提供关闭开关；
//! - **契约 (What)**：派生 `serde`，宿主可以用自己的格式 crate 反序列化；缺省字段回落到
//!   [`StoreOptions::default`]，即无限等待。

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct StoreOptions {
    /// 获取变更锁的等待上限（毫秒）；`None` 表示无限等待。
    pub lock_timeout_ms: Option<u64>,
}

impl StoreOptions {
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_ms.map(Duration::from_millis)
    }
}
