use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{ConfigError, Result};

/// 单个可配置属性的规范描述符。
///
/// ## 设计目的（Why）
/// - 由被包装组件提供，作为覆盖表的键；存储本身从不凭空创造描述符；
/// - 携带展示名、默认值、是否必填、是否动态等元数据，供有效属性视图与上层 UI 使用。
///
/// ## 契约定义（What）
/// - 相等、排序与哈希**只看 `name`**：元数据演进不会让同名描述符在映射中分裂成两个键；
/// - `name` 非空，由 [`PropertyDescriptorBuilder::build`] 保证。
///
/// ## 设计权衡（Trade-offs）
/// - `name` 使用 `Arc<str>`，克隆描述符时只增加引用计数，适合在快照中大量复制。
#[derive(Clone, Debug)]
pub struct PropertyDescriptor {
    name: Arc<str>,
    display_name: String,
    description: String,
    default_value: Option<String>,
    required: bool,
    dynamic: bool,
    allowable_values: Vec<String>,
}

impl PropertyDescriptor {
    /// 以属性名开始构造描述符。
    pub fn builder(name: impl Into<String>) -> PropertyDescriptorBuilder {
        PropertyDescriptorBuilder::new(name)
    }

    /// 为用户自定义的动态属性构造可选描述符。
    pub fn dynamic(name: impl Into<String>) -> Result<Self> {
        Self::builder(name).dynamic(true).build()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// 必填属性的覆盖值可以被替换，但不能被移除。
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    #[inline]
    pub fn allowable_values(&self) -> &[String] {
        &self.allowable_values
    }
}

impl PartialEq for PropertyDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyDescriptor {}

impl Hash for PropertyDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

// 与 `Hash`/`Eq` 一致，允许覆盖表按 `&str` 直接查询。
impl Borrow<str> for PropertyDescriptor {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl PartialOrd for PropertyDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PropertyDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// [`PropertyDescriptor`] 的链式构造器。
///
/// - **输入 (What)**：除 `name` 外的字段均可选；`display_name` 缺省时回退为 `name`；
/// - **输出 (What)**：`build` 在 `name` 为空时返回 [`ConfigError::InvalidArgument`]。
#[derive(Clone, Debug)]
pub struct PropertyDescriptorBuilder {
    name: String,
    display_name: Option<String>,
    description: String,
    default_value: Option<String>,
    required: bool,
    dynamic: bool,
    allowable_values: Vec<String>,
}

impl PropertyDescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: String::new(),
            default_value: None,
            required: false,
            dynamic: false,
            allowable_values: Vec::new(),
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn allowable_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.allowable_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<PropertyDescriptor> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidArgument {
                what: "property descriptor name",
            });
        }
        let display_name = self.display_name.unwrap_or_else(|| self.name.clone());
        Ok(PropertyDescriptor {
            name: Arc::from(self.name),
            display_name,
            description: self.description,
            default_value: self.default_value,
            required: self.required,
            dynamic: self.dynamic,
            allowable_values: self.allowable_values,
        })
    }
}
