//! 有效属性视图。
//!
//! # 教案式说明（Why）
//! - 覆盖表只保存显式设置的值；调用方却常常需要“组件支持的全部属性 + 当前取值”的完整视图；
//! - 视图在请求时构造，是一份独立快照，构造过程从不修改覆盖表。
//!
//! # 合并规则（How）
//! 1. 组件声明了非空描述符列表时：按声明顺序逐个放入 `(描述符, None)`，`None` 表示“使用默认值”；
//! 2. 将显式覆盖值套用到对应位置；
//! 3. 组件未声明但仍存在覆盖值的描述符（动态或已下线属性）追加在末尾，按名称排序；
//! 4. 组件未声明任何描述符时，视图即覆盖表本身的拷贝，同样按名称排序。

use std::collections::HashMap;

use crate::descriptor::PropertyDescriptor;

/// 某一时刻的有效属性快照。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EffectiveProperties {
    entries: Vec<(PropertyDescriptor, Option<String>)>,
}

impl EffectiveProperties {
    /// 按合并规则构造快照。
    ///
    /// - **输入 (What)**：`declared` 为组件当前声明的描述符；`overrides` 为覆盖表的一次性拷贝；
    /// - **后置条件**：声明列表中的重复描述符只保留第一次出现的位置。
    pub(crate) fn merge(
        declared: Vec<PropertyDescriptor>,
        mut overrides: HashMap<PropertyDescriptor, String>,
    ) -> Self {
        let mut entries = Vec::with_capacity(declared.len() + overrides.len());
        let mut seen = std::collections::HashSet::with_capacity(declared.len());
        for descriptor in declared {
            if !seen.insert(descriptor.clone()) {
                continue;
            }
            let value = overrides.remove(&descriptor);
            entries.push((descriptor, value));
        }

        let mut orphans: Vec<_> = overrides
            .into_iter()
            .map(|(descriptor, value)| (descriptor, Some(value)))
            .collect();
        orphans.sort_by(|a, b| a.0.cmp(&b.0));
        entries.extend(orphans);

        Self { entries }
    }

    /// 按属性名查询：外层 `None` 表示视图中没有该属性，内层 `None` 表示使用默认值。
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(descriptor, _)| descriptor.name() == name)
            .map(|(_, value)| value.as_deref())
    }

    pub fn value_of(&self, descriptor: &PropertyDescriptor) -> Option<Option<&str>> {
        self.get(descriptor.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyDescriptor, Option<&str>)> {
        self.entries
            .iter()
            .map(|(descriptor, value)| (descriptor, value.as_deref()))
    }

    /// 只返回带有显式覆盖值的条目。
    pub fn overrides(&self) -> impl Iterator<Item = (&PropertyDescriptor, &str)> {
        self.entries
            .iter()
            .filter_map(|(descriptor, value)| value.as_deref().map(|v| (descriptor, v)))
    }

    /// 以“有效值”解读：覆盖值优先，其次是描述符默认值。
    pub fn resolved(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(descriptor, _)| descriptor.name() == name)
            .and_then(|(descriptor, value)| value.as_deref().or(descriptor.default_value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for EffectiveProperties {
    type Item = (PropertyDescriptor, Option<String>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str) -> PropertyDescriptor {
        PropertyDescriptor::builder(name).build().unwrap()
    }

    #[test]
    fn declared_order_then_sorted_orphans() {
        let declared = vec![descriptor("b"), descriptor("a")];
        let overrides = HashMap::from([
            (descriptor("a"), "1".to_owned()),
            (descriptor("z"), "26".to_owned()),
            (descriptor("m"), "13".to_owned()),
        ]);

        let view = EffectiveProperties::merge(declared, overrides);
        let names: Vec<_> = view.iter().map(|(d, _)| d.name().to_owned()).collect();
        assert_eq!(names, ["b", "a", "m", "z"]);
        assert_eq!(view.get("b"), Some(None));
        assert_eq!(view.get("a"), Some(Some("1")));
        assert_eq!(view.get("missing"), None);
    }

    #[test]
    fn empty_declaration_is_plain_copy() {
        let overrides = HashMap::from([(descriptor("k"), "v".to_owned())]);
        let view = EffectiveProperties::merge(Vec::new(), overrides);
        assert_eq!(view.len(), 1);
        assert_eq!(view.overrides().count(), 1);
    }

    #[test]
    fn resolved_falls_back_to_default() {
        let with_default = PropertyDescriptor::builder("retries")
            .default_value("3")
            .build()
            .unwrap();
        let view = EffectiveProperties::merge(vec![with_default], HashMap::new());
        assert_eq!(view.resolved("retries"), Some("3"));
        assert_eq!(view.get("retries"), Some(None));
    }

    #[test]
    fn duplicate_declarations_keep_first_position() {
        let declared = vec![descriptor("x"), descriptor("y"), descriptor("x")];
        let view = EffectiveProperties::merge(declared, HashMap::new());
        assert_eq!(view.len(), 2);
    }
}
