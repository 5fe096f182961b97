//! 校验结果类型。
//!
//! 存储自身始终报告“有效”，真正的规则评估由组件或宿主系统负责；本模块只定义
//! 结果的承载结构，使 `validation_errors` 的返回类型与宿主的校验管线保持一致。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 针对单个主题（通常是属性名）的一次校验结论。
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ValidationResult {
    pub subject: String,
    pub input: Option<String>,
    pub explanation: String,
    pub valid: bool,
}

impl ValidationResult {
    pub fn valid(subject: impl Into<String>, input: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            input,
            explanation: String::new(),
            valid: true,
        }
    }

    pub fn invalid(
        subject: impl Into<String>,
        input: Option<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            input,
            explanation: explanation.into(),
            valid: false,
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = self.input.as_deref().unwrap_or("<unset>");
        if self.valid {
            write!(f, "'{}' validated against '{}' is valid", self.subject, input)
        } else {
            write!(
                f,
                "'{}' validated against '{}' is invalid because {}",
                self.subject, input, self.explanation
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_result_explains_itself() {
        let result = ValidationResult::invalid("port", Some("-1".to_owned()), "must be positive");
        assert!(!result.valid);
        assert_eq!(
            result.to_string(),
            "'port' validated against '-1' is invalid because must be positive"
        );
    }
}
