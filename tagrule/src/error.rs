use std::fmt;
use thiserror::Error;

/// 规则函数返回的失败原因
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// 值既不是文本，也不是可选文本
    #[error("Invalid type")]
    InvalidType,

    #[error("Invalid length")]
    InvalidLength,

    #[error("String did not match any of the possible values")]
    NoMatch,

    #[error("String did not match the required pattern")]
    PatternMismatch,

    /// 自定义规则的任意描述
    #[error("{0}")]
    Message(String),
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<&str> for RuleError {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl From<String> for RuleError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

/// 字段上的一个规则引用，例如 `owner.email[email]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRef {
    pub field: String,
    pub rule: String,
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.field, self.rule)
    }
}

/// 验证错误
///
/// 每个变体的文本格式都是 `<字段>[<规则>]: <消息>`，调用方可以直接展示。
/// 嵌套记录（`_struct`）中的错误原样向外传递，不额外包装。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 规则名未注册
    #[error("{field}[{rule}]: Undefined validator {rule}")]
    UndefinedRule { field: String, rule: String },

    /// `not_nil` 遇到空值
    #[error("{field}[not_nil]: Value is nil.")]
    NilValue { field: String },

    /// 已注册的规则拒绝了字段值
    #[error("{field}[{rule}]: {source}")]
    RuleFailed {
        field: String,
        rule: String,
        #[source]
        source: RuleError,
    },

    /// 在不可为空的字段上使用了 `not_nil` / `skip_nil`
    #[error("{field}[{rule}]: Value is not nullable")]
    NotNullable { field: String, rule: String },

    /// 预检查发现的未注册规则
    #[error("Undefined validators: {}", join_refs(.0))]
    UndefinedRules(Vec<RuleRef>),
}

impl ValidationError {
    /// 出错的字段名（预检查错误返回第一个字段）
    pub fn field(&self) -> &str {
        match self {
            Self::UndefinedRule { field, .. }
            | Self::NilValue { field }
            | Self::RuleFailed { field, .. }
            | Self::NotNullable { field, .. } => field,
            Self::UndefinedRules(refs) => refs.first().map(|r| r.field.as_str()).unwrap_or(""),
        }
    }

    /// 出错的规则名
    pub fn rule(&self) -> &str {
        match self {
            Self::UndefinedRule { rule, .. }
            | Self::RuleFailed { rule, .. }
            | Self::NotNullable { rule, .. } => rule,
            Self::NilValue { .. } => crate::NOT_NIL,
            Self::UndefinedRules(refs) => refs.first().map(|r| r.rule.as_str()).unwrap_or(""),
        }
    }
}

fn join_refs(refs: &[RuleRef]) -> String {
    refs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// 配置与日志初始化错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_shapes() {
        let err = ValidationError::UndefinedRule {
            field: "Bar".to_string(),
            rule: "name".to_string(),
        };
        assert_eq!(err.to_string(), "Bar[name]: Undefined validator name");

        let err = ValidationError::NilValue {
            field: "Bar".to_string(),
        };
        assert_eq!(err.to_string(), "Bar[not_nil]: Value is nil.");
        assert_eq!(err.rule(), "not_nil");

        let err = ValidationError::RuleFailed {
            field: "Bar".to_string(),
            rule: "shortstr".to_string(),
            source: RuleError::InvalidLength,
        };
        assert_eq!(err.to_string(), "Bar[shortstr]: Invalid length");
        assert_eq!(err.field(), "Bar");
    }

    #[test]
    fn test_undefined_rules_lists_every_reference() {
        let err = ValidationError::UndefinedRules(vec![
            RuleRef {
                field: "name".to_string(),
                rule: "nmae".to_string(),
            },
            RuleRef {
                field: "owner.email".to_string(),
                rule: "mail".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Undefined validators: name[nmae], owner.email[mail]"
        );
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn test_rule_error_from_str() {
        assert_eq!(RuleError::from("fail").to_string(), "fail");
        assert_eq!(RuleError::new(String::from("x")), RuleError::Message("x".into()));
    }
}
