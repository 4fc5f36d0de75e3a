use crate::config::ValidatorConfig;
use crate::error::{RuleError, RuleRef, ValidationError, ValidationResult};
use crate::record::{Record, RecordField};
use crate::value::{AsFieldValue, FieldValue};
use crate::{NOT_NIL, RESERVED_RULES, SKIP_NIL, STRUCT};
use std::collections::HashMap;
use std::fmt;

/// 规则函数
pub type RuleFn = Box<dyn Fn(&FieldValue<'_>) -> Result<(), RuleError> + Send + Sync>;

/// 验证器
///
/// 持有规则名到规则函数的注册表。每个实例相互独立，没有全局单例。
/// 注册需要 `&mut self`；注册完成后可以在多个线程间共享 `&Validator` 进行验证。
pub struct Validator {
    rules: HashMap<String, RuleFn>,
    config: ValidatorConfig,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rule_names())
            .field("config", &self.config)
            .finish()
    }
}

impl Validator {
    /// 创建空的验证器
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// 使用指定配置创建空的验证器
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            rules: HashMap::new(),
            config,
        }
    }

    /// 当前配置
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// 注册规则，同名规则会被替换
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&FieldValue<'_>) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        let name = name.into();
        if RESERVED_RULES.contains(&name.as_str()) {
            tracing::warn!("Rule name '{}' is reserved, the registered rule will never run", name);
        }
        if self.rules.insert(name.clone(), Box::new(rule)).is_some() {
            tracing::debug!("Replaced validation rule '{}'", name);
        } else {
            tracing::trace!("Registered validation rule '{}'", name);
        }
        self
    }

    /// 规则名是否已注册
    pub fn is_registered(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// 已注册的规则名（按字母顺序）
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 验证一个值
    ///
    /// 记录（或 `Option` 中存在的记录）按字段逐个验证；其他任何值直接通过。
    /// 遇到第一个失败立即返回。
    pub fn validate<T: AsFieldValue + ?Sized>(&self, value: &T) -> ValidationResult<()> {
        let value = value.as_field_value();
        if self.config.strict {
            self.check_value(&value)?;
        }
        self.validate_value(&value)
    }

    /// 对已转换的字段值执行验证，不做严格模式预检查
    pub fn validate_value(&self, value: &FieldValue<'_>) -> ValidationResult<()> {
        let Some(record) = value.as_record() else {
            return Ok(());
        };
        self.validate_record(record)
    }

    fn validate_record(&self, record: &dyn Record) -> ValidationResult<()> {
        for field in record.fields() {
            self.validate_field(&field)?;
        }
        Ok(())
    }

    fn validate_field(&self, field: &RecordField<'_>) -> ValidationResult<()> {
        let Some(value) = field.value() else {
            return Ok(());
        };
        let name = field.name();

        for token in field.rule_tokens() {
            match token {
                STRUCT => self.validate_value(&value)?,
                NOT_NIL => {
                    if nil_check(name, token, &value)? {
                        tracing::debug!(field = name, rule = token, "Value is nil");
                        return Err(ValidationError::NilValue {
                            field: name.to_string(),
                        });
                    }
                }
                SKIP_NIL => {
                    if nil_check(name, token, &value)? {
                        return Ok(());
                    }
                }
                _ => {
                    let Some(rule) = self.rules.get(token) else {
                        return Err(ValidationError::UndefinedRule {
                            field: name.to_string(),
                            rule: token.to_string(),
                        });
                    };
                    tracing::trace!(field = name, rule = token, "Applying rule");
                    if let Err(source) = rule(&value) {
                        tracing::debug!(field = name, rule = token, error = %source, "Rule failed");
                        return Err(ValidationError::RuleFailed {
                            field: name.to_string(),
                            rule: token.to_string(),
                            source,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// 检查值中引用的所有规则名是否都已注册
    ///
    /// 会进入 `_struct` 指向的嵌套记录，字段名以 `.` 连接。
    /// 所有未注册的规则一次性以 [`ValidationError::UndefinedRules`] 返回。
    pub fn check<T: AsFieldValue + ?Sized>(&self, value: &T) -> ValidationResult<()> {
        self.check_value(&value.as_field_value())
    }

    fn check_value(&self, value: &FieldValue<'_>) -> ValidationResult<()> {
        let mut undefined = Vec::new();
        if let Some(record) = value.as_record() {
            self.collect_undefined(record, "", &mut undefined);
        }
        if undefined.is_empty() {
            return Ok(());
        }
        for r in &undefined {
            tracing::warn!("Undefined validation rule {}", r);
        }
        Err(ValidationError::UndefinedRules(undefined))
    }

    fn collect_undefined(&self, record: &dyn Record, prefix: &str, out: &mut Vec<RuleRef>) {
        for field in record.fields() {
            let Some(value) = field.value() else {
                continue;
            };
            let path = if prefix.is_empty() {
                field.name().to_string()
            } else {
                format!("{}.{}", prefix, field.name())
            };

            for token in field.rule_tokens() {
                match token {
                    STRUCT => {
                        if let Some(nested) = value.as_record() {
                            self.collect_undefined(nested, &path, out);
                        }
                    }
                    NOT_NIL | SKIP_NIL => {}
                    _ if self.is_registered(token) => {}
                    _ => out.push(RuleRef {
                        field: path.clone(),
                        rule: token.to_string(),
                    }),
                }
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn nil_check(field: &str, rule: &str, value: &FieldValue<'_>) -> ValidationResult<bool> {
    value.is_nil().ok_or_else(|| ValidationError::NotNullable {
        field: field.to_string(),
        rule: rule.to_string(),
    })
}
