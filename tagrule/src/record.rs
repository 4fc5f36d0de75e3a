use crate::value::FieldValue;

/// 可被验证的记录
///
/// 通常通过 `#[derive(Record)]` 生成：每个字段对应一个 [`RecordField`]，
/// 顺序与字段声明顺序一致，规则列表来自字段上的 `#[validate_as("...")]`。
///
/// ```rust,ignore
/// #[derive(Record)]
/// struct Service {
///     #[validate_as("name")]
///     name: String,
///
///     #[validate_as("skip_nil, short_text")]
///     description: Option<String>,
/// }
/// ```
///
/// 也可以手动实现：
///
/// ```
/// use tagrule::{AsFieldValue, Record, RecordField};
///
/// struct Login {
///     user: String,
///     password: String,
/// }
///
/// impl Record for Login {
///     fn fields(&self) -> Vec<RecordField<'_>> {
///         vec![
///             RecordField::new("user", "username", self.user.as_field_value()),
///             RecordField::opaque("password"),
///         ]
///     }
/// }
/// ```
pub trait Record {
    fn fields(&self) -> Vec<RecordField<'_>>;
}

/// 字段描述：字段名、原始规则列表以及当前值
#[derive(Debug, Clone)]
pub struct RecordField<'a> {
    name: &'a str,
    rules: &'a str,
    value: Option<FieldValue<'a>>,
}

impl<'a> RecordField<'a> {
    pub fn new(name: &'a str, rules: &'a str, value: FieldValue<'a>) -> Self {
        Self {
            name,
            rules,
            value: Some(value),
        }
    }

    /// 不可读取的字段，验证时会被静默跳过
    pub fn opaque(name: &'a str) -> Self {
        Self {
            name,
            rules: "",
            value: None,
        }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn rules(&self) -> &'a str {
        self.rules
    }

    pub fn value(&self) -> Option<FieldValue<'a>> {
        self.value
    }

    /// 按逗号拆分并去除空白后的规则名，保持声明顺序
    ///
    /// 规则列表为空白时不产生任何规则名。
    pub fn rule_tokens(&self) -> impl Iterator<Item = &'a str> {
        let rules = self.rules.trim();
        rules
            .split(',')
            .map(str::trim)
            .filter(move |_| !rules.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_tokens_trimmed_in_order() {
        let field = RecordField::new("bar", " rule1,rule2 ,  rule3 ", FieldValue::Text("x"));
        let tokens: Vec<_> = field.rule_tokens().collect();
        assert_eq!(tokens, vec!["rule1", "rule2", "rule3"]);
    }

    #[test]
    fn test_blank_rules_have_no_tokens() {
        let field = RecordField::new("bar", "   ", FieldValue::Text("x"));
        assert_eq!(field.rule_tokens().count(), 0);

        let field = RecordField::opaque("secret");
        assert!(field.value().is_none());
        assert_eq!(field.rule_tokens().count(), 0);
    }
}
