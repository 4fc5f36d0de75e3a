//! 内置规则
//!
//! 这些函数本身不会注册到验证器中，调用方用闭包提供固定参数后自行注册：
//!
//! ```
//! use tagrule::{rules, Validator};
//!
//! let mut validator = Validator::new();
//! validator.register("shortstr", |v| rules::validate_string_length(v, 1, 10));
//! validator.register("arch", rules::one_of(&["x86", "x86_64"]));
//! ```

use crate::error::RuleError;
use crate::value::FieldValue;
use regex::Regex;

/// 取出字段中的文本，字段可以是 `String` 也可以是 `Option<String>`
pub fn text<'a>(value: &FieldValue<'a>) -> Result<&'a str, RuleError> {
    value.as_text().ok_or(RuleError::InvalidType)
}

/// 验证字符串长度（按 Unicode 码点计数，闭区间）
pub fn validate_string_length(
    value: &FieldValue<'_>,
    min: usize,
    max: usize,
) -> Result<(), RuleError> {
    check_length(text(value)?, min, max)
}

/// 验证去除首尾空白后的字符串长度
pub fn validate_string_length_trimmed(
    value: &FieldValue<'_>,
    min: usize,
    max: usize,
) -> Result<(), RuleError> {
    check_length(text(value)?.trim(), min, max)
}

fn check_length(s: &str, min: usize, max: usize) -> Result<(), RuleError> {
    let count = s.chars().count();
    if count < min || count > max {
        return Err(RuleError::InvalidLength);
    }
    Ok(())
}

/// 验证字符串与候选值之一完全相同（区分大小写）
pub fn validate_string_exact<S: AsRef<str>>(
    value: &FieldValue<'_>,
    allowed: &[S],
) -> Result<(), RuleError> {
    let s = text(value)?;
    if allowed.iter().any(|candidate| candidate.as_ref() == s) {
        Ok(())
    } else {
        Err(RuleError::NoMatch)
    }
}

/// 验证字符串匹配正则表达式
pub fn validate_string_pattern(value: &FieldValue<'_>, pattern: &Regex) -> Result<(), RuleError> {
    if pattern.is_match(text(value)?) {
        Ok(())
    } else {
        Err(RuleError::PatternMismatch)
    }
}

/// `validate_string_length` 的规则工厂
pub fn length(
    min: usize,
    max: usize,
) -> impl Fn(&FieldValue<'_>) -> Result<(), RuleError> + Send + Sync + 'static {
    move |value| validate_string_length(value, min, max)
}

/// `validate_string_length_trimmed` 的规则工厂
pub fn length_trimmed(
    min: usize,
    max: usize,
) -> impl Fn(&FieldValue<'_>) -> Result<(), RuleError> + Send + Sync + 'static {
    move |value| validate_string_length_trimmed(value, min, max)
}

/// `validate_string_exact` 的规则工厂
pub fn one_of(
    allowed: &[&str],
) -> impl Fn(&FieldValue<'_>) -> Result<(), RuleError> + Send + Sync + 'static {
    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    move |value| validate_string_exact(value, allowed.as_slice())
}

/// `validate_string_pattern` 的规则工厂
pub fn pattern(
    regex: Regex,
) -> impl Fn(&FieldValue<'_>) -> Result<(), RuleError> + Send + Sync + 'static {
    move |value| validate_string_pattern(value, &regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AsFieldValue;

    #[test]
    fn test_text_accepts_both_forms() {
        let direct = String::from("hello");
        let optional = Some(String::from("hello"));
        assert_eq!(text(&direct.as_field_value()), Ok("hello"));
        assert_eq!(text(&optional.as_field_value()), Ok("hello"));
    }

    #[test]
    fn test_text_rejects_other_shapes() {
        assert_eq!(text(&42u32.as_field_value()), Err(RuleError::InvalidType));

        let missing: Option<String> = None;
        assert_eq!(text(&missing.as_field_value()), Err(RuleError::InvalidType));
    }

    #[test]
    fn test_length_counts_code_points() {
        // 5 个码点，15 个字节
        let s = String::from("你好世界！");
        assert!(validate_string_length(&s.as_field_value(), 1, 5).is_ok());
        assert_eq!(
            validate_string_length(&s.as_field_value(), 1, 4),
            Err(RuleError::InvalidLength)
        );
    }

    #[test]
    fn test_length_bounds_inclusive() {
        let hello = String::from("hello");
        assert!(validate_string_length(&hello.as_field_value(), 5, 5).is_ok());

        let fox = Some(String::from("The quick brown fox"));
        assert_eq!(
            validate_string_length(&fox.as_field_value(), 1, 10),
            Err(RuleError::InvalidLength)
        );

        let empty = String::new();
        assert!(validate_string_length(&empty.as_field_value(), 0, 3).is_ok());
        assert!(validate_string_length(&empty.as_field_value(), 1, 3).is_err());
    }

    #[test]
    fn test_length_trimmed() {
        let padded = String::from("   abc   ");
        assert!(validate_string_length_trimmed(&padded.as_field_value(), 1, 3).is_ok());
        assert!(validate_string_length(&padded.as_field_value(), 1, 3).is_err());

        let blank = String::from("    ");
        assert!(validate_string_length_trimmed(&blank.as_field_value(), 1, 3).is_err());
    }

    #[test]
    fn test_exact_match() {
        let allowed = ["x86", "x86_64"];
        for ok in ["x86", "x86_64"] {
            assert!(validate_string_exact(&FieldValue::Text(ok), &allowed).is_ok());
        }
        assert_eq!(
            validate_string_exact(&FieldValue::Text("amd64"), &allowed),
            Err(RuleError::NoMatch)
        );
        assert!(validate_string_exact(&FieldValue::Text("X86"), &allowed).is_err());
        let none: [&str; 0] = [];
        assert!(validate_string_exact(&FieldValue::Text("x86"), &none).is_err());
    }

    #[test]
    fn test_pattern() {
        let rule = pattern(Regex::new(r"^[a-z][a-z0-9-]*$").unwrap());
        assert!(rule(&FieldValue::Text("api-gateway")).is_ok());
        assert_eq!(
            rule(&FieldValue::Text("Api Gateway")),
            Err(RuleError::PatternMismatch)
        );
    }

    #[test]
    fn test_factories() {
        let short = length(1, 3);
        assert!(short(&FieldValue::Text("abc")).is_ok());
        assert!(short(&FieldValue::Text("abcd")).is_err());

        let trimmed = length_trimmed(1, 3);
        assert!(trimmed(&FieldValue::Text(" abc ")).is_ok());

        let arch = one_of(&["arm64"]);
        assert!(arch(&FieldValue::OptionalText(Some("arm64"))).is_ok());
        assert_eq!(arch(&FieldValue::Text("ARM64")), Err(RuleError::NoMatch));
        assert_eq!(arch(&FieldValue::Any(&1u8)), Err(RuleError::InvalidType));
    }
}
