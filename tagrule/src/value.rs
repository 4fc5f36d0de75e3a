//! 字段值模型
//!
//! 规则函数接收的不是任意类型，而是 [`FieldValue`]：文本、记录、以及作为扩展槽的
//! `Any`，每种都有一个可为空的 `Optional*` 形式。只有 `Optional*` 形式可以进行
//! `not_nil` / `skip_nil` 检查。

use crate::record::Record;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;

/// 从记录字段中读出的值
#[derive(Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    OptionalText(Option<&'a str>),
    Record(&'a (dyn Record + 'a)),
    OptionalRecord(Option<&'a (dyn Record + 'a)>),
    Any(&'a dyn Any),
    OptionalAny(Option<&'a dyn Any>),
}

impl<'a> FieldValue<'a> {
    /// 空值检查
    ///
    /// 返回 `None` 表示该值不可为空，对它做空值检查属于 schema 错误。
    pub fn is_nil(&self) -> Option<bool> {
        match self {
            FieldValue::OptionalText(v) => Some(v.is_none()),
            FieldValue::OptionalRecord(v) => Some(v.is_none()),
            FieldValue::OptionalAny(v) => Some(v.is_none()),
            FieldValue::Text(_) | FieldValue::Record(_) | FieldValue::Any(_) => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nil().is_some()
    }

    /// 解引用后的嵌套记录；空值和非记录值返回 `None`
    pub fn as_record(&self) -> Option<&'a (dyn Record + 'a)> {
        match *self {
            FieldValue::Record(r) | FieldValue::OptionalRecord(Some(r)) => Some(r),
            _ => None,
        }
    }

    /// 直接文本或可选文本中的内容
    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            FieldValue::Text(s) | FieldValue::OptionalText(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// 扩展槽中的具体类型
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        match *self {
            FieldValue::Any(v) | FieldValue::OptionalAny(Some(v)) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// 转成对应的可选形式（已是可选形式则不变）
    pub fn into_optional(self) -> Self {
        match self {
            FieldValue::Text(s) => FieldValue::OptionalText(Some(s)),
            FieldValue::Record(r) => FieldValue::OptionalRecord(Some(r)),
            FieldValue::Any(v) => FieldValue::OptionalAny(Some(v)),
            other => other,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "Text",
            FieldValue::OptionalText(_) => "OptionalText",
            FieldValue::Record(_) => "Record",
            FieldValue::OptionalRecord(_) => "OptionalRecord",
            FieldValue::Any(_) => "Any",
            FieldValue::OptionalAny(_) => "OptionalAny",
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            FieldValue::OptionalText(s) => f.debug_tuple("OptionalText").field(s).finish(),
            other => match other.is_nil() {
                Some(true) => write!(f, "{}(None)", other.kind()),
                _ => write!(f, "{}(..)", other.kind()),
            },
        }
    }
}

/// 把 Rust 字段转换为 [`FieldValue`]
///
/// `#[derive(Record)]` 为记录类型自动实现此 trait；自定义类型可以手动实现，
/// 通常返回 `FieldValue::Any(self)`。
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;

    /// 该类型包在 `Option` 中且为 `None` 时的表示
    fn nil_value() -> FieldValue<'static> {
        FieldValue::OptionalAny(None)
    }
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }

    fn nil_value() -> FieldValue<'static> {
        FieldValue::OptionalText(None)
    }
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self.as_str())
    }

    fn nil_value() -> FieldValue<'static> {
        FieldValue::OptionalText(None)
    }
}

impl AsFieldValue for Cow<'_, str> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self.as_ref())
    }

    fn nil_value() -> FieldValue<'static> {
        FieldValue::OptionalText(None)
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for &T {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }

    fn nil_value() -> FieldValue<'static> {
        T::nil_value()
    }
}

impl<T: AsFieldValue + ?Sized> AsFieldValue for Box<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        (**self).as_field_value()
    }

    fn nil_value() -> FieldValue<'static> {
        T::nil_value()
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.as_field_value().into_optional(),
            None => T::nil_value(),
        }
    }

    fn nil_value() -> FieldValue<'static> {
        T::nil_value()
    }
}

macro_rules! impl_any_field_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsFieldValue for $ty {
                fn as_field_value(&self) -> FieldValue<'_> {
                    FieldValue::Any(self)
                }
            }
        )*
    };
}

impl_any_field_value!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_keeps_inner_kind() {
        let missing: Option<String> = None;
        assert!(matches!(missing.as_field_value(), FieldValue::OptionalText(None)));

        let present = Some("hello".to_string());
        assert_eq!(present.as_field_value().as_text(), Some("hello"));
        assert_eq!(present.as_field_value().is_nil(), Some(false));

        let port: Option<u16> = None;
        assert_eq!(port.as_field_value().is_nil(), Some(true));
    }

    #[test]
    fn test_direct_values_are_not_nullable() {
        let s = String::from("x");
        assert_eq!(s.as_field_value().is_nil(), None);
        assert!(!8080u16.as_field_value().is_nullable());
        assert!(Box::new(s).as_field_value().as_text().is_some());
    }

    #[test]
    fn test_wrapped_option_keeps_inner_kind() {
        struct Owner;

        impl crate::record::Record for Owner {
            fn fields(&self) -> Vec<crate::record::RecordField<'_>> {
                Vec::new()
            }
        }

        impl AsFieldValue for Owner {
            fn as_field_value(&self) -> FieldValue<'_> {
                FieldValue::Record(self)
            }

            fn nil_value() -> FieldValue<'static> {
                FieldValue::OptionalRecord(None)
            }
        }

        let owner: Option<Box<Owner>> = None;
        assert!(matches!(owner.as_field_value(), FieldValue::OptionalRecord(None)));
        let owner = Some(Box::new(Owner));
        assert!(matches!(owner.as_field_value(), FieldValue::OptionalRecord(Some(_))));

        let name: Option<&str> = None;
        assert!(matches!(name.as_field_value(), FieldValue::OptionalText(None)));
        let name: Option<Box<str>> = None;
        assert!(matches!(name.as_field_value(), FieldValue::OptionalText(None)));
        let name: Option<&String> = None;
        assert!(matches!(name.as_field_value(), FieldValue::OptionalText(None)));
        assert_eq!(Some("x").as_field_value().as_text(), Some("x"));
    }

    #[test]
    fn test_downcast_scalar() {
        let port = Some(8080u16);
        let value = port.as_field_value();
        assert_eq!(value.downcast_ref::<u16>(), Some(&8080));
        assert_eq!(value.downcast_ref::<u32>(), None);
    }
}
