//! tagrule - 基于字段注解的声明式验证
//!
//! 字段通过 `#[validate_as("rule1, rule2")]` 声明要执行的规则，规则按名称注册到
//! [`Validator`] 中，验证时按字段声明顺序和规则顺序执行，遇到第一个失败即返回。
//!
//! ```
//! use tagrule::{rules, Record, Validator};
//!
//! #[derive(Record)]
//! struct Platform {
//!     #[validate_as("arch")]
//!     arch: String,
//! }
//!
//! let mut validator = Validator::new();
//! validator.register("arch", rules::one_of(&["x86", "x86_64"]));
//!
//! assert!(validator.validate(&Platform { arch: "x86".into() }).is_ok());
//! let err = validator.validate(&Platform { arch: "amd64".into() }).unwrap_err();
//! assert_eq!(err.to_string(), "arch[arch]: String did not match any of the possible values");
//! ```
//!
//! `not_nil` 和 `skip_nil` 只能用在 `Option<_>` 字段上，否则无法编译：
//!
//! ```compile_fail
//! #[derive(tagrule::Record)]
//! struct Service {
//!     #[validate_as("not_nil")]
//!     name: String,
//! }
//! ```
//!
//! ```compile_fail
//! #[derive(tagrule::Record)]
//! struct Service {
//!     #[validate_as("skip_nil, short_text")]
//!     description: String,
//! }
//! ```
//!
//! ```
//! use tagrule::{Record, Validator};
//!
//! #[derive(Record)]
//! struct Service {
//!     #[validate_as("not_nil")]
//!     name: Option<String>,
//!
//!     #[validate_as("skip_nil, short_text")]
//!     description: Option<String>,
//! }
//!
//! let validator = Validator::new();
//! let service = Service { name: None, description: None };
//! let err = validator.validate(&service).unwrap_err();
//! assert_eq!(err.to_string(), "name[not_nil]: Value is nil.");
//!
//! let service = Service { name: Some("api".into()), description: None };
//! assert!(validator.validate(&service).is_ok());
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod rules;
pub mod validator;
pub mod value;

pub use config::ValidatorConfig;
pub use error::{ConfigError, RuleError, RuleRef, ValidationError, ValidationResult};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use record::{Record, RecordField};
pub use validator::{RuleFn, Validator};
pub use value::{AsFieldValue, FieldValue};

// 重新导出宏
pub use tagrule_macros::Record;

/// 递归验证嵌套记录
pub const STRUCT: &str = "_struct";
/// 要求可选字段有值
pub const NOT_NIL: &str = "not_nil";
/// 可选字段为空时跳过该字段剩余的规则
pub const SKIP_NIL: &str = "skip_nil";

/// 引擎自身解释、不在注册表中查找的规则名
pub const RESERVED_RULES: &[&str] = &[STRUCT, NOT_NIL, SKIP_NIL];
