use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// 验证器配置
///
/// 可以直接构造，也可以从 TOML 加载：
///
/// ```toml
/// strict = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// 每次验证前先检查所有规则名是否已注册（默认：false）
    pub strict: bool,
}

impl ValidatorConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置严格模式
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 从 TOML 文件加载
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!("Loaded validator config from {}", path.display());
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str() {
        let config = ValidatorConfig::from_toml_str("strict = true").unwrap();
        assert!(config.strict);

        let config = ValidatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = ValidatorConfig::from_toml_str("strict = \"maybe\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = ValidatorConfig::from_file("/nonexistent/tagrule.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
