use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tagrule::{rules, LoggingConfig, Record, RuleError, Validator, ValidatorConfig};

// ==================== 配置定义 ====================

#[derive(Debug, Deserialize)]
struct DemoConfig {
    #[serde(default)]
    validator: ValidatorConfig,

    #[serde(default)]
    logging: LoggingConfig,

    service: ServiceConfig,
}

/// 服务配置 - 字段上的规则在加载后统一验证
#[derive(Debug, Deserialize, Record)]
struct ServiceConfig {
    #[validate_as("not_blank, name")]
    name: String,

    #[validate_as("arch")]
    arch: String,

    /// 可选描述，存在时不能超过 120 个字符
    #[validate_as("skip_nil, short_text")]
    description: Option<String>,

    #[validate_as("not_nil, _struct")]
    owner: Option<OwnerConfig>,

    #[validate_as("_struct")]
    listener: ListenerConfig,
}

#[derive(Debug, Deserialize, Record)]
struct OwnerConfig {
    #[validate_as("name")]
    name: String,

    #[validate_as("email")]
    email: String,
}

#[derive(Debug, Deserialize, Record)]
struct ListenerConfig {
    #[validate_as("port")]
    port: u16,
}

// ==================== 规则注册 ====================

fn build_validator(config: ValidatorConfig) -> Result<Validator> {
    let name = Regex::new(r"^[a-z][a-z0-9-]{0,31}$").context("Invalid name pattern")?;
    let email = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .context("Invalid email pattern")?;

    let mut validator = Validator::with_config(config);
    validator
        .register("not_blank", rules::length_trimmed(1, usize::MAX))
        .register("name", rules::pattern(name))
        .register("arch", rules::one_of(&["x86", "x86_64", "arm64"]))
        .register("short_text", rules::length(1, 120))
        .register("email", rules::pattern(email))
        .register("port", |value| match value.downcast_ref::<u16>() {
            Some(port) if *port >= 1024 => Ok(()),
            Some(port) => Err(format!("Port {} is privileged", port).into()),
            None => Err(RuleError::InvalidType),
        });

    Ok(validator)
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read '{}'", path))?;
    let config: DemoConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse '{}'", path))?;

    config.logging.clone().with_env_overrides().init()?;
    tracing::debug!("Loaded {:?}", config.service);

    let validator = build_validator(config.validator.clone())?;
    tracing::info!("Registered rules: {:?}", validator.rule_names());

    validator
        .validate(&config.service)
        .with_context(|| format!("Service '{}' failed validation", config.service.name))?;

    tracing::info!(
        "Service '{}' is valid ({} checked fields)",
        config.service.name,
        config.service.fields().len()
    );
    Ok(())
}
