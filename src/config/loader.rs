//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `CMSDESK_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `CMSDESK_API__BASE_URL=https://cms.example.com/api/`
/// - `CMSDESK_API__TIMEOUT_SECS=10`
/// - `CMSDESK_MENU__MENU_ID=5`
/// - `CMSDESK_AUTH__EMAIL=admin@example.com`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("api.base_url", "http://localhost:3000/api/")?
        .set_default("api.timeout_secs", 30)?
        .set_default("api.login_path", "auth/login")?
        .set_default("api.refresh_path", "auth/refresh-token")?
        .set_default("api.profile_path", "auth/profile")?
        .set_default("storage.token_db_path", "data/session.sled")?
        .set_default("menu.default_locale", "en")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("CMSDESK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "API base URL cannot be empty".to_string(),
        ));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "API timeout cannot be 0".to_string(),
        ));
    }

    if config.storage.token_db_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Token database path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("API Base URL: {}", config.api.base_url);
    tracing::info!("API Timeout: {}s", config.api.timeout_secs);
    tracing::info!("Token Database: {:?}", config.storage.token_db_path);
    tracing::info!("Default Locale: {}", config.menu.default_locale);
    if let Some(menu_id) = config.menu.menu_id {
        tracing::info!("Menu: {}", menu_id);
    }
    tracing::info!("Auto Login: {}", config.auth.credentials().is_some());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
