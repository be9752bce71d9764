//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::session::Credentials;
use crate::infrastructure::http::AuthHttpClientConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 后端 API 配置
    #[serde(default)]
    pub api: ApiConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 菜单编辑配置
    #[serde(default)]
    pub menu: MenuConfig,

    /// 启动时自动登录使用的凭据
    #[serde(default)]
    pub auth: AuthConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 后端 API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    #[serde(default = "default_profile_path")]
    pub profile_path: String,
}

fn default_base_url() -> String {
    "http://localhost:3000/api/".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_login_path() -> String {
    "auth/login".to_string()
}

fn default_refresh_path() -> String {
    "auth/refresh-token".to_string()
}

fn default_profile_path() -> String {
    "auth/profile".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            profile_path: default_profile_path(),
        }
    }
}

impl ApiConfig {
    /// 转换为客户端配置
    pub fn client_config(&self) -> AuthHttpClientConfig {
        AuthHttpClientConfig {
            base_url: self.base_url.clone(),
            login_path: self.login_path.clone(),
            refresh_path: self.refresh_path.clone(),
            profile_path: self.profile_path.clone(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 令牌数据库路径
    #[serde(default = "default_token_db_path")]
    pub token_db_path: PathBuf,
}

fn default_token_db_path() -> PathBuf {
    PathBuf::from("data/session.sled")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_db_path: default_token_db_path(),
        }
    }
}

/// 菜单编辑配置
#[derive(Debug, Clone, Deserialize)]
pub struct MenuConfig {
    /// 默认编辑语言
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// 启动时加载的菜单
    #[serde(default)]
    pub menu_id: Option<i64>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            menu_id: None,
        }
    }
}

/// 登录凭据配置
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl AuthConfig {
    /// 邮箱和密码都配置时才返回凭据
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials::new(email, password)),
            _ => None,
        }
    }
}

// 不打印密码
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
