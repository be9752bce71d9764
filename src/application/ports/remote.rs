//! 远程调用的公共错误类型

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 422 响应中的单条校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }
}

/// 经由后端 API 的端口调用失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Remote call failed: {0}")]
    Failed(String),
}
