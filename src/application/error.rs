//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{FieldError, RemoteError};
use crate::domain::menu::MenuError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 后端返回的字段级校验错误
    #[error("Validation failed with {} error(s)", .0.len())]
    FieldErrors(Vec<FieldError>),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 凭据或令牌被拒绝
    #[error("Unauthorized")]
    Unauthorized,

    /// 会话已结束，需要重新登录
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// 菜单编辑规则违反
    #[error(transparent)]
    Menu(#[from] MenuError),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 需要回到登录流程
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::SessionExpired(_))
    }
}

impl From<RemoteError> for ApplicationError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Validation(errors) => Self::FieldErrors(errors),
            RemoteError::Unauthorized => Self::Unauthorized,
            RemoteError::SessionExpired(reason) => Self::SessionExpired(reason),
            RemoteError::Failed(message) => Self::ExternalServiceError(message),
        }
    }
}
