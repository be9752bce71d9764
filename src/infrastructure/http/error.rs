//! HTTP 客户端错误定义

use thiserror::Error;

use crate::application::ports::{FieldError, RemoteError, TransportError};

/// 令牌刷新失败
///
/// 需要 Clone：同一个失败会分发给所有排队中的请求。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("No refresh token available")]
    MissingRefreshToken,

    #[error("Refresh rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Refresh request failed: {0}")]
    Transport(TransportError),

    #[error("Invalid refresh response: {0}")]
    InvalidResponse(String),

    #[error("Refresh was aborted before it settled")]
    Aborted,
}

/// AuthHttpClient 返回的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 没有拿到 HTTP 响应
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 422：字段级校验错误，原样返回 errors 数组
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// 刷新后仍然 401，或无需刷新的请求（登录）被拒绝
    #[error("Unauthorized")]
    Unauthorized,

    /// 令牌刷新失败，会话结束
    #[error("Session expired: {0}")]
    RefreshFailed(#[from] RefreshError),

    /// 其它 HTTP 错误状态
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// 响应体无法解析
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(_) => Some(422),
            ApiError::Unauthorized => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ApiError> for RemoteError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(errors) => RemoteError::Validation(errors),
            ApiError::Unauthorized => RemoteError::Unauthorized,
            ApiError::RefreshFailed(e) => RemoteError::SessionExpired(e.to_string()),
            other => RemoteError::Failed(other.to_string()),
        }
    }
}
