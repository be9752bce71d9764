//! Session Events Port - 会话级事件通知
//!
//! 用于驱动整页错误状态、跳转登录页等全局反应

use serde::{Deserialize, Serialize};

/// 会话事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SessionEvent {
    /// 已登录状态下收到非 401/422 的错误响应
    SessionError {
        status: u16,
        path: String,
        message: String,
    },
    /// 令牌刷新成功
    TokensRefreshed,
    /// 刷新失败或主动登出，调用方应回到登录流程
    SessionEnded { reason: String },
}

/// Session Events Port
pub trait SessionEventPort: Send + Sync {
    fn publish(&self, event: SessionEvent);
}

/// 丢弃所有事件
pub struct NoopSessionEvents;

impl SessionEventPort for NoopSessionEvents {
    fn publish(&self, _event: SessionEvent) {}
}
