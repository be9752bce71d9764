//! Menu Context - Errors

use thiserror::Error;

use super::DynamicId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("菜单节点不存在: {0}")]
    NodeNotFound(DynamicId),

    #[error("无效的移动: {0}")]
    InvalidMove(String),

    #[error("无效的标题: {0}")]
    InvalidTitle(String),
}
