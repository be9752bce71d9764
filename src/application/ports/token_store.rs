//! Token Store Port - 令牌持久化
//!
//! 内存中的令牌会镜像到持久化存储，重启后可恢复会话

use thiserror::Error;

use crate::domain::session::SessionTokens;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Token Store Port
pub trait TokenStorePort: Send + Sync {
    /// 读取已保存的令牌，不存在时返回空的 SessionTokens
    fn load(&self) -> Result<SessionTokens, TokenStoreError>;

    /// 保存令牌；字段为 None 的令牌会被删除
    fn save(&self, tokens: &SessionTokens) -> Result<(), TokenStoreError>;

    /// 清空
    fn clear(&self) -> Result<(), TokenStoreError> {
        self.save(&SessionTokens::default())
    }
}
