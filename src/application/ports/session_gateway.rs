//! Session Gateway Port - 登录、登出与当前用户

use async_trait::async_trait;

use super::RemoteError;
use crate::domain::session::{Credentials, Profile, TokenPair};

#[async_trait]
pub trait SessionGatewayPort: Send + Sync {
    /// 登录并保存令牌
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, RemoteError>;

    /// 清空内存和持久化存储中的令牌
    async fn logout(&self) -> Result<(), RemoteError>;

    /// 获取当前用户，成功后会话视为活跃
    async fn profile(&self) -> Result<Profile, RemoteError>;
}
