//! Persistence Layer - 数据持久化
//!
//! 会话令牌的 Sled 存储

pub mod sled;

pub use self::sled::{SledTokenStore, SledTokenStoreConfig};
