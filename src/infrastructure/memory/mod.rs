//! Memory Layer - In-Memory State
//!
//! 测试和无需持久化的场景下使用的令牌存储

mod token_store;

pub use token_store::InMemoryTokenStore;
