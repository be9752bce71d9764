//! Sync - 多个客户端之间的令牌同步

mod token_watcher;

pub use token_watcher::spawn_token_sync;
