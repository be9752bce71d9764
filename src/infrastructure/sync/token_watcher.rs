//! Token Watcher - 采用共享存储中其它客户端写入的令牌

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::ports::TokenStorePort;
use crate::infrastructure::http::AuthHttpClient;

/// 启动同步任务
///
/// 每次收到变更通知都重新读取存储，而不是直接使用通知里的值，
/// 这样积压的旧通知不会覆盖更新的令牌。
pub fn spawn_token_sync(
    client: Arc<AuthHttpClient>,
    store: Arc<dyn TokenStorePort>,
    mut updates: mpsc::Receiver<Option<String>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("Token sync started");
        while updates.recv().await.is_some() {
            match store.load() {
                Ok(tokens) => client.adopt_tokens(tokens),
                Err(e) => tracing::warn!(error = %e, "Failed to read shared session tokens"),
            }
        }
        tracing::debug!("Token sync stopped");
    })
}
