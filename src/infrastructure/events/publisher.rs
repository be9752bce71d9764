//! Session Event Publisher Implementation
//!
//! 基于 broadcast channel 的会话事件推送

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{SessionEvent, SessionEventPort};

/// 事件发布器
pub struct SessionEventPublisher {
    channel: broadcast::Sender<SessionEvent>,
}

impl SessionEventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.channel.subscribe()
    }
}

impl Default for SessionEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEventPort for SessionEventPublisher {
    fn publish(&self, event: SessionEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(
                error = %e,
                "Failed to publish session event (no receivers)"
            );
        }
    }
}
