//! In-Memory Token Store Implementation

use std::sync::{Arc, Mutex};

use crate::application::ports::{TokenStoreError, TokenStorePort};
use crate::domain::session::SessionTokens;

/// 内存令牌存储，进程退出即丢失
pub struct InMemoryTokenStore {
    tokens: Mutex<SessionTokens>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::with_tokens(SessionTokens::default())
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: Mutex::new(tokens),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 当前保存的令牌
    pub fn snapshot(&self) -> SessionTokens {
        self.tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStorePort for InMemoryTokenStore {
    fn load(&self) -> Result<SessionTokens, TokenStoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, tokens: &SessionTokens) -> Result<(), TokenStoreError> {
        *self
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = tokens.clone();
        tracing::debug!(has_access_token = tokens.access_token.is_some(), "Tokens saved in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::TokenPair;

    #[test]
    fn test_save_load_clear() {
        let store = InMemoryTokenStore::new();
        assert!(store.load().unwrap().is_empty());

        let tokens = SessionTokens::from(TokenPair::new("T1", "R1"));
        store.save(&tokens).unwrap();
        assert_eq!(store.load().unwrap(), tokens);

        store.clear().unwrap();
        assert!(store.snapshot().is_empty());
    }
}
