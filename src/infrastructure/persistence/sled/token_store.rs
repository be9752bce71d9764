//! Sled-based Session Token Store
//!
//! 同一个 Db 的多个句柄共享令牌，`watch_access_token` 可感知其它句柄的写入

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::ports::{TokenStoreError, TokenStorePort};
use crate::domain::session::SessionTokens;

const ACCESS_TOKEN_KEY: &str = "session:access_token";
const REFRESH_TOKEN_KEY: &str = "session:refresh_token";

/// Sled 令牌存储配置
#[derive(Debug, Clone)]
pub struct SledTokenStoreConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledTokenStoreConfig {
    fn default() -> Self {
        Self {
            db_path: "data/session.sled".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    value: String,
    updated_at: DateTime<Utc>,
}

/// Sled 令牌存储
pub struct SledTokenStore {
    db: Db,
}

impl SledTokenStore {
    pub fn new(config: &SledTokenStoreConfig) -> Result<Self, TokenStoreError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            has_session = db.contains_key(ACCESS_TOKEN_KEY).unwrap_or(false),
            "SledTokenStore initialized"
        );

        Ok(Self { db })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TokenStoreError> {
        let config = SledTokenStoreConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 共享同一个数据库的新句柄
    pub fn share(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }

    /// 监听 access token 的写入和删除
    ///
    /// sled 的订阅是阻塞迭代器，放在独立线程里转发到 channel。
    pub fn watch_access_token(&self) -> Result<mpsc::Receiver<Option<String>>, TokenStoreError> {
        let subscriber = self.db.watch_prefix(ACCESS_TOKEN_KEY);
        let (tx, rx) = mpsc::channel(16);

        std::thread::Builder::new()
            .name("token-watch".to_string())
            .spawn(move || {
                for event in subscriber {
                    let token = match event {
                        sled::Event::Insert { value, .. } => {
                            match bincode::deserialize::<StoredToken>(&value) {
                                Ok(stored) => Some(stored.value),
                                Err(e) => {
                                    tracing::warn!(error = %e, "Ignoring undecodable token update");
                                    continue;
                                }
                            }
                        }
                        sled::Event::Remove { .. } => None,
                    };
                    if tx.blocking_send(token).is_err() {
                        break;
                    }
                }
                tracing::debug!("Token watch thread stopped");
            })
            .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;

        Ok(rx)
    }

    pub fn flush(&self) -> Result<(), TokenStoreError> {
        self.db
            .flush()
            .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// 访问令牌最后一次写入的时间
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, TokenStoreError> {
        Ok(self
            .read_stored(ACCESS_TOKEN_KEY)?
            .map(|stored| stored.updated_at))
    }

    fn read(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        Ok(self.read_stored(key)?.map(|stored| stored.value))
    }

    fn read_stored(&self, key: &str) -> Result<Option<StoredToken>, TokenStoreError> {
        match self.db.get(key) {
            Ok(Some(data)) => {
                let stored: StoredToken = bincode::deserialize(&data)
                    .map_err(|e| TokenStoreError::SerializationError(e.to_string()))?;
                Ok(Some(stored))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(TokenStoreError::DatabaseError(e.to_string())),
        }
    }

    fn write(&self, key: &str, value: Option<&str>) -> Result<(), TokenStoreError> {
        match value {
            Some(value) => {
                let stored = StoredToken {
                    value: value.to_string(),
                    updated_at: Utc::now(),
                };
                let bytes = bincode::serialize(&stored)
                    .map_err(|e| TokenStoreError::SerializationError(e.to_string()))?;
                self.db
                    .insert(key, bytes)
                    .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;
            }
            None => {
                self.db
                    .remove(key)
                    .map_err(|e| TokenStoreError::DatabaseError(e.to_string()))?;
            }
        }
        Ok(())
    }
}

impl TokenStorePort for SledTokenStore {
    fn load(&self) -> Result<SessionTokens, TokenStoreError> {
        Ok(SessionTokens {
            access_token: self.read(ACCESS_TOKEN_KEY)?,
            refresh_token: self.read(REFRESH_TOKEN_KEY)?,
        })
    }

    fn save(&self, tokens: &SessionTokens) -> Result<(), TokenStoreError> {
        // refresh token 先落盘，监听 access token 的一方读到的总是完整的一对
        self.write(REFRESH_TOKEN_KEY, tokens.refresh_token.as_deref())?;
        self.write(ACCESS_TOKEN_KEY, tokens.access_token.as_deref())?;

        tracing::debug!(
            has_access_token = tokens.access_token.is_some(),
            "Session tokens persisted"
        );
        Ok(())
    }
}
