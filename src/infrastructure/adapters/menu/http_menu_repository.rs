//! HTTP Menu Repository - 通过 AuthHttpClient 读写菜单项
//!
//! 后端 API:
//! GET  menus/{menu_id}/items?locale=en   -> { data: [FlatMenuNode] }
//! PUT  menus/{menu_id}/items             <- { locale, items: [MenuItemPayload] }

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::application::ports::{MenuRepositoryPort, RemoteError};
use crate::domain::menu::{FlatMenuNode, MenuItemPayload};
use crate::infrastructure::http::{AuthHttpClient, RequestConfig};

#[derive(Debug, Serialize)]
struct SaveMenuBody<'a> {
    locale: &'a str,
    items: &'a [MenuItemPayload],
}

/// 基于 HTTP 的菜单仓储
pub struct HttpMenuRepository {
    client: Arc<AuthHttpClient>,
}

impl HttpMenuRepository {
    pub fn new(client: Arc<AuthHttpClient>) -> Self {
        Self { client }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn items_path(menu_id: i64) -> String {
        format!("menus/{}/items", menu_id)
    }
}

#[async_trait]
impl MenuRepositoryPort for HttpMenuRepository {
    async fn fetch_items(&self, menu_id: i64, locale: &str) -> Result<Vec<FlatMenuNode>, RemoteError> {
        let config = RequestConfig::new().with_query("locale", locale);
        let items: Vec<FlatMenuNode> = self
            .client
            .fetch_data(&Self::items_path(menu_id), &config)
            .await?;

        tracing::debug!(menu_id, locale, count = items.len(), "Menu items fetched");
        Ok(items)
    }

    async fn save_items(
        &self,
        menu_id: i64,
        locale: &str,
        items: &[MenuItemPayload],
    ) -> Result<(), RemoteError> {
        let body = SaveMenuBody { locale, items };
        self.client.put(&Self::items_path(menu_id), &body).await?;

        tracing::info!(menu_id, locale, roots = items.len(), "Menu saved");
        Ok(())
    }
}
