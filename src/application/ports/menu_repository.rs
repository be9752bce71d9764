//! Menu Repository Port - 菜单项的读取与保存

use async_trait::async_trait;

use super::RemoteError;
use crate::domain::menu::{FlatMenuNode, MenuItemPayload};

#[async_trait]
pub trait MenuRepositoryPort: Send + Sync {
    /// 读取某个菜单在指定语言下的扁平列表
    async fn fetch_items(&self, menu_id: i64, locale: &str) -> Result<Vec<FlatMenuNode>, RemoteError>;

    /// 整体保存菜单树
    async fn save_items(
        &self,
        menu_id: i64,
        locale: &str,
        items: &[MenuItemPayload],
    ) -> Result<(), RemoteError>;
}
