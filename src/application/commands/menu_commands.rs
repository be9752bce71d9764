//! Menu Commands

use crate::application::error::ApplicationError;
use crate::domain::menu::{MenuItemPayload, MenuTree};

/// 保存菜单命令（整棵树覆盖保存）
#[derive(Debug, Clone)]
pub struct SaveMenu {
    pub menu_id: i64,
    pub locale: String,
    pub items: Vec<MenuItemPayload>,
}

impl SaveMenu {
    /// 从编辑中的菜单树生成，尚未保存过的新菜单没有 menu_id
    pub fn from_tree(tree: &MenuTree) -> Result<Self, ApplicationError> {
        let menu_id = tree
            .menu_id()
            .ok_or_else(|| ApplicationError::validation("Menu has no id yet"))?;

        Ok(Self {
            menu_id,
            locale: tree.locale().to_string(),
            items: tree.to_payload(),
        })
    }
}
