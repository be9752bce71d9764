//! Menu Command Handlers

use std::sync::Arc;

use crate::application::commands::SaveMenu;
use crate::application::error::ApplicationError;
use crate::application::ports::MenuRepositoryPort;
use crate::domain::menu::MenuTree;

// ============================================================================
// SaveMenu
// ============================================================================

/// SaveMenu Handler
pub struct SaveMenuHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl SaveMenuHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, command: SaveMenu) -> Result<(), ApplicationError> {
        self.menu_repo
            .save_items(command.menu_id, &command.locale, &command.items)
            .await?;

        tracing::info!(
            menu_id = command.menu_id,
            locale = %command.locale,
            "Menu save completed"
        );
        Ok(())
    }

    /// 保存编辑中的菜单树，成功后清除未保存标记
    pub async fn save_tree(&self, tree: &mut MenuTree) -> Result<(), ApplicationError> {
        self.handle(SaveMenu::from_tree(tree)?).await?;
        tree.mark_saved();
        Ok(())
    }
}
