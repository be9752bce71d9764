//! Menu Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::MenuRepositoryPort;
use crate::application::queries::GetMenuTree;
use crate::domain::menu::MenuTree;

/// GetMenuTree Handler
pub struct GetMenuTreeHandler {
    menu_repo: Arc<dyn MenuRepositoryPort>,
}

impl GetMenuTreeHandler {
    pub fn new(menu_repo: Arc<dyn MenuRepositoryPort>) -> Self {
        Self { menu_repo }
    }

    pub async fn handle(&self, query: GetMenuTree) -> Result<MenuTree, ApplicationError> {
        let flat = self
            .menu_repo
            .fetch_items(query.menu_id, &query.locale)
            .await?;

        let tree = MenuTree::from_flat(query.menu_id, query.locale, &flat);
        tracing::info!(
            menu_id = query.menu_id,
            locale = %tree.locale(),
            items = tree.node_count(),
            "Menu tree loaded"
        );
        Ok(tree)
    }

    /// 切换语言：丢弃当前树，按新语言重新读取
    pub async fn reload(&self, tree: &mut MenuTree, locale: &str) -> Result<(), ApplicationError> {
        let menu_id = tree
            .menu_id()
            .ok_or_else(|| ApplicationError::validation("Menu has no id yet"))?;

        let flat = self.menu_repo.fetch_items(menu_id, locale).await?;
        tree.reload(locale, &flat);

        tracing::info!(menu_id, locale, items = tree.node_count(), "Menu tree reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::SaveMenuHandler;
    use crate::application::commands::SaveMenu;
    use crate::application::ports::RemoteError;
    use crate::domain::menu::{
        DynamicId, FlatMenuNode, MenuItemPayload, MenuLink, MenuNodeDraft, MoveRequest,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeMenuRepository {
        saved: Mutex<Vec<(i64, String, Vec<MenuItemPayload>)>>,
    }

    #[async_trait]
    impl MenuRepositoryPort for FakeMenuRepository {
        async fn fetch_items(&self, menu_id: i64, locale: &str) -> Result<Vec<FlatMenuNode>, RemoteError> {
            if menu_id != 5 {
                return Err(RemoteError::Failed("not found".to_string()));
            }
            let suffix = if locale == "de" { " (de)" } else { "" };
            Ok(vec![
                FlatMenuNode::new(1, None, 1, format!("Home{}", suffix)),
                FlatMenuNode::new(2, Some(1), 2, format!("News{}", suffix)),
            ])
        }

        async fn save_items(
            &self,
            menu_id: i64,
            locale: &str,
            items: &[MenuItemPayload],
        ) -> Result<(), RemoteError> {
            self.saved
                .lock()
                .unwrap()
                .push((menu_id, locale.to_string(), items.to_vec()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_edit_save_roundtrip() {
        let repo = Arc::new(FakeMenuRepository::default());
        let query_handler = GetMenuTreeHandler::new(repo.clone());
        let save_handler = SaveMenuHandler::new(repo.clone());

        let mut tree = query_handler.handle(GetMenuTree::new(5, "en")).await.unwrap();
        assert_eq!(tree.node_count(), 2);

        let contact = tree.append(MenuNodeDraft::new("Contact", MenuLink::custom("/contact")));
        tree.move_node(MoveRequest::onto(contact, DynamicId::new(1)))
            .unwrap();

        save_handler
            .handle(SaveMenu::from_tree(&tree).unwrap())
            .await
            .unwrap();

        let saved = repo.saved.lock().unwrap();
        let (menu_id, locale, items) = &saved[0];
        assert_eq!(*menu_id, 5);
        assert_eq!(locale, "en");
        assert_eq!(items.len(), 1);
        let children = items[0].children.as_ref().unwrap();
        assert_eq!(children[0].title, "Contact");
        assert_eq!(children[1].title, "News");
    }

    #[tokio::test]
    async fn test_reload_switches_locale() {
        let repo = Arc::new(FakeMenuRepository::default());
        let handler = GetMenuTreeHandler::new(repo);

        let mut tree = handler.handle(GetMenuTree::new(5, "en")).await.unwrap();
        handler.reload(&mut tree, "de").await.unwrap();

        assert_eq!(tree.locale(), "de");
        assert_eq!(tree.nodes()[0].title, "Home (de)");
        assert_eq!(tree.nodes()[0].dynamic_id, DynamicId::new(3));
    }

    #[tokio::test]
    async fn test_unknown_menu_is_external_error() {
        let handler = GetMenuTreeHandler::new(Arc::new(FakeMenuRepository::default()));
        let err = handler.handle(GetMenuTree::new(9, "en")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
    }
}
