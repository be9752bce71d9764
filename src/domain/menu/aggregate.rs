//! Menu Context - Aggregate Root

use super::operations::{self, MoveRequest};
use super::{
    DynamicId, DynamicIdSequence, FlatMenuNode, MenuError, MenuItemPayload, MenuNode,
    MenuNodeDraft, MenuPatch,
};

/// 菜单编辑会话
///
/// 不变量:
/// - dynamic_id 由同一个发号器分配，重新加载（切换语言）后也不复用
/// - 任何失败的操作都不改变当前树
#[derive(Debug, Clone)]
pub struct MenuTree {
    menu_id: Option<i64>,
    locale: String,
    nodes: Vec<MenuNode>,
    ids: DynamicIdSequence,
    dirty: bool,
}

impl MenuTree {
    /// 创建空菜单
    pub fn new(menu_id: Option<i64>, locale: impl Into<String>) -> Self {
        Self {
            menu_id,
            locale: locale.into(),
            nodes: Vec::new(),
            ids: DynamicIdSequence::new(),
            dirty: false,
        }
    }

    /// 从后端的扁平列表构建
    pub fn from_flat(menu_id: i64, locale: impl Into<String>, flat: &[FlatMenuNode]) -> Self {
        let mut tree = Self::new(Some(menu_id), locale);
        tree.nodes = operations::hydrate(flat, &mut tree.ids);
        tree
    }

    /// 丢弃当前树并按新语言重新构建
    pub fn reload(&mut self, locale: impl Into<String>, flat: &[FlatMenuNode]) {
        self.locale = locale.into();
        self.nodes = operations::hydrate(flat, &mut self.ids);
        self.dirty = false;
    }

    pub fn append(&mut self, draft: MenuNodeDraft) -> DynamicId {
        let (nodes, id) = operations::append(&self.nodes, draft, &mut self.ids);
        self.nodes = nodes;
        self.dirty = true;
        tracing::debug!(dynamic_id = %id, "Menu item appended");
        id
    }

    /// 拖放移动，返回移动后的节点
    pub fn move_node(&mut self, request: MoveRequest) -> Result<MenuNode, MenuError> {
        let outcome = operations::move_node(&self.nodes, &request)?;
        self.nodes = outcome.tree;
        self.dirty = true;
        tracing::debug!(
            drag = %request.drag,
            drop = %request.drop,
            position = ?request.position,
            drop_to_gap = request.drop_to_gap,
            "Menu item moved"
        );
        Ok(outcome.moved)
    }

    pub fn edit(&mut self, id: DynamicId, patch: &MenuPatch) -> Result<(), MenuError> {
        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(MenuError::InvalidTitle("标题不能为空".to_string()));
            }
        }
        self.nodes = operations::edit(&self.nodes, id, patch)?;
        self.dirty = true;
        Ok(())
    }

    pub fn delete(&mut self, id: DynamicId) -> Result<(), MenuError> {
        self.nodes = operations::delete(&self.nodes, id)?;
        self.dirty = true;
        tracing::debug!(dynamic_id = %id, "Menu item deleted");
        Ok(())
    }

    /// 生成保存用的结构
    pub fn to_payload(&self) -> Vec<MenuItemPayload> {
        operations::flatten(&self.nodes)
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // Getters
    pub fn menu_id(&self) -> Option<i64> {
        self.menu_id
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn nodes(&self) -> &[MenuNode] {
        &self.nodes
    }

    pub fn find(&self, id: DynamicId) -> Option<&MenuNode> {
        operations::find_node(&self.nodes, id)
    }

    pub fn node_count(&self) -> usize {
        operations::node_count(&self.nodes)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::menu::MenuLink;

    fn rows() -> Vec<FlatMenuNode> {
        vec![
            FlatMenuNode::new(1, None, 1, "Home"),
            FlatMenuNode::new(2, Some(1), 2, "News"),
            FlatMenuNode::new(3, None, 1, "Shop"),
        ]
    }

    #[test]
    fn test_menu_tree_editing_session() {
        let mut tree = MenuTree::from_flat(5, "en", &rows());
        assert_eq!(tree.node_count(), 3);
        assert!(!tree.is_dirty());

        let id = tree.append(MenuNodeDraft::new("Contact", MenuLink::custom("/contact")));
        assert_eq!(id, DynamicId::new(4));
        assert!(tree.is_dirty());

        let moved = tree.move_node(MoveRequest::onto(id, DynamicId::new(3))).unwrap();
        assert_eq!(moved.parent, Some(DynamicId::new(3)));

        tree.delete(DynamicId::new(1)).unwrap();
        assert_eq!(tree.node_count(), 2);

        tree.mark_saved();
        assert!(!tree.is_dirty());
    }

    #[test]
    fn test_failed_operation_keeps_tree() {
        let mut tree = MenuTree::from_flat(5, "en", &rows());
        let before = tree.nodes().to_vec();

        assert!(tree.delete(DynamicId::new(99)).is_err());
        assert!(tree
            .move_node(MoveRequest::onto(DynamicId::new(1), DynamicId::new(2)))
            .is_err());
        assert!(tree
            .edit(DynamicId::new(1), &MenuPatch::new().title("  "))
            .is_err());

        assert_eq!(tree.nodes(), before.as_slice());
        assert!(!tree.is_dirty());
    }

    #[test]
    fn test_reload_never_reuses_ids() {
        let mut tree = MenuTree::from_flat(5, "en", &rows());
        tree.reload("de", &rows());

        assert_eq!(tree.locale(), "de");
        assert_eq!(tree.nodes()[0].dynamic_id, DynamicId::new(4));
        assert!(tree.find(DynamicId::new(1)).is_none());
    }
}
