//! Menu Context - Entities

use serde::{Deserialize, Serialize};

use super::{DynamicId, LinkTarget, MenuLink};

/// 菜单节点
///
/// 不变量:
/// - dynamic_id 在整棵树内唯一
/// - parent 与节点在树中的实际位置一致（根节点为 None）
/// - children 的顺序即持久化的显示顺序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// 数据库 id，未保存的节点为 None
    pub id: Option<i64>,
    pub dynamic_id: DynamicId,
    pub parent: Option<DynamicId>,
    pub title: String,
    pub link: MenuLink,
    pub target: LinkTarget,
    pub css_class: Option<String>,
    pub icon: Option<String>,
    pub rel: Option<String>,
    pub download: bool,
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// 由草稿生成一个未保存的根节点
    pub fn from_draft(dynamic_id: DynamicId, draft: MenuNodeDraft) -> Self {
        Self {
            id: None,
            dynamic_id,
            parent: None,
            title: draft.title,
            link: draft.link,
            target: draft.target,
            css_class: draft.css_class,
            icon: draft.icon,
            rel: draft.rel,
            download: draft.download,
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// 子孙节点数量（不含自身）
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// 自身或子孙中是否包含指定节点
    pub fn contains(&self, id: DynamicId) -> bool {
        self.dynamic_id == id || self.children.iter().any(|child| child.contains(id))
    }

    /// 复制除 children 以外的字段
    pub(crate) fn without_children(&self) -> Self {
        Self {
            id: self.id,
            dynamic_id: self.dynamic_id,
            parent: self.parent,
            title: self.title.clone(),
            link: self.link.clone(),
            target: self.target,
            css_class: self.css_class.clone(),
            icon: self.icon.clone(),
            rel: self.rel.clone(),
            download: self.download,
            children: Vec::new(),
        }
    }
}

/// 新菜单项草稿（"生成"操作的输入）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNodeDraft {
    pub title: String,
    pub link: MenuLink,
    pub target: LinkTarget,
    pub css_class: Option<String>,
    pub icon: Option<String>,
    pub rel: Option<String>,
    pub download: bool,
}

impl MenuNodeDraft {
    pub fn new(title: impl Into<String>, link: MenuLink) -> Self {
        Self {
            title: title.into(),
            link,
            target: LinkTarget::default(),
            css_class: None,
            icon: None,
            rel: None,
            download: false,
        }
    }
}

/// 节点字段补丁
///
/// 只合并设置过的字段；可选字段用 `Some(None)` 表示清空。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuPatch {
    pub title: Option<String>,
    pub link: Option<String>,
    pub target: Option<LinkTarget>,
    pub css_class: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub rel: Option<Option<String>>,
    pub download: Option<bool>,
}

impl MenuPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn target(mut self, target: LinkTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn css_class(mut self, css_class: Option<String>) -> Self {
        self.css_class = Some(css_class);
        self
    }

    pub fn icon(mut self, icon: Option<String>) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn rel(mut self, rel: Option<String>) -> Self {
        self.rel = Some(rel);
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = Some(download);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 合并到节点上，不触碰 id / dynamic_id / parent / children
    pub fn apply_to(&self, node: &mut MenuNode) {
        if let Some(title) = &self.title {
            node.title = title.clone();
        }
        if let Some(link) = &self.link {
            node.link.set_link(link.clone());
        }
        if let Some(target) = self.target {
            node.target = target;
        }
        if let Some(css_class) = &self.css_class {
            node.css_class = css_class.clone();
        }
        if let Some(icon) = &self.icon {
            node.icon = icon.clone();
        }
        if let Some(rel) = &self.rel {
            node.rel = rel.clone();
        }
        if let Some(download) = self.download {
            node.download = download;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64) -> MenuNode {
        MenuNode::from_draft(
            DynamicId::new(id),
            MenuNodeDraft::new(format!("item-{}", id), MenuLink::custom("/")),
        )
    }

    #[test]
    fn test_descendant_count() {
        let mut root = node(1);
        let mut child = node(2);
        child.children.push(node(3));
        root.children.push(child);
        root.children.push(node(4));

        assert_eq!(root.descendant_count(), 3);
        assert!(root.contains(DynamicId::new(3)));
        assert!(!root.contains(DynamicId::new(5)));
    }

    #[test]
    fn test_patch_keeps_identity_and_children() {
        let mut root = node(1);
        root.id = Some(10);
        root.children.push(node(2));

        let patch = MenuPatch::new()
            .title("Home")
            .link("/home")
            .css_class(Some("nav-home".into()))
            .target(LinkTarget::NewWindow);
        patch.apply_to(&mut root);

        assert_eq!(root.title, "Home");
        assert_eq!(root.link.link(), Some("/home"));
        assert_eq!(root.css_class.as_deref(), Some("nav-home"));
        assert_eq!(root.target, LinkTarget::NewWindow);
        assert_eq!(root.id, Some(10));
        assert_eq!(root.dynamic_id, DynamicId::new(1));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_patch_can_clear_optional_field() {
        let mut item = node(1);
        item.icon = Some("star".into());

        MenuPatch::new().icon(None).apply_to(&mut item);
        assert_eq!(item.icon, None);
        assert!(MenuPatch::new().is_empty());
    }
}
