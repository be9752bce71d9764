//! Menu Context - 持久化形态
//!
//! - FlatMenuNode: 后端返回的扁平列表项（parentId + depth）
//! - MenuItemPayload: 保存时提交的嵌套结构

use serde::{Deserialize, Serialize};

use super::MenuNode;

/// 后端返回的扁平菜单项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatMenuNode {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub depth: u32,
    /// 嵌套集合左右值，仅作排序提示
    #[serde(default)]
    pub lft: Option<i64>,
    #[serde(default)]
    pub rgt: Option<i64>,
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub reference_id: Option<i64>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub css_class: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub download: bool,
}

impl FlatMenuNode {
    pub fn new(id: i64, parent_id: Option<i64>, depth: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            depth,
            lft: None,
            rgt: None,
            title: title.into(),
            kind: None,
            link: None,
            reference_id: None,
            target: None,
            css_class: None,
            icon: None,
            rel: None,
            download: false,
        }
    }
}

/// 保存菜单时提交的节点
///
/// 叶子节点不输出 children 字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPayload {
    pub reference_id: Option<i64>,
    pub css_class: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub rel: Option<String>,
    pub download: bool,
    pub id: Option<i64>,
    pub title: String,
    pub target: String,
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuItemPayload>>,
}

impl From<&MenuNode> for MenuItemPayload {
    fn from(node: &MenuNode) -> Self {
        let children = if node.has_children() {
            Some(node.children.iter().map(MenuItemPayload::from).collect())
        } else {
            None
        };

        Self {
            reference_id: node.link.reference_id(),
            css_class: node.css_class.clone(),
            link: node.link.link().map(str::to_string),
            kind: node.link.type_name().to_string(),
            rel: node.rel.clone(),
            download: node.download,
            id: node.id,
            title: node.title.clone(),
            target: node.target.as_str().to_string(),
            icon: node.icon.clone(),
            children,
        }
    }
}
