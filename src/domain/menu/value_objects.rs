//! Menu Context - Value Objects

use serde::{Deserialize, Serialize};

/// 自定义链接的类型名
pub const CUSTOM_LINK_TYPE: &str = "custom";

/// 菜单节点的会话内标识
///
/// 与数据库 id 无关，未保存的节点同样拥有，整个编辑会话内不重复。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DynamicId(u64);

impl DynamicId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DynamicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DynamicId 发号器
///
/// 单调递增，删除节点后也不回收。
#[derive(Debug, Clone)]
pub struct DynamicIdSequence {
    next: u64,
}

impl DynamicIdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> DynamicId {
        let id = DynamicId(self.next);
        self.next += 1;
        id
    }

    /// 下一个将被分配的 id（不消耗）
    pub fn peek(&self) -> DynamicId {
        DynamicId(self.next)
    }
}

impl Default for DynamicIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// 链接打开方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    SameWindow,
    NewWindow,
}

impl LinkTarget {
    /// 持久化使用的字符串形式
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkTarget::SameWindow => "_self",
            LinkTarget::NewWindow => "_blank",
        }
    }

    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("_blank") => LinkTarget::NewWindow,
            _ => LinkTarget::SameWindow,
        }
    }
}

/// 菜单链接
///
/// - Custom: 手填的 URL
/// - Reference: 指向站内实体（页面、新闻、分类……），由 kind + reference_id 定位，
///   link 为服务端生成的地址（可能缺失）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuLink {
    Custom {
        link: String,
    },
    Reference {
        kind: String,
        reference_id: i64,
        link: Option<String>,
    },
}

impl MenuLink {
    pub fn custom(link: impl Into<String>) -> Self {
        MenuLink::Custom { link: link.into() }
    }

    pub fn reference(kind: impl Into<String>, reference_id: i64) -> Self {
        MenuLink::Reference {
            kind: kind.into(),
            reference_id,
            link: None,
        }
    }

    /// 从持久化字段还原
    ///
    /// 缺少 type、type 为 custom 或缺少 reference_id 时都视为自定义链接。
    pub fn from_wire(kind: Option<&str>, link: Option<String>, reference_id: Option<i64>) -> Self {
        match (kind, reference_id) {
            (Some(kind), Some(reference_id)) if kind != CUSTOM_LINK_TYPE => MenuLink::Reference {
                kind: kind.to_string(),
                reference_id,
                link,
            },
            _ => MenuLink::Custom {
                link: link.unwrap_or_default(),
            },
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            MenuLink::Custom { .. } => CUSTOM_LINK_TYPE,
            MenuLink::Reference { kind, .. } => kind,
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            MenuLink::Custom { link } => Some(link),
            MenuLink::Reference { link, .. } => link.as_deref(),
        }
    }

    pub fn reference_id(&self) -> Option<i64> {
        match self {
            MenuLink::Custom { .. } => None,
            MenuLink::Reference { reference_id, .. } => Some(*reference_id),
        }
    }

    /// 替换链接地址，链接类型不变
    pub fn set_link(&mut self, value: String) {
        match self {
            MenuLink::Custom { link } => *link = value,
            MenuLink::Reference { link, .. } => *link = Some(value),
        }
    }
}

/// 拖放的相对位置（目标节点上方 / 目标节点上 / 目标节点下方）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    Onto,
    After,
}

impl DropPosition {
    /// 从树控件给出的相对位置（-1 / 0 / 1）转换
    pub fn from_relative(position: i32) -> Self {
        match position {
            -1 => DropPosition::Before,
            1 => DropPosition::After,
            _ => DropPosition::Onto,
        }
    }
}
