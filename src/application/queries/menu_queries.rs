//! Menu Queries

/// 读取菜单树查询
#[derive(Debug, Clone)]
pub struct GetMenuTree {
    pub menu_id: i64,
    pub locale: String,
}

impl GetMenuTree {
    pub fn new(menu_id: i64, locale: impl Into<String>) -> Self {
        Self {
            menu_id,
            locale: locale.into(),
        }
    }
}
