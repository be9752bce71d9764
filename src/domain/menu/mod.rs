//! Menu Context - 菜单限界上下文
//!
//! 职责:
//! - 菜单树的拖放、追加、编辑、删除
//! - 扁平列表与嵌套树之间的转换

mod aggregate;
mod entities;
mod errors;
pub mod operations;
mod records;
mod value_objects;

pub use aggregate::MenuTree;
pub use entities::{MenuNode, MenuNodeDraft, MenuPatch};
pub use errors::MenuError;
pub use operations::{MoveOutcome, MoveRequest};
pub use records::{FlatMenuNode, MenuItemPayload};
pub use value_objects::{
    DropPosition, DynamicId, DynamicIdSequence, LinkTarget, MenuLink, CUSTOM_LINK_TYPE,
};
