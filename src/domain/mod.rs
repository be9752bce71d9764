//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Menu Context: 菜单树编辑
//! - Session Context: 登录会话与令牌

pub mod menu;
pub mod session;
