//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod menu_handlers;
mod session_handlers;

pub use menu_handlers::*;
pub use session_handlers::*;
