//! Session Context - 登录会话
//!
//! 令牌、凭据与当前用户资料

mod value_objects;

pub use value_objects::{Credentials, Profile, SessionTokens, TokenPair};
