//! Session Queries

/// 获取当前登录用户
#[derive(Debug, Clone)]
pub struct GetProfile;
