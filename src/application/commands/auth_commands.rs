//! Auth Commands

use crate::domain::session::Credentials;

/// 登录命令
#[derive(Debug, Clone)]
pub struct Login {
    pub credentials: Credentials,
}

impl Login {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(email, password),
        }
    }
}

/// 登出命令
#[derive(Debug, Clone)]
pub struct Logout;
