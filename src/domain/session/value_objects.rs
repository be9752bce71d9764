//! Session Context - Value Objects

use serde::{Deserialize, Serialize};

/// 登录或刷新得到的一对令牌
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// 当前会话持有的令牌（可能都不存在）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    /// 访问令牌对应的 Authorization 头
    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

impl From<TokenPair> for SessionTokens {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: Some(pair.access_token),
            refresh_token: Some(pair.refresh_token),
        }
    }
}

/// 登录凭据
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// 不打印密码
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 当前登录用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    /// 其余字段原样保留
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Profile {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_pair_wire_format() {
        let pair: TokenPair =
            serde_json::from_value(json!({"accessToken": "T2", "refreshToken": "R2"})).unwrap();
        assert_eq!(pair, TokenPair::new("T2", "R2"));

        let tokens = SessionTokens::from(pair);
        assert_eq!(tokens.access_token.as_deref(), Some("T2"));
        assert_eq!(SessionTokens::bearer("T2"), "Bearer T2");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = Credentials::new("admin@example.com", "secret");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("admin@example.com"));
        assert!(!printed.contains("secret"));
    }

    #[test]
    fn test_profile_keeps_extra_attributes() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 1,
            "email": "admin@example.com",
            "roles": ["admin"],
            "locale": "en"
        }))
        .unwrap();

        assert!(profile.has_role("admin"));
        assert_eq!(profile.attributes["locale"], "en");
    }
}
