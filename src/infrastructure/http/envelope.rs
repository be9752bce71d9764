//! 响应包装结构
//!
//! 后端成功响应统一为 `{ data }`，分页列表为 `{ data, meta }`

use serde::{Deserialize, Serialize};

use crate::application::ports::FieldError;
use crate::domain::session::TokenPair;

/// `{ data: T }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// 分页信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// `{ data: [T], meta: {...} }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn has_next_page(&self) -> bool {
        self.meta.page < self.meta.total_pages
    }
}

/// 422 响应体
#[derive(Debug, Deserialize)]
pub(crate) struct ValidationBody {
    pub errors: Vec<FieldError>,
}

/// 刷新接口的令牌，refreshToken 缺失时沿用旧值
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshedTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// 令牌响应可能被 `{ data }` 包裹，也可能直接返回
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum TokenResponse<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> TokenResponse<T> {
    pub fn into_inner(self) -> T {
        match self {
            TokenResponse::Wrapped { data } => data,
            TokenResponse::Bare(inner) => inner,
        }
    }
}

pub(crate) type LoginResponse = TokenResponse<TokenPair>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_response_accepts_both_shapes() {
        let bare: TokenResponse<RefreshedTokens> =
            serde_json::from_value(json!({"accessToken": "T2", "refreshToken": "R2"})).unwrap();
        let tokens = bare.into_inner();
        assert_eq!(tokens.access_token, "T2");
        assert_eq!(tokens.refresh_token.as_deref(), Some("R2"));

        let wrapped: TokenResponse<RefreshedTokens> =
            serde_json::from_value(json!({"data": {"accessToken": "T3"}})).unwrap();
        let tokens = wrapped.into_inner();
        assert_eq!(tokens.access_token, "T3");
        assert_eq!(tokens.refresh_token, None);
    }

    #[test]
    fn test_paginated_meta() {
        let page: Paginated<i32> = serde_json::from_value(json!({
            "data": [1, 2],
            "meta": {"page": 1, "totalPages": 3, "perPage": 2}
        }))
        .unwrap();

        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.meta.per_page, Some(2));
        assert!(page.has_next_page());
    }
}
