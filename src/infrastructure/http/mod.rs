//! HTTP Layer - 后端 API 客户端
//!
//! - transport: reqwest 实现的原始收发
//! - client: 令牌注入、401 单飞刷新、错误分类
//! - envelope: `{ data }` / `{ data, meta }` 响应包装

pub mod client;
pub mod envelope;
pub mod error;
pub mod transport;

pub use client::{decode, AuthHttpClient, AuthHttpClientConfig, RefreshPhase, RequestConfig};
pub use envelope::{DataEnvelope, PageMeta, Paginated};
pub use error::{ApiError, RefreshError};
pub use transport::{ReqwestTransport, ReqwestTransportConfig};
