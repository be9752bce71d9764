//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod events;
pub mod http;
pub mod memory;
pub mod persistence;
pub mod sync;

pub use adapters::HttpMenuRepository;
pub use events::SessionEventPublisher;
pub use http::{AuthHttpClient, AuthHttpClientConfig, ReqwestTransport};
pub use memory::InMemoryTokenStore;
pub use persistence::sled::SledTokenStore;
pub use sync::spawn_token_sync;
