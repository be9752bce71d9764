//! Integration test helpers
//!
//! 基于 wiremock 的后端模拟

#![allow(dead_code)]

use std::sync::Arc;

use cmsdesk::domain::session::{SessionTokens, TokenPair};
use cmsdesk::infrastructure::http::{AuthHttpClient, AuthHttpClientConfig, ReqwestTransport};
use cmsdesk::infrastructure::{InMemoryTokenStore, SessionEventPublisher};
use wiremock::MockServer;

pub struct TestContext {
    pub server: MockServer,
    pub client: Arc<AuthHttpClient>,
    pub store: Arc<InMemoryTokenStore>,
    pub events: Arc<SessionEventPublisher>,
}

/// 启动模拟后端，并创建带指定令牌的客户端
pub async fn setup(tokens: SessionTokens) -> TestContext {
    let server = MockServer::start().await;
    let store = Arc::new(InMemoryTokenStore::with_tokens(tokens));
    let events = Arc::new(SessionEventPublisher::new());

    let client = AuthHttpClient::new(
        AuthHttpClientConfig::new(format!("{}/api/", server.uri())),
        Arc::new(ReqwestTransport::with_default_config().expect("transport")),
        store.clone(),
        events.clone(),
    )
    .arc();

    TestContext {
        server,
        client,
        store,
        events,
    }
}

pub fn logged_in() -> SessionTokens {
    SessionTokens::from(TokenPair::new("T1", "R1"))
}
