//! Auth HTTP Client - 后端 API 客户端
//!
//! - 每个请求自动带上 `Authorization: Bearer <access_token>`
//! - 401 时单飞刷新令牌：同一时刻最多一个刷新请求，其余 401 请求排队等待
//! - 422 直接返回 errors 数组
//! - 已登录状态下的其它错误会额外发布 SessionError 事件
//!
//! 刷新状态机:
//! ```text
//! Idle --401--> Refreshing{waiters} --settle--> Idle
//!                  ^    |
//!                  +----+ 401（加入 waiters）
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{oneshot, watch};

use super::envelope::{
    DataEnvelope, LoginResponse, Paginated, RefreshedTokens, TokenResponse, ValidationBody,
};
use super::error::{ApiError, RefreshError};
use crate::application::ports::{
    HttpMethod, HttpTransportPort, RemoteError, SessionEvent, SessionEventPort,
    SessionGatewayPort, TokenStorePort, TransportRequest, TransportResponse,
};
use crate::domain::session::{Credentials, Profile, SessionTokens, TokenPair};

/// 单个逻辑请求最多进行的令牌恢复次数（换用新令牌或刷新）
const MAX_AUTH_RECOVERIES: usize = 2;

/// 错误响应中截取的最大字符数
const MAX_ERROR_MESSAGE_CHARS: usize = 200;

/// 客户端配置
#[derive(Debug, Clone)]
pub struct AuthHttpClientConfig {
    /// API 基础 URL
    pub base_url: String,
    pub login_path: String,
    pub refresh_path: String,
    pub profile_path: String,
}

impl Default for AuthHttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/".to_string(),
            login_path: "auth/login".to_string(),
            refresh_path: "auth/refresh-token".to_string(),
            profile_path: "auth/profile".to_string(),
        }
    }
}

impl AuthHttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// 单次调用的附加参数
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// 刷新结果：新的 access token 或共享的刷新错误
type RefreshOutcome = Result<String, RefreshError>;

enum RefreshState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<RefreshOutcome>>,
    },
}

/// 对外可见的刷新阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Idle,
    Refreshing,
}

/// 收到 401 后的处理方式
enum Recovery {
    /// 已有刷新在进行，排队等待
    Wait(oneshot::Receiver<RefreshOutcome>),
    /// 由当前请求发起刷新
    Lead,
    /// 请求发出后令牌已被替换，直接用新令牌重试
    Reuse(String),
}

/// 刷新发起者持有的守卫
///
/// 发起刷新的 future 被丢弃时，状态回到 Idle，排队请求收到 Aborted。
struct RefreshGuard<'a> {
    client: &'a AuthHttpClient,
    settled: bool,
}

impl RefreshGuard<'_> {
    fn settle(&mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.client.settle_refresh(outcome);
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.client.settle_refresh(Err(RefreshError::Aborted));
        }
    }
}

/// 带令牌管理的 API 客户端
pub struct AuthHttpClient {
    config: AuthHttpClientConfig,
    transport: Arc<dyn HttpTransportPort>,
    token_store: Arc<dyn TokenStorePort>,
    events: Arc<dyn SessionEventPort>,
    tokens: watch::Sender<SessionTokens>,
    refresh: Mutex<RefreshState>,
    session_active: AtomicBool,
}

impl AuthHttpClient {
    /// 创建客户端，并从持久化存储恢复令牌
    pub fn new(
        config: AuthHttpClientConfig,
        transport: Arc<dyn HttpTransportPort>,
        token_store: Arc<dyn TokenStorePort>,
        events: Arc<dyn SessionEventPort>,
    ) -> Self {
        let stored = token_store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load stored session tokens");
            SessionTokens::default()
        });

        tracing::info!(
            base_url = %config.base_url,
            restored_session = stored.access_token.is_some(),
            "AuthHttpClient initialized"
        );

        let (tokens, _) = watch::channel(stored);
        Self {
            config,
            transport,
            token_store,
            events,
            tokens,
            refresh: Mutex::new(RefreshState::Idle),
            session_active: AtomicBool::new(false),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn config(&self) -> &AuthHttpClientConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // 令牌
    // ------------------------------------------------------------------------

    pub fn tokens(&self) -> SessionTokens {
        self.tokens.borrow().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.borrow().access_token.clone()
    }

    /// 订阅令牌变化
    pub fn subscribe_tokens(&self) -> watch::Receiver<SessionTokens> {
        self.tokens.subscribe()
    }

    /// 写入新令牌（内存 + 持久化）
    pub fn set_tokens(&self, pair: TokenPair) {
        let tokens = SessionTokens::from(pair);
        if let Err(e) = self.token_store.save(&tokens) {
            tracing::warn!(error = %e, "Failed to persist session tokens");
        }
        self.tokens.send_replace(tokens);
    }

    /// 采用其它客户端写入共享存储的令牌
    pub fn adopt_tokens(&self, stored: SessionTokens) {
        let changed = self.tokens.send_if_modified(|tokens| {
            if *tokens == stored {
                false
            } else {
                *tokens = stored.clone();
                true
            }
        });

        if changed {
            if stored.access_token.is_none() {
                self.session_active.store(false, Ordering::SeqCst);
            }
            tracing::info!(
                has_token = stored.access_token.is_some(),
                "Adopted tokens from shared storage"
            );
        }
    }

    /// 只替换 access token，refresh token 保持不变
    pub fn adopt_access_token(&self, token: Option<String>) {
        let mut tokens = self.tokens();
        tokens.access_token = token;
        self.adopt_tokens(tokens);
    }

    /// 清除会话（内存 + 持久化）
    pub fn clear_session(&self) {
        if let Err(e) = self.token_store.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session tokens");
        }
        self.tokens.send_replace(SessionTokens::default());
        self.session_active.store(false, Ordering::SeqCst);
    }

    pub fn is_session_active(&self) -> bool {
        self.session_active.load(Ordering::SeqCst)
    }

    pub fn refresh_phase(&self) -> RefreshPhase {
        match &*self.lock_refresh() {
            RefreshState::Idle => RefreshPhase::Idle,
            RefreshState::Refreshing { .. } => RefreshPhase::Refreshing,
        }
    }

    /// 正在等待刷新结果的请求数
    pub fn pending_refresh_waiters(&self) -> usize {
        match &*self.lock_refresh() {
            RefreshState::Idle => 0,
            RefreshState::Refreshing { waiters } => waiters.len(),
        }
    }

    // ------------------------------------------------------------------------
    // 请求
    // ------------------------------------------------------------------------

    /// 发送请求，成功时原样返回解析后的响应体
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        config: &RequestConfig,
    ) -> Result<Value, ApiError> {
        let mut token = self.access_token();
        let mut recoveries = 0;

        loop {
            let response = self
                .dispatch(method, path, body.as_ref(), config, token.as_deref())
                .await?;

            if response.status != 401 {
                return self.interpret(path, response);
            }

            if recoveries >= MAX_AUTH_RECOVERIES {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    "Request still unauthorized after token recovery"
                );
                return Err(ApiError::Unauthorized);
            }
            recoveries += 1;
            token = Some(self.recover_access(token.as_deref()).await?);
        }
    }

    pub async fn get(&self, path: &str, config: &RequestConfig) -> Result<Value, ApiError> {
        self.request(HttpMethod::Get, path, None, config).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(HttpMethod::Post, path, Some(body), &RequestConfig::default())
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(HttpMethod::Put, path, Some(body), &RequestConfig::default())
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let body = encode(body)?;
        self.request(HttpMethod::Patch, path, Some(body), &RequestConfig::default())
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(HttpMethod::Delete, path, None, &RequestConfig::default())
            .await
    }

    /// GET 并解开 `{ data }`
    pub async fn fetch_data<T: DeserializeOwned>(
        &self,
        path: &str,
        config: &RequestConfig,
    ) -> Result<T, ApiError> {
        let value = self.get(path, config).await?;
        decode::<DataEnvelope<T>>(value).map(|envelope| envelope.data)
    }

    /// GET 分页列表
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        config: &RequestConfig,
    ) -> Result<Paginated<T>, ApiError> {
        let value = self.get(path, config).await?;
        decode(value)
    }

    // ------------------------------------------------------------------------
    // 会话
    // ------------------------------------------------------------------------

    /// 登录；401 直接返回，不触发刷新
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let path = self.config.login_path.as_str();
        let body = encode(credentials)?;
        let response = self
            .dispatch(HttpMethod::Post, path, Some(&body), &RequestConfig::default(), None)
            .await?;
        let value = self.interpret(path, response)?;
        let pair = decode::<LoginResponse>(value)?.into_inner();

        self.set_tokens(pair.clone());
        tracing::info!(email = %credentials.email, "Logged in");
        Ok(pair)
    }

    pub fn logout(&self) {
        self.clear_session();
        self.events.publish(SessionEvent::SessionEnded {
            reason: "logout".to_string(),
        });
        tracing::info!("Logged out");
    }

    /// 获取当前用户，成功后会话视为活跃
    pub async fn fetch_profile(&self) -> Result<Profile, ApiError> {
        let profile: Profile = self
            .fetch_data(&self.config.profile_path, &RequestConfig::default())
            .await?;
        self.session_active.store(true, Ordering::SeqCst);
        tracing::debug!(user_id = profile.id, "Profile loaded");
        Ok(profile)
    }

    // ------------------------------------------------------------------------
    // 内部
    // ------------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
        config: &RequestConfig,
        token: Option<&str>,
    ) -> Result<TransportResponse, ApiError> {
        let mut request = TransportRequest::new(method, self.url(path));
        request.set_header("Accept", "application/json");
        if body.is_some() {
            request.set_header("Content-Type", "application/json");
        }
        if let Some(token) = token {
            request.set_header("Authorization", SessionTokens::bearer(token));
        }
        for (name, value) in &config.headers {
            request.set_header(name.as_str(), value.as_str());
        }
        request.query = config.query.clone();
        request.body = body.cloned();

        tracing::debug!(method = %method, url = %request.url, "Sending API request");

        let response = self.transport.send(request).await?;

        tracing::debug!(
            method = %method,
            path = %path,
            status = response.status,
            "API response received"
        );
        Ok(response)
    }

    /// 把非 401 的响应转成结果
    fn interpret(&self, path: &str, response: TransportResponse) -> Result<Value, ApiError> {
        if response.is_success() {
            return parse_body(&response.body);
        }

        match response.status {
            401 => return Err(ApiError::Unauthorized),
            422 => {
                if let Ok(body) = serde_json::from_slice::<ValidationBody>(&response.body) {
                    return Err(ApiError::Validation(body.errors));
                }
            }
            _ => {}
        }

        let message = error_message(&response);
        if self.is_session_active() {
            self.events.publish(SessionEvent::SessionError {
                status: response.status,
                path: path.to_string(),
                message: message.clone(),
            });
        }
        Err(ApiError::Http {
            status: response.status,
            message,
        })
    }

    /// 处理 401：排队、发起刷新或换用已更新的令牌
    async fn recover_access(&self, sent_with: Option<&str>) -> Result<String, ApiError> {
        let recovery = {
            let mut state = self.lock_refresh();
            let recovery = match &mut *state {
                RefreshState::Refreshing { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Recovery::Wait(rx)
                }
                RefreshState::Idle => match self.access_token() {
                    Some(current) if Some(current.as_str()) != sent_with => Recovery::Reuse(current),
                    _ => Recovery::Lead,
                },
            };
            if let Recovery::Lead = recovery {
                *state = RefreshState::Refreshing {
                    waiters: Vec::new(),
                };
            }
            recovery
        };

        match recovery {
            Recovery::Reuse(token) => {
                tracing::debug!("Access token changed while request was in flight, retrying");
                Ok(token)
            }
            Recovery::Wait(rx) => match rx.await {
                Ok(outcome) => outcome.map_err(ApiError::from),
                Err(_) => Err(ApiError::RefreshFailed(RefreshError::Aborted)),
            },
            Recovery::Lead => self.lead_refresh().await.map_err(ApiError::from),
        }
    }

    async fn lead_refresh(&self) -> RefreshOutcome {
        let mut guard = RefreshGuard {
            client: self,
            settled: false,
        };

        tracing::info!("Access token rejected, refreshing");
        let outcome = match self.call_refresh_endpoint().await {
            Ok(pair) => {
                let access_token = pair.access_token.clone();
                self.set_tokens(pair);
                self.events.publish(SessionEvent::TokensRefreshed);
                tracing::info!("Access token refreshed");
                Ok(access_token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                self.clear_session();
                self.events.publish(SessionEvent::SessionEnded {
                    reason: e.to_string(),
                });
                Err(e)
            }
        };

        guard.settle(outcome.clone());
        outcome
    }

    async fn call_refresh_endpoint(&self) -> Result<TokenPair, RefreshError> {
        let refresh_token = self
            .tokens()
            .refresh_token
            .ok_or(RefreshError::MissingRefreshToken)?;

        let mut request = TransportRequest::new(HttpMethod::Post, self.url(&self.config.refresh_path))
            .with_json(json!({ "refreshToken": refresh_token }));
        request.set_header("Accept", "application/json");
        request.set_header("Content-Type", "application/json");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(RefreshError::Transport)?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                message: error_message(&response),
            });
        }

        let tokens = serde_json::from_slice::<TokenResponse<RefreshedTokens>>(&response.body)
            .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?
            .into_inner();

        Ok(TokenPair {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.unwrap_or(refresh_token),
        })
    }

    /// 结束刷新：回到 Idle，并按入队顺序通知所有等待者
    fn settle_refresh(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.lock_refresh();
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing { waiters } => waiters,
                RefreshState::Idle => Vec::new(),
            }
        };

        tracing::debug!(
            waiters = waiters.len(),
            success = outcome.is_ok(),
            "Draining refresh queue"
        );
        for waiter in waiters {
            // 接收端已丢弃说明调用方放弃了请求
            let _ = waiter.send(outcome.clone());
        }
    }

    fn lock_refresh(&self) -> MutexGuard<'_, RefreshState> {
        self.refresh
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionGatewayPort for AuthHttpClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair, RemoteError> {
        AuthHttpClient::login(self, credentials)
            .await
            .map_err(RemoteError::from)
    }

    async fn logout(&self) -> Result<(), RemoteError> {
        AuthHttpClient::logout(self);
        Ok(())
    }

    async fn profile(&self) -> Result<Profile, RemoteError> {
        self.fetch_profile().await.map_err(RemoteError::from)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("Failed to encode body: {}", e)))
}

/// 把响应体 JSON 解码为目标类型
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 优先取 JSON 中的 message 字段，否则取截断后的原始文本
fn error_message(response: &TransportResponse) -> String {
    if let Ok(value) = serde_json::from_slice::<Value>(&response.body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    response.text().chars().take(MAX_ERROR_MESSAGE_CHARS).collect()
}
