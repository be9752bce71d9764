//! Reqwest Transport - 基于 reqwest 的 HttpTransportPort 实现

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

use crate::application::ports::{
    HttpMethod, HttpTransportPort, TransportError, TransportRequest, TransportResponse,
};

/// 传输层配置
#[derive(Debug, Clone)]
pub struct ReqwestTransportConfig {
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for ReqwestTransportConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl ReqwestTransportConfig {
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// reqwest 传输层
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: ReqwestTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn with_default_config() -> Result<Self, TransportError> {
        Self::new(ReqwestTransportConfig::default())
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl HttpTransportPort for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.request(to_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else if e.is_connect() {
                TransportError::Connect(e.to_string())
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read body: {}", e)))?
            .to_vec();

        Ok(TransportResponse { status, body })
    }
}
