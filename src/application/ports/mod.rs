//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod http_transport;
mod menu_repository;
mod remote;
mod session_events;
mod session_gateway;
mod token_store;

pub use http_transport::{
    HttpMethod, HttpTransportPort, TransportError, TransportRequest, TransportResponse,
};
pub use menu_repository::MenuRepositoryPort;
pub use remote::{FieldError, RemoteError};
pub use session_events::{NoopSessionEvents, SessionEvent, SessionEventPort};
pub use session_gateway::SessionGatewayPort;
pub use token_store::{TokenStoreError, TokenStorePort};
