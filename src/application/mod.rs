//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（HttpTransport、TokenStore、SessionGateway、MenuRepository 等）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Auth commands
    Login,
    Logout,
    // Menu commands
    SaveMenu,
    // Handlers
    handlers::{LoginHandler, LogoutHandler, SaveMenuHandler},
};

pub use error::ApplicationError;

pub use ports::{
    // HTTP transport
    HttpMethod,
    HttpTransportPort,
    TransportError,
    TransportRequest,
    TransportResponse,
    // Remote calls
    FieldError,
    MenuRepositoryPort,
    RemoteError,
    SessionGatewayPort,
    // Session
    NoopSessionEvents,
    SessionEvent,
    SessionEventPort,
    TokenStoreError,
    TokenStorePort,
};

pub use queries::{
    // Menu queries
    GetMenuTree,
    // Session queries
    GetProfile,
    // Handlers
    handlers::{GetMenuTreeHandler, GetProfileHandler},
};
