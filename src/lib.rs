//! CmsDesk - CMS 管理端核心
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Menu Context: 菜单树编辑
//! - Session Context: 令牌与当前用户
//!
//! 应用层 (application/):
//! - Ports: 端口定义（HttpTransport, TokenStore, SessionGateway, MenuRepository, SessionEvents）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: AuthHttpClient（令牌注入 + 单飞刷新）与 reqwest 传输层
//! - Persistence: Sled 令牌存储
//! - Memory: 内存令牌存储
//! - Sync: 多客户端令牌同步
//! - Adapters: HTTP 菜单仓储
//! - Events: 会话事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::{load_config, AppConfig};
