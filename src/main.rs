//! CmsDesk - CMS 管理端
//!
//! 启动流程:
//! - 加载配置、初始化日志
//! - 恢复或登录会话
//! - 如果配置了菜单，加载并输出保存用的菜单结构

use std::sync::Arc;

use cmsdesk::application::{
    GetMenuTree, GetMenuTreeHandler, GetProfile, GetProfileHandler, Login, LoginHandler,
    SessionEvent,
};
use cmsdesk::config::{load_config, print_config, LogConfig};
use cmsdesk::infrastructure::http::ReqwestTransportConfig;
use cmsdesk::infrastructure::persistence::SledTokenStoreConfig;
use cmsdesk::infrastructure::{
    spawn_token_sync, AuthHttpClient, HttpMenuRepository, ReqwestTransport,
    SessionEventPublisher, SledTokenStore,
};

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},cmsdesk={}", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    tracing::info!("CmsDesk - CMS 管理端");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = config.storage.token_db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 令牌存储
    let store_config = SledTokenStoreConfig {
        db_path: config.storage.token_db_path.to_string_lossy().to_string(),
    };
    let token_store = Arc::new(SledTokenStore::new(&store_config)?);

    // 传输层与事件
    let transport = Arc::new(ReqwestTransport::new(
        ReqwestTransportConfig::default().with_timeout(config.api.timeout_secs),
    )?);
    let events = Arc::new(SessionEventPublisher::new());

    let client = AuthHttpClient::new(
        config.api.client_config(),
        transport,
        token_store.clone(),
        events.clone(),
    )
    .arc();

    if let Some(saved_at) = token_store.saved_at()? {
        tracing::info!(saved_at = %saved_at, "Restored stored session");
    }

    // 同步本进程内共享同一 Db 的句柄（SledTokenStore::share）写入的令牌
    let updates = token_store.watch_access_token()?;
    spawn_token_sync(client.clone(), token_store.clone(), updates);

    let mut session_events = events.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = session_events.recv().await {
            match event {
                SessionEvent::SessionError {
                    status,
                    path,
                    message,
                } => tracing::error!(status, path = %path, message = %message, "Session error"),
                SessionEvent::TokensRefreshed => tracing::info!("Session tokens refreshed"),
                SessionEvent::SessionEnded { reason } => {
                    tracing::warn!(reason = %reason, "Session ended, login required")
                }
            }
        }
    });

    // 没有已保存的会话时使用配置中的凭据登录
    if client.access_token().is_none() {
        match config.auth.credentials() {
            Some(credentials) => {
                LoginHandler::new(client.clone())
                    .handle(Login { credentials })
                    .await?;
            }
            None => {
                tracing::warn!("No stored session and no credentials configured");
                return Ok(());
            }
        }
    }

    let profile = GetProfileHandler::new(client.clone())
        .handle(GetProfile)
        .await?;
    tracing::info!(
        user_id = profile.id,
        email = ?profile.email,
        "Session ready"
    );

    if let Some(menu_id) = config.menu.menu_id {
        let menu_repo = Arc::new(HttpMenuRepository::new(client.clone()));
        let tree = GetMenuTreeHandler::new(menu_repo)
            .handle(GetMenuTree::new(menu_id, config.menu.default_locale.clone()))
            .await?;

        println!("{}", serde_json::to_string_pretty(&tree.to_payload())?);
    }

    token_store.flush()?;
    Ok(())
}
