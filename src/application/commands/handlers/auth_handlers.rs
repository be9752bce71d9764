//! Auth Command Handlers

use std::sync::Arc;

use crate::application::commands::{Login, Logout};
use crate::application::error::ApplicationError;
use crate::application::ports::SessionGatewayPort;
use crate::domain::session::TokenPair;

// ============================================================================
// Login
// ============================================================================

/// Login Handler
pub struct LoginHandler {
    gateway: Arc<dyn SessionGatewayPort>,
}

impl LoginHandler {
    pub fn new(gateway: Arc<dyn SessionGatewayPort>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, command: Login) -> Result<TokenPair, ApplicationError> {
        if command.credentials.email.trim().is_empty() {
            return Err(ApplicationError::validation("Email is required"));
        }

        let tokens = self.gateway.login(&command.credentials).await?;

        tracing::info!(email = %command.credentials.email, "Login succeeded");
        Ok(tokens)
    }
}

// ============================================================================
// Logout
// ============================================================================

/// Logout Handler
pub struct LogoutHandler {
    gateway: Arc<dyn SessionGatewayPort>,
}

impl LogoutHandler {
    pub fn new(gateway: Arc<dyn SessionGatewayPort>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, _command: Logout) -> Result<(), ApplicationError> {
        self.gateway.logout().await?;
        Ok(())
    }
}
