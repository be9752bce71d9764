//! Session Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SessionGatewayPort;
use crate::application::queries::GetProfile;
use crate::domain::session::Profile;

/// GetProfile Handler
pub struct GetProfileHandler {
    gateway: Arc<dyn SessionGatewayPort>,
}

impl GetProfileHandler {
    pub fn new(gateway: Arc<dyn SessionGatewayPort>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, _query: GetProfile) -> Result<Profile, ApplicationError> {
        Ok(self.gateway.profile().await?)
    }
}
