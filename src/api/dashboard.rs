use std::sync::Arc;

use crate::gateway::{ApiGateway, GatewayError};
use crate::models::{AdminDashboard, ClientDashboard};

/// The two role-specific overview payloads.
pub struct DashboardApi {
    gateway: Arc<ApiGateway>,
}

impl DashboardApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn admin(&self) -> Result<AdminDashboard, GatewayError> {
        self.gateway.get("/dashboard/admin").await
    }

    pub async fn client(&self) -> Result<ClientDashboard, GatewayError> {
        self.gateway.get("/dashboard/client").await
    }
}
