use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::gateway::{ApiGateway, GatewayError};
use crate::models::{Client, ClientPayload, ClientStats};

/// Admin CRUD over `/clients`.
pub struct ClientApi {
    gateway: Arc<ApiGateway>,
}

/// Create and update respond with `{ message, client }`.
#[derive(Debug, Deserialize)]
struct ClientEnvelope {
    client: Client,
}

impl ClientApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Client>, GatewayError> {
        self.gateway.get("/clients").await
    }

    /// Client options for filter dropdowns and pickers. Best-effort: the
    /// screen still works without them, so any failure degrades to an
    /// empty list with a warning instead of surfacing.
    pub async fn list_for_filter(&self) -> Vec<Client> {
        match self.list().await {
            Ok(clients) => clients,
            Err(err) => {
                warn!("client options unavailable: {}", err);
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: &str) -> Result<Client, GatewayError> {
        self.gateway.get(&format!("/clients/{}", id)).await
    }

    pub async fn create(&self, payload: &ClientPayload) -> Result<Client, GatewayError> {
        let envelope: ClientEnvelope = self.gateway.post("/clients", payload).await?;
        Ok(envelope.client)
    }

    pub async fn update(&self, id: &str, payload: &ClientPayload) -> Result<Client, GatewayError> {
        let envelope: ClientEnvelope = self.gateway.put(&format!("/clients/{}", id), payload).await?;
        Ok(envelope.client)
    }

    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let _: serde_json::Value = self.gateway.delete(&format!("/clients/{}", id)).await?;
        Ok(())
    }

    pub async fn stats(&self, id: &str) -> Result<ClientStats, GatewayError> {
        self.gateway.get(&format!("/clients/{}/stats", id)).await
    }
}
