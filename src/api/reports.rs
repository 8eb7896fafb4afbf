use std::sync::Arc;

use crate::gateway::{ApiGateway, Download, GatewayError};
use crate::models::{Report, ReportActionResponse};

/// Report access over `/reports`, including the binary exports.
pub struct ReportApi {
    gateway: Arc<ApiGateway>,
}

impl ReportApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Report>, GatewayError> {
        self.gateway.get("/reports").await
    }

    pub async fn get(&self, id: &str) -> Result<Report, GatewayError> {
        self.gateway.get(&format!("/reports/{}", id)).await
    }

    /// Rebuilds a report's files from its scan's stored results.
    pub async fn regenerate(&self, id: &str) -> Result<ReportActionResponse, GatewayError> {
        self.gateway
            .post_empty(&format!("/reports/{}/regenerate", id))
            .await
    }

    pub async fn download_pdf(&self, id: &str) -> Result<Download, GatewayError> {
        self.gateway
            .get_bytes(&format!("/reports/{}/download/pdf", id))
            .await
    }

    pub async fn download_excel(&self, id: &str) -> Result<Download, GatewayError> {
        self.gateway
            .get_bytes(&format!("/reports/{}/download/excel", id))
            .await
    }
}
