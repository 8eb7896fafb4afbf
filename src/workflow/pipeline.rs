use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::TriggerRequest;
use crate::api::{OrmScanApi, ScanApi};
use crate::config::config;
use crate::gateway::{ApiGateway, GatewayError};
use crate::models::NewScan;

/// How one pipeline step fails: transported errors keep their gateway
/// detail, a `success: false` envelope carries the step's own message.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// The four backend calls of a scan run, in execution order. The runner
/// owns sequencing; implementations own only the calls, so the runner is
/// testable against stubs without a live backend.
#[async_trait]
pub trait ScanPipeline: Send + Sync {
    /// Persists the scan record the run will fill; returns its id.
    async fn create_scan(&self, request: &TriggerRequest) -> Result<String, StepError>;

    /// Searches the web for the request's combined query; returns the links.
    async fn search(&self, request: &TriggerRequest) -> Result<Vec<Value>, StepError>;

    /// Scores the links; returns the analyzed results.
    async fn analyze(
        &self,
        request: &TriggerRequest,
        links: Vec<Value>,
    ) -> Result<Vec<Value>, StepError>;

    /// Stores the results against the scan, completing it; returns the
    /// stored count.
    async fn save_results(
        &self,
        request: &TriggerRequest,
        scan_id: &str,
        results: Vec<Value>,
    ) -> Result<u32, StepError>;
}

/// Production pipeline over the real endpoint services.
pub struct LivePipeline {
    scans: ScanApi,
    orm_scan: OrmScanApi,
    search_results_count: u32,
}

impl LivePipeline {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self {
            scans: ScanApi::new(Arc::clone(&gateway)),
            orm_scan: OrmScanApi::new(gateway),
            search_results_count: config().trigger.search_results_count,
        }
    }
}

#[async_trait]
impl ScanPipeline for LivePipeline {
    async fn create_scan(&self, request: &TriggerRequest) -> Result<String, StepError> {
        let scan = NewScan::manual(
            request.client.id.clone(),
            Some(request.client.name.clone()),
            request.keywords.clone(),
            request.region,
        );

        let response = self.scans.create(&scan).await?;
        if !response.success {
            return Err(StepError::Failed("Failed to create scan record".to_string()));
        }
        Ok(response.scan.id)
    }

    async fn search(&self, request: &TriggerRequest) -> Result<Vec<Value>, StepError> {
        let response = self
            .orm_scan
            .google_search(&request.combined_query(), request.region, self.search_results_count)
            .await?;

        if !response.success {
            return Err(StepError::Failed("Search failed".to_string()));
        }
        Ok(response.results)
    }

    async fn analyze(
        &self,
        request: &TriggerRequest,
        links: Vec<Value>,
    ) -> Result<Vec<Value>, StepError> {
        let response = self
            .orm_scan
            .sentiment_analysis(&links, &request.client_data())
            .await?;

        if !response.success {
            return Err(StepError::Failed("Sentiment analysis failed".to_string()));
        }
        Ok(response.results)
    }

    async fn save_results(
        &self,
        request: &TriggerRequest,
        scan_id: &str,
        results: Vec<Value>,
    ) -> Result<u32, StepError> {
        let response = self
            .scans
            .save_results(scan_id, &results, &request.client_data())
            .await?;

        if !response.success {
            return Err(StepError::Failed("Failed to save scan results".to_string()));
        }
        Ok(response.results_count)
    }
}
