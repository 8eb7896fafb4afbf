use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::gateway::{ApiGateway, GatewayError};
use crate::models::{ClientData, Region};

/// The two analysis endpoints the trigger pipeline drives: web search for a
/// client's query, then sentiment analysis over the found links.
pub struct OrmScanApi {
    gateway: Arc<ApiGateway>,
}

/// Both endpoints answer with a success flag and an opaque result list. The
/// console passes results through between steps without interpreting them.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OrmScanApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn google_search(
        &self,
        query: &str,
        region: Region,
        results_count: u32,
    ) -> Result<PipelineResponse, GatewayError> {
        let body = json!({
            "query": query,
            "region": region,
            "resultsCount": results_count,
        });
        self.gateway.post("/orm-scan/test/google-search", &body).await
    }

    pub async fn sentiment_analysis(
        &self,
        links: &[Value],
        client_data: &ClientData,
    ) -> Result<PipelineResponse, GatewayError> {
        let body = json!({
            "links": links,
            "clientData": client_data,
        });
        self.gateway
            .post("/orm-scan/test/sentiment-analysis", &body)
            .await
    }
}
