use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use super::query::QueryString;
use crate::gateway::{ApiGateway, GatewayError};
use crate::models::{
    BulkKeywords, BulkKeywordsResponse, Keyword, KeywordStatus, KeywordStatusResponse, NewKeyword,
    Region,
};

/// Keyword management over `/keywords`.
pub struct KeywordApi {
    gateway: Arc<ApiGateway>,
}

/// Narrowing the list endpoint applies server-side.
#[derive(Debug, Default, Clone)]
pub struct KeywordQuery {
    pub client_id: Option<String>,
    pub status: Option<KeywordStatus>,
    pub region: Option<Region>,
}

/// Create, update, and status changes respond with `{ message, keyword }`.
#[derive(Debug, Deserialize)]
struct KeywordEnvelope {
    keyword: Keyword,
}

impl KeywordApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &KeywordQuery) -> Result<Vec<Keyword>, GatewayError> {
        let mut qs = QueryString::new();
        qs.push_opt("clientId", query.client_id.as_deref());
        qs.push_opt("status", query.status);
        qs.push_opt("region", query.region);
        self.gateway.get(&qs.append_to("/keywords")).await
    }

    pub async fn get(&self, id: &str) -> Result<Keyword, GatewayError> {
        self.gateway.get(&format!("/keywords/{}", id)).await
    }

    pub async fn create(&self, keyword: &NewKeyword) -> Result<Keyword, GatewayError> {
        let envelope: KeywordEnvelope = self.gateway.post("/keywords", keyword).await?;
        Ok(envelope.keyword)
    }

    pub async fn update(&self, id: &str, keyword: &NewKeyword) -> Result<Keyword, GatewayError> {
        let envelope: KeywordEnvelope =
            self.gateway.put(&format!("/keywords/{}", id), keyword).await?;
        Ok(envelope.keyword)
    }

    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let _: serde_json::Value = self.gateway.delete(&format!("/keywords/{}", id)).await?;
        Ok(())
    }

    /// One request creating many keywords for a single client.
    pub async fn bulk_create(&self, batch: &BulkKeywords) -> Result<BulkKeywordsResponse, GatewayError> {
        self.gateway.post("/keywords/bulk", batch).await
    }

    pub async fn set_status(&self, id: &str, status: KeywordStatus) -> Result<Keyword, GatewayError> {
        let response: KeywordStatusResponse = self
            .gateway
            .patch(&format!("/keywords/{}/status", id), &json!({ "status": status }))
            .await?;
        Ok(response.keyword)
    }
}
