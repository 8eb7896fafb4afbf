use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use super::query::QueryString;
use crate::gateway::{ApiGateway, GatewayError};
use crate::models::{
    ClientData, CreateScanResponse, DeleteScanResponse, NewScan, Region, SaveResultsResponse, Scan,
    ScanActionResponse, ScanStatus,
};

#[derive(Debug, Error)]
pub enum ScanApiError {
    /// A local precondition failed; no request was issued.
    #[error("{0}")]
    Rejected(&'static str),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Scan lifecycle over `/scans`: listing, triggering support calls,
/// deletion, auto-scan scheduling, and release to the client portal.
pub struct ScanApi {
    gateway: Arc<ApiGateway>,
}

/// Narrowing the list endpoint applies server-side.
#[derive(Debug, Default, Clone)]
pub struct ScanQuery {
    pub region: Option<Region>,
    pub status: Option<ScanStatus>,
    pub limit: Option<u32>,
}

impl ScanApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &ScanQuery) -> Result<Vec<Scan>, GatewayError> {
        let mut qs = QueryString::new();
        qs.push_opt("region", query.region);
        qs.push_opt("status", query.status);
        qs.push_opt("limit", query.limit);
        self.gateway.get(&qs.append_to("/scans")).await
    }

    /// Scans released to the authenticated client account.
    pub async fn list_sent(&self) -> Result<Vec<Scan>, GatewayError> {
        self.gateway.get("/scans/client").await
    }

    pub async fn get(&self, id: &str) -> Result<Scan, GatewayError> {
        self.gateway.get(&format!("/scans/{}", id)).await
    }

    pub async fn results(&self, id: &str) -> Result<Vec<Value>, GatewayError> {
        self.gateway.get(&format!("/scans/{}/results", id)).await
    }

    /// Creates the scan record that starts a run. The caller checks the
    /// envelope's `success` flag.
    pub async fn create(&self, scan: &NewScan) -> Result<CreateScanResponse, GatewayError> {
        self.gateway.post("/scans", scan).await
    }

    /// Persists analyzed results against a scan, completing it.
    pub async fn save_results(
        &self,
        scan_id: &str,
        results: &[Value],
        client_data: &ClientData,
    ) -> Result<SaveResultsResponse, GatewayError> {
        let body = json!({
            "scanId": scan_id,
            "results": results,
            "clientData": client_data,
        });
        self.gateway.post(&format!("/scans/{}/results", scan_id), &body).await
    }

    /// Deletes a scan and its stored results. Legal in every state.
    pub async fn delete(&self, id: &str) -> Result<DeleteScanResponse, GatewayError> {
        self.gateway.delete(&format!("/scans/{}", id)).await
    }

    /// Releases a completed scan to the client portal.
    ///
    /// Preconditions are checked locally first; on violation the request is
    /// never issued and the rejection carries the screen's exact wording.
    pub async fn send_to_client(&self, scan: &Scan) -> Result<ScanActionResponse, ScanApiError> {
        if let Some(reason) = scan.send_rejection() {
            return Err(ScanApiError::Rejected(reason));
        }

        let query = scan
            .search_query
            .clone()
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| "Scan Results".to_string());

        let body = json!({
            "scanId": scan.id,
            "query": query,
            // Status-only transition; the portal already has the results.
            "results": [],
            "clientData": scan.client_data(),
        });

        let response: ScanActionResponse =
            self.gateway.post("/scans/send-to-client", &body).await?;
        info!("scan {} sent to {}", scan.id, scan.client_display_name());
        Ok(response)
    }

    pub async fn enable_auto_scan(
        &self,
        scan_id: &str,
        keywords: &[String],
        region: Region,
    ) -> Result<ScanActionResponse, GatewayError> {
        let body = json!({ "keywords": keywords, "region": region });
        self.gateway
            .post(&format!("/scans/{}/enable-auto-scan", scan_id), &body)
            .await
    }

    pub async fn disable_auto_scan(&self, scan_id: &str) -> Result<ScanActionResponse, GatewayError> {
        self.gateway
            .post_empty(&format!("/scans/{}/disable-auto-scan", scan_id))
            .await
    }

    /// Flips weekly auto-scan for a scan and returns the new state.
    pub async fn toggle_auto_scan(&self, scan: &Scan) -> Result<bool, GatewayError> {
        if scan.auto_scan_enabled {
            self.disable_auto_scan(&scan.id).await?;
            Ok(false)
        } else {
            // The screen schedules with a placeholder keyword when none are
            // configured on the scan itself.
            self.enable_auto_scan(&scan.id, &["scan".to_string()], scan.region).await?;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientStatus, ScanType};
    use crate::session::MemorySessionStore;
    use std::time::Duration;

    fn api() -> ScanApi {
        // Unroutable base: a test fails loudly if a request ever goes out.
        let gateway = ApiGateway::new(
            "http://127.0.0.1:1",
            Duration::from_secs(1),
            Arc::new(MemorySessionStore::new()),
        )
        .expect("valid base url");
        ScanApi::new(Arc::new(gateway))
    }

    fn running_scan() -> Scan {
        Scan {
            id: "s1".to_string(),
            client_id: None,
            client_name: Some("Acme".to_string()),
            keywords: Vec::new(),
            region: Region::US,
            scan_type: ScanType::Manual,
            status: ScanStatus::Running,
            client_status: ClientStatus::NotSent,
            results_count: 0,
            search_query: None,
            started_at: None,
            completed_at: None,
            sent_to_client_at: None,
            viewed_by_client_at: None,
            auto_scan_enabled: false,
            week_number: 1,
        }
    }

    #[tokio::test]
    async fn send_rejection_short_circuits_before_any_request() {
        let err = api().send_to_client(&running_scan()).await.unwrap_err();
        match err {
            ScanApiError::Rejected(reason) => {
                assert_eq!(reason, "Only completed scans can be sent.")
            }
            other => panic!("expected local rejection, got {:?}", other),
        }
    }
}
