mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use common::FakeBackend;
use orm_console_rust::api::{ScanApi, ScanApiError, ScanQuery};
use orm_console_rust::gateway::ApiGateway;
use orm_console_rust::models::{ClientStatus, Region, Scan, ScanStatus, ScanType};
use orm_console_rust::session::MemorySessionStore;

fn scan_api(backend: &FakeBackend) -> ScanApi {
    let gateway = ApiGateway::new(
        &backend.base_url,
        Duration::from_secs(5),
        Arc::new(MemorySessionStore::with_token("jwt-1")),
    )
    .expect("valid base url");
    ScanApi::new(Arc::new(gateway))
}

fn scan(status: ScanStatus, client_status: ClientStatus, results_count: u32) -> Scan {
    Scan {
        id: "scan-1".to_string(),
        client_id: None,
        client_name: Some("Acme Corp".to_string()),
        keywords: Vec::new(),
        region: Region::US,
        scan_type: ScanType::Manual,
        status,
        client_status,
        results_count,
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
async fn send_on_a_running_scan_issues_no_request() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let api = scan_api(&backend);

    let running = scan(ScanStatus::Running, ClientStatus::NotSent, 0);
    let err = api.send_to_client(&running).await.unwrap_err();

    match err {
        ScanApiError::Rejected(reason) => assert_eq!(reason, "Only completed scans can be sent."),
        other => panic!("expected local rejection, got {:?}", other),
    }
    assert!(backend.hits().is_empty(), "the precondition must short-circuit the request");
    Ok(())
}

#[tokio::test]
async fn send_on_an_already_sent_scan_is_rejected_first() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let api = scan_api(&backend);

    // Already sent wins over every other violated precondition.
    let sent = scan(ScanStatus::Running, ClientStatus::Sent, 0);
    let err = api.send_to_client(&sent).await.unwrap_err();

    match err {
        ScanApiError::Rejected(reason) => {
            assert_eq!(reason, "This scan has already been sent to the client.")
        }
        other => panic!("expected local rejection, got {:?}", other),
    }
    assert!(backend.hits().is_empty());
    Ok(())
}

#[tokio::test]
async fn send_posts_a_status_only_payload() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub(
        "POST",
        "/scans/send-to-client",
        200,
        json!({ "success": true, "message": "Scan results sent to client successfully" }),
    );
    let api = scan_api(&backend);

    let completed = scan(ScanStatus::Completed, ClientStatus::NotSent, 7);
    let response = api.send_to_client(&completed).await?;
    assert!(response.success);

    let hits = backend.hits();
    assert_eq!(hits.len(), 1);
    let body = hits[0].body.as_ref().expect("send carries a JSON body");
    assert_eq!(body["scanId"], "scan-1");
    // No stored query on the scan, so the placeholder goes out.
    assert_eq!(body["query"], "Scan Results");
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["clientData"]["name"], "Acme Corp");
    assert_eq!(body["clientData"]["industry"], "Business");
    Ok(())
}

#[tokio::test]
async fn delete_reports_the_removed_result_count() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub(
        "DELETE",
        "/scans/scan-1",
        200,
        json!({
            "success": true,
            "message": "Scan and associated results deleted successfully",
            "deletedScanId": "scan-1",
            "deletedResultsCount": 12
        }),
    );
    let api = scan_api(&backend);

    let response = api.delete("scan-1").await?;
    assert!(response.success);
    assert_eq!(response.deleted_scan_id.as_deref(), Some("scan-1"));
    assert_eq!(response.deleted_results_count, 12);
    Ok(())
}

#[tokio::test]
async fn list_passes_filters_as_query_parameters() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub("GET", "/scans", 200, json!([]));
    let api = scan_api(&backend);

    let query = ScanQuery {
        region: Some(Region::US),
        status: Some(ScanStatus::Completed),
        limit: Some(10),
    };
    let scans = api.list(&query).await?;
    assert!(scans.is_empty());

    let hits = backend.hits();
    assert_eq!(hits[0].query.as_deref(), Some("region=US&status=completed&limit=10"));
    Ok(())
}

#[tokio::test]
async fn toggle_enables_with_the_placeholder_keyword() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub(
        "POST",
        "/scans/scan-1/enable-auto-scan",
        200,
        json!({ "success": true, "message": "Auto-scan enabled successfully" }),
    );
    let api = scan_api(&backend);

    let target = scan(ScanStatus::Completed, ClientStatus::NotSent, 7);
    let enabled = api.toggle_auto_scan(&target).await?;
    assert!(enabled);

    let hits = backend.hits();
    let body = hits[0].body.as_ref().expect("enable carries a JSON body");
    assert_eq!(body["keywords"], json!(["scan"]));
    assert_eq!(body["region"], "US");
    Ok(())
}

#[tokio::test]
async fn toggle_disables_without_a_body() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub(
        "POST",
        "/scans/scan-1/disable-auto-scan",
        200,
        json!({ "success": true, "message": "Auto-scan disabled successfully" }),
    );
    let api = scan_api(&backend);

    let mut target = scan(ScanStatus::Completed, ClientStatus::NotSent, 7);
    target.auto_scan_enabled = true;

    let enabled = api.toggle_auto_scan(&target).await?;
    assert!(!enabled);
    assert_eq!(backend.hit_lines(), vec!["POST /scans/scan-1/disable-auto-scan"]);
    Ok(())
}
