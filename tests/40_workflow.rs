mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use common::FakeBackend;
use orm_console_rust::gateway::ApiGateway;
use orm_console_rust::models::{Client, Region};
use orm_console_rust::session::MemorySessionStore;
use orm_console_rust::workflow::{LivePipeline, TriggerRequest, TriggerRunner, TriggerStep};

fn runner(backend: &FakeBackend) -> TriggerRunner<LivePipeline> {
    runner_with_timeout(backend, Duration::from_secs(5))
}

fn runner_with_timeout(backend: &FakeBackend, timeout: Duration) -> TriggerRunner<LivePipeline> {
    let gateway = ApiGateway::new(
        &backend.base_url,
        timeout,
        Arc::new(MemorySessionStore::with_token("jwt-1")),
    )
    .expect("valid base url");
    TriggerRunner::new(LivePipeline::new(Arc::new(gateway)))
}

fn acme() -> Client {
    serde_json::from_value(json!({
        "_id": "c1",
        "name": "Acme Corp",
        "contact": { "email": "owner@acme.test" },
        "settings": { "industry": "Retail" }
    }))
    .expect("valid client payload")
}

fn request() -> TriggerRequest {
    TriggerRequest::new(acme(), vec!["reviews".to_string()], Region::US)
}

fn stub_create_scan(backend: &FakeBackend) {
    backend.stub(
        "POST",
        "/scans",
        201,
        json!({
            "success": true,
            "message": "Scan created successfully",
            // Both id spellings, the way the backend actually answers.
            "scan": {
                "_id": "scan-9",
                "id": "scan-9",
                "clientId": "c1",
                "clientName": "Acme Corp",
                "region": "US",
                "scanType": "manual",
                "status": "running",
                "createdAt": "2026-08-20T10:00:00Z",
                "completedAt": null
            }
        }),
    );
}

#[tokio::test]
async fn happy_path_drives_the_four_endpoints_in_order() -> Result<()> {
    let backend = FakeBackend::start().await?;
    stub_create_scan(&backend);
    backend.stub(
        "POST",
        "/orm-scan/test/google-search",
        200,
        json!({
            "success": true,
            "results": [
                { "title": "Acme reviews", "link": "https://a.test/1", "position": 1 },
                { "title": "Acme complaints", "link": "https://a.test/2", "position": 2 },
                { "title": "Acme Corp", "link": "https://a.test/3", "position": 3 }
            ]
        }),
    );
    backend.stub(
        "POST",
        "/orm-scan/test/sentiment-analysis",
        200,
        json!({
            "success": true,
            "results": [
                { "link": "https://a.test/1", "sentiment": "positive" },
                { "link": "https://a.test/2", "sentiment": "negative" },
                { "link": "https://a.test/3", "sentiment": "neutral" }
            ]
        }),
    );
    backend.stub(
        "POST",
        "/scans/scan-9/results",
        200,
        json!({
            "success": true,
            "message": "Scan results saved successfully",
            "resultsCount": 3
        }),
    );

    let mut announced = Vec::new();
    let outcome = runner(&backend)
        .run_with_progress(&request(), |step| announced.push(step))
        .await?;

    assert_eq!(outcome.scan_id, "scan-9");
    assert_eq!(outcome.results_count, 3);
    assert_eq!(outcome.steps_completed, 4);
    assert_eq!(announced, TriggerStep::ALL.to_vec());
    assert_eq!(
        backend.hit_lines(),
        vec![
            "POST /scans",
            "POST /orm-scan/test/google-search",
            "POST /orm-scan/test/sentiment-analysis",
            "POST /scans/scan-9/results",
        ]
    );

    let hits = backend.hits();

    // The search step anchors the query to the client's name.
    let search_body = hits[1].body.as_ref().expect("search carries a JSON body");
    assert_eq!(search_body["query"], "Acme Corp reviews");
    assert_eq!(search_body["region"], "US");
    assert!(search_body["resultsCount"].is_u64());

    // Analysis and persistence both carry the client payload, with the
    // client's own industry over the fallback.
    let analyze_body = hits[2].body.as_ref().expect("analysis carries a JSON body");
    assert_eq!(analyze_body["links"].as_array().map(Vec::len), Some(3));
    assert_eq!(analyze_body["clientData"]["industry"], "Retail");

    let save_body = hits[3].body.as_ref().expect("save carries a JSON body");
    assert_eq!(save_body["scanId"], "scan-9");
    assert_eq!(save_body["results"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn a_failed_search_aborts_the_remaining_steps() -> Result<()> {
    let backend = FakeBackend::start().await?;
    stub_create_scan(&backend);
    backend.stub(
        "POST",
        "/orm-scan/test/google-search",
        200,
        json!({ "success": false, "results": [] }),
    );

    let err = runner(&backend).run(&request()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Step 2 of 4 (Fetching search results) failed: Search failed"
    );
    assert_eq!(
        backend.hit_lines(),
        vec!["POST /scans", "POST /orm-scan/test/google-search"],
        "steps after the failure must not run"
    );
    Ok(())
}

#[tokio::test]
async fn a_server_error_mid_run_gets_the_generic_wording() -> Result<()> {
    let backend = FakeBackend::start().await?;
    stub_create_scan(&backend);
    backend.stub(
        "POST",
        "/orm-scan/test/google-search",
        200,
        json!({ "success": true, "results": [{ "link": "https://a.test/1" }] }),
    );
    backend.stub(
        "POST",
        "/orm-scan/test/sentiment-analysis",
        500,
        json!({ "message": "Analysis engine crashed" }),
    );

    let err = runner(&backend).run(&request()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Step 3 of 4 (Analyzing sentiment) failed: Server error during scan. Please try again."
    );
    Ok(())
}

#[tokio::test]
async fn a_wire_timeout_maps_to_the_timeout_wording() -> Result<()> {
    let backend = FakeBackend::start().await?;
    stub_create_scan(&backend);
    backend.stub_slow(
        "POST",
        "/orm-scan/test/google-search",
        Duration::from_millis(500),
        200,
        json!({ "success": true, "results": [] }),
    );

    let runner = runner_with_timeout(&backend, Duration::from_millis(100));
    let err = runner.run(&request()).await.unwrap_err();

    assert_eq!(err.step(), Some(TriggerStep::Search));
    assert!(
        err.to_string().starts_with("Scan timed out."),
        "unexpected message: {}",
        err
    );
    Ok(())
}
