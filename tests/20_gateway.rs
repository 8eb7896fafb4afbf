mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::{json, Value};

use common::FakeBackend;
use orm_console_rust::gateway::{ApiGateway, GatewayError};
use orm_console_rust::session::{MemorySessionStore, SessionStore};

fn gateway(backend: &FakeBackend, session: Arc<MemorySessionStore>) -> ApiGateway {
    ApiGateway::new(&backend.base_url, Duration::from_secs(5), session).expect("valid base url")
}

#[tokio::test]
async fn bearer_is_attached_only_when_a_token_is_stored() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub("GET", "/ping", 200, json!({ "ok": true }));

    let anon = gateway(&backend, Arc::new(MemorySessionStore::new()));
    let _: Value = anon.get("/ping").await?;

    let authed = gateway(&backend, Arc::new(MemorySessionStore::with_token("jwt-1")));
    let _: Value = authed.get("/ping").await?;

    let hits = backend.hits();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].bearer, None);
    assert_eq!(hits[1].bearer.as_deref(), Some("jwt-1"));
    Ok(())
}

#[tokio::test]
async fn unauthorized_clears_the_token_and_fires_session_end_once() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub("GET", "/secure", 401, json!({ "message": "Token is not valid" }));

    let session = Arc::new(MemorySessionStore::with_token("jwt-1"));
    let gw = gateway(&backend, session.clone());

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    gw.on_session_end(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let first = gw.get::<Value>("/secure").await.unwrap_err();
    assert!(matches!(first, GatewayError::Unauthorized));
    assert_eq!(session.token(), None, "401 must clear the stored token");

    // The session is already gone; a second 401 must not re-announce it.
    let second = gw.get::<Value>("/secure").await.unwrap_err();
    assert!(matches!(second, GatewayError::Unauthorized));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn empty_body_decodes_as_an_empty_object() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub_empty("DELETE", "/cleanup", 200);

    let gw = gateway(&backend, Arc::new(MemorySessionStore::new()));
    let value: Value = gw.delete("/cleanup").await?;
    assert_eq!(value, json!({}));
    Ok(())
}

#[tokio::test]
async fn server_message_surfaces_verbatim() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub("POST", "/scans", 400, json!({ "message": "Region is required" }));

    let gw = gateway(&backend, Arc::new(MemorySessionStore::new()));
    let err = gw.post::<Value, _>("/scans", &json!({})).await.unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Region is required");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn missing_server_message_falls_back_to_the_status_line() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub("GET", "/teapot", 418, json!({ "error": "smashed" }));

    let gw = gateway(&backend, Arc::new(MemorySessionStore::new()));
    let err = gw.get::<Value>("/teapot").await.unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 418);
            assert_eq!(message, "Request failed with status 418");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn slow_responses_map_to_the_timeout_error() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub_slow("GET", "/slow", Duration::from_millis(500), 200, json!({}));

    let gw = ApiGateway::new(
        &backend.base_url,
        Duration::from_millis(100),
        Arc::new(MemorySessionStore::new()),
    )?;

    let err = gw.get::<Value>("/slow").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn download_returns_exact_bytes_and_suggested_filename() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub_file("/reports/r1/download/pdf", b"%PDF-1.7 fake", "report_week3_US.pdf");

    let gw = gateway(&backend, Arc::new(MemorySessionStore::with_token("jwt-1")));
    let download = gw.get_bytes("/reports/r1/download/pdf").await?;

    assert_eq!(download.bytes, b"%PDF-1.7 fake");
    assert_eq!(download.filename.as_deref(), Some("report_week3_US.pdf"));
    Ok(())
}
