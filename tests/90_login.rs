mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use common::FakeBackend;
use orm_console_rust::api::AuthApi;
use orm_console_rust::gateway::ApiGateway;
use orm_console_rust::session::{MemorySessionStore, SessionStore};

fn auth_api(backend: &FakeBackend, session: Arc<MemorySessionStore>) -> AuthApi {
    let gateway = ApiGateway::new(&backend.base_url, Duration::from_secs(5), session)
        .expect("valid base url");
    AuthApi::new(Arc::new(gateway))
}

#[tokio::test]
async fn login_stores_the_token_and_authenticates_later_calls() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let user = json!({
        "id": "u1",
        "email": "admin@example.com",
        "role": "admin",
        "clientId": null,
        "clientName": null,
        "lastLogin": "2026-08-22T09:00:00Z"
    });
    backend.stub(
        "POST",
        "/auth/login",
        200,
        json!({ "token": "jwt-test", "user": user }),
    );
    backend.stub("GET", "/auth/me", 200, user.clone());

    let session = Arc::new(MemorySessionStore::new());
    let auth = auth_api(&backend, Arc::clone(&session));

    let logged_in = auth.login("admin@example.com", "secret").await?;
    assert!(logged_in.is_admin());
    assert_eq!(session.token().as_deref(), Some("jwt-test"));

    let me = auth.me().await?;
    assert_eq!(me.email, "admin@example.com");

    let hits = backend.hits();
    // Login itself goes out unauthenticated; everything after carries the
    // token it stored.
    assert_eq!(hits[0].bearer, None);
    assert_eq!(hits[0].body.as_ref().unwrap()["email"], "admin@example.com");
    assert_eq!(hits[1].bearer.as_deref(), Some("jwt-test"));
    Ok(())
}

#[tokio::test]
async fn failed_login_leaves_the_session_untouched() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub(
        "POST",
        "/auth/login",
        401,
        json!({ "message": "Invalid credentials" }),
    );

    let session = Arc::new(MemorySessionStore::new());
    let gateway =
        ApiGateway::new(&backend.base_url, Duration::from_secs(5), session.clone())?;
    let expired = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&expired);
    gateway.on_session_end(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    let auth = AuthApi::new(Arc::new(gateway));

    let err = auth.login("admin@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(session.token(), None);
    // There was no session to end, so the expiry hook must stay quiet.
    assert_eq!(expired.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn logout_is_local_and_reports_whether_a_token_existed() -> Result<()> {
    let backend = FakeBackend::start().await?;
    let session = Arc::new(MemorySessionStore::with_token("jwt-test"));
    let auth = auth_api(&backend, Arc::clone(&session));

    assert!(auth.logout());
    assert_eq!(session.token(), None);
    assert!(!auth.logout());
    assert!(backend.hits().is_empty(), "logout must not touch the wire");
    Ok(())
}

#[tokio::test]
async fn change_password_sends_both_fields() -> Result<()> {
    let backend = FakeBackend::start().await?;
    backend.stub(
        "PUT",
        "/auth/change-password",
        200,
        json!({ "success": true, "message": "Password changed" }),
    );

    let auth = auth_api(&backend, Arc::new(MemorySessionStore::with_token("jwt-test")));
    auth.change_password("old-secret", "new-secret").await?;

    assert_eq!(backend.hit_lines(), vec!["PUT /auth/change-password"]);
    let hits = backend.hits();
    let body = hits[0].body.as_ref().unwrap();
    assert_eq!(body["currentPassword"], "old-secret");
    assert_eq!(body["newPassword"], "new-secret");
    Ok(())
}
