use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

/// One request the fake backend saw, in arrival order.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Empty,
    File { bytes: Vec<u8>, filename: String },
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Clone, Default)]
struct BackendState {
    hits: Arc<Mutex<Vec<Hit>>>,
    routes: Arc<Mutex<Vec<Route>>>,
}

/// In-process stand-in for the management API. Tests script the routes they
/// need and assert on the requests the console actually issued; an
/// unscripted route answers 404 so a stray request fails loudly.
pub struct FakeBackend {
    pub base_url: String,
    state: BackendState,
}

impl FakeBackend {
    pub async fn start() -> Result<Self> {
        let state = BackendState::default();
        let app = Router::new().fallback(respond).with_state(state.clone());

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind fake backend")?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    pub fn stub(&self, method: &str, path: &str, status: u16, body: Value) {
        self.push(method, path, status, Reply::Json(body), None);
    }

    pub fn stub_empty(&self, method: &str, path: &str, status: u16) {
        self.push(method, path, status, Reply::Empty, None);
    }

    pub fn stub_file(&self, path: &str, bytes: &[u8], filename: &str) {
        let reply = Reply::File {
            bytes: bytes.to_vec(),
            filename: filename.to_string(),
        };
        self.push("GET", path, 200, reply, None);
    }

    /// Scripted response that sleeps before answering, for timeout paths.
    pub fn stub_slow(&self, method: &str, path: &str, delay: Duration, status: u16, body: Value) {
        self.push(method, path, status, Reply::Json(body), Some(delay));
    }

    fn push(&self, method: &str, path: &str, status: u16, reply: Reply, delay: Option<Duration>) {
        let route = Route {
            method: method.parse().expect("valid method"),
            path: path.to_string(),
            status: StatusCode::from_u16(status).expect("valid status"),
            reply,
            delay,
        };
        self.state.routes.lock().unwrap().push(route);
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    /// `"METHOD /path"` per request, in order.
    pub fn hit_lines(&self) -> Vec<String> {
        self.hits()
            .iter()
            .map(|hit| format!("{} {}", hit.method, hit.path))
            .collect()
    }
}

async fn respond(
    State(state): State<BackendState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(String::from);

    state.hits.lock().unwrap().push(Hit {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(String::from),
        bearer,
        body: serde_json::from_slice(&body).ok(),
    });

    let route = state
        .routes
        .lock()
        .unwrap()
        .iter()
        .find(|route| route.method == method && route.path == uri.path())
        .cloned();

    let route = match route {
        Some(route) => route,
        None => {
            let body = json!({ "message": "Route not found" });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }

    match route.reply {
        Reply::Json(value) => (route.status, axum::Json(value)).into_response(),
        Reply::Empty => route.status.into_response(),
        Reply::File { bytes, filename } => {
            let disposition = format!("attachment; filename=\"{}\"", filename);
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ];
            (route.status, headers, bytes).into_response()
        }
    }
}
