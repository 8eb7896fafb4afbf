//! Single point of HTTP egress for the console.
//!
//! Every backend call goes through [`ApiGateway`]: one configured client that
//! owns the base URL, the request timeout, bearer-token attachment, and
//! response/error normalization. Callers never see raw transport errors and
//! never handle 401 themselves; an unauthorized response tears down the
//! session globally and surfaces as [`GatewayError::Unauthorized`].

pub mod error;

pub use error::GatewayError;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::config;
use crate::session::{SessionStore, SessionWatch};

pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    watch: SessionWatch,
    log_requests: bool,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .field("log_requests", &self.log_requests)
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    /// Gateway pointed at the configured base URL with the configured timeout.
    pub fn from_config(session: Arc<dyn SessionStore>) -> Result<Self, GatewayError> {
        let cfg = config();
        Self::new(&cfg.api.base_url, Duration::from_secs(cfg.api.timeout_secs), session)
    }

    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, GatewayError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| GatewayError::InvalidBaseUrl(base_url.clone()))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            session,
            watch: SessionWatch::new(),
            log_requests: config().api.log_requests,
        })
    }

    /// Register a callback invoked when a 401 ends the session.
    pub fn on_session_end(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.watch.subscribe(callback);
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(Method::GET, path, None::<&Value>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST without a body, for action endpoints like enable-auto-scan.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(Method::POST, path, None::<&Value>).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.request(Method::DELETE, path, None::<&Value>).await
    }

    /// Binary GET for file downloads (report PDF/Excel exports).
    pub async fn get_bytes(&self, path: &str) -> Result<Download, GatewayError> {
        let response = self.send(Method::GET, path, None::<&Value>).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.end_session();
            return Err(GatewayError::Unauthorized);
        }

        let filename = suggested_filename(&response);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_message(&text, status),
            });
        }

        let bytes = response.bytes().await.map_err(GatewayError::from_transport)?;
        Ok(Download { bytes: bytes.to_vec(), filename })
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        self.decode(path, response).await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, GatewayError> {
        let url = self.endpoint(path)?;

        if self.log_requests {
            tracing::debug!("{} {}", method, url);
        }

        let mut request = self.http.request(method, url);

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(GatewayError::from_transport)
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.end_session();
            return Err(GatewayError::Unauthorized);
        }

        let text = response.text().await.map_err(GatewayError::from_transport)?;

        if !status.is_success() {
            tracing::warn!("{} returned {}", path, status);
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message: error_message(&text, status),
            });
        }

        // An empty body still resolves to a value, so callers can always
        // destructure the payload.
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(format!("{} from {}", e, path)))
    }

    /// Clear the session and announce the teardown. Only the request that
    /// actually removed the token notifies; racing 401s find the store
    /// already empty and do nothing.
    fn end_session(&self) {
        if self.session.clear() {
            tracing::warn!("Received 401, session ended");
            self.watch.notify();
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        let full = format!("{}{}", self.base_url, path);
        Url::parse(&full).map_err(|_| GatewayError::InvalidPath(path.to_string()))
    }
}

/// Result of a binary download, with the server-suggested filename when a
/// Content-Disposition header carried one.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
}

/// Best server-provided message for a failed response, falling back to a
/// status-derived one so the error always carries usable text.
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    format!("Request failed with status {}", status.as_u16())
}

fn suggested_filename(response: &Response) -> Option<String> {
    let header = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;

    header.split(';').find_map(|part| {
        part.trim()
            .strip_prefix("filename=")
            .map(|name| name.trim_matches('"').to_string())
    })
}
