use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Session expired. Please log in again.")]
    Unauthorized,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request timed out. The operation is taking longer than expected.")]
    Timeout,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Display message for the user; guaranteed non-empty for every variant.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Unauthorized => Some(401),
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout)
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}
