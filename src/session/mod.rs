use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted auth-token state. The token is the only client-side state the
/// console keeps between runs; everything else is refetched from the backend.
///
/// Reads are best-effort: a missing or unreadable store behaves like an
/// absent token rather than an error, so the gateway can always ask for the
/// current token without a fallible call chain.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    /// Remove the stored token. Returns true if a token was present,
    /// so callers can make session teardown fire exactly once.
    fn clear(&self) -> bool;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token persisted as JSON under the console config directory,
/// `ORM_CONSOLE_CONFIG_DIR` if set, otherwise `~/.config/ormc`.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self { dir: get_config_dir()? })
    }

    /// Store rooted at an explicit directory. Used by tests and embedders
    /// that manage their own config location.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn session_file(&self) -> PathBuf {
        self.dir.join("session.json")
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        let file = self.session_file();
        if !file.exists() {
            return None;
        }

        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read session file {}: {}", file.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) => Some(session.token),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file {}: {}", file.display(), e);
                None
            }
        }
    }

    fn set_token(&self, token: &str) {
        let session = StoredSession { token: token.to_string(), saved_at: Utc::now() };

        let result = fs::create_dir_all(&self.dir)
            .and_then(|_| {
                let content = serde_json::to_string_pretty(&session)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
                fs::write(self.session_file(), content)
            });

        if let Err(e) = result {
            tracing::error!("Failed to persist session token: {}", e);
        }
    }

    fn clear(&self) -> bool {
        let file = self.session_file();
        if !file.exists() {
            return false;
        }

        match fs::remove_file(&file) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to remove session file {}: {}", file.display(), e);
                false
            }
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_string())) }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_token(&self, token: &str) {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    fn clear(&self) -> bool {
        self.token.lock().unwrap_or_else(|e| e.into_inner()).take().is_some()
    }
}

type SessionEndFn = Box<dyn Fn() + Send + Sync>;

/// Subscription point for "session ended". The gateway notifies this after
/// a 401 has cleared the store; clearing plus notifying is idempotent, which
/// is what makes concurrent 401s from parallel requests safe.
#[derive(Clone, Default)]
pub struct SessionWatch {
    subscribers: Arc<Mutex<Vec<SessionEndFn>>>,
}

impl SessionWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(callback));
    }

    pub fn notify(&self) {
        let subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        for callback in subscribers.iter() {
            callback();
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ORM_CONSOLE_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("ormc")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}
