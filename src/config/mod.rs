use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub list: ListConfig,
    pub trigger: TriggerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    // Long enough to cover the slowest backend pipeline (sentiment analysis)
    pub timeout_secs: u64,
    pub log_requests: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub per_page: u32,
    pub max_per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub search_results_count: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("ORM_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v;
            }
        }
        if let Ok(v) = env::var("ORM_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("ORM_API_LOG_REQUESTS") {
            self.api.log_requests = v.parse().unwrap_or(self.api.log_requests);
        }

        // List overrides
        if let Ok(v) = env::var("LIST_PER_PAGE") {
            self.list.per_page = v.parse().unwrap_or(self.list.per_page);
        }
        if let Ok(v) = env::var("LIST_MAX_PER_PAGE") {
            self.list.max_per_page = v.parse().unwrap_or(self.list.max_per_page);
        }

        // Trigger overrides
        if let Ok(v) = env::var("TRIGGER_SEARCH_RESULTS_COUNT") {
            self.trigger.search_results_count = v.parse().unwrap_or(self.trigger.search_results_count);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                timeout_secs: 300,
                log_requests: true,
            },
            list: ListConfig {
                per_page: 10,
                max_per_page: 100,
            },
            trigger: TriggerConfig {
                search_results_count: 5,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.com/api".to_string(),
                timeout_secs: 300,
                log_requests: true,
            },
            list: ListConfig {
                per_page: 10,
                max_per_page: 100,
            },
            trigger: TriggerConfig {
                search_results_count: 5,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://app.example.com/api".to_string(),
                timeout_secs: 300,
                log_requests: false,
            },
            list: ListConfig {
                per_page: 10,
                max_per_page: 50,
            },
            trigger: TriggerConfig {
                search_results_count: 5,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.timeout_secs, 300);
        assert_eq!(config.list.per_page, 10);
        assert_eq!(config.trigger.search_results_count, 5);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.api.log_requests);
        assert_eq!(config.api.timeout_secs, 300);
        assert_eq!(config.list.max_per_page, 50);
    }
}
