//! # Thread View Configuration
//!
//! Tunables for the direct-message thread view and the API routes it talks to.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::threads::AuthorGrouper;

/// Errors produced while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file has an unknown extension
    #[error("Unsupported configuration format. Use 'yaml' or 'json'.")]
    UnsupportedFormat,

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration: {details}")]
    Parse { details: String },

    /// An environment override held an unusable value
    #[error("Invalid {var} value: {message}")]
    InvalidEnv { var: &'static str, message: String },

    /// Validation found one or more problems
    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Configuration for the thread view
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThreadViewConfig {
    /// Silence, in seconds, after which a new group and time marker start
    pub group_gap_seconds: u64,

    /// Messages requested per page
    pub page_size: u32,

    /// Base URL of the REST API, without trailing slash
    pub api_base_url: String,

    /// Server-sent event name carrying new messages
    pub stream_event: String,
}

impl Default for ThreadViewConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ThreadViewConfig {
    /// Generates a default configuration.
    pub fn with_defaults() -> Self {
        Self {
            group_gap_seconds: AuthorGrouper::DEFAULT_GAP_SECONDS,
            page_size: 50,
            api_base_url: "/api".to_string(),
            stream_event: "message.new".to_string(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Values set by the file win over environment variables, which only
    /// fill in settings still at their defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_config(config_path: Option<std::path::PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::with_defaults();

        if let Some(path) = config_path {
            let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            config = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => serde_yml::from_str(&content).map_err(|err| {
                    ConfigError::Parse {
                        details: err.to_string(),
                    }
                })?,
                Some("json") => {
                    serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
                        details: err.to_string(),
                    })?
                }
                _ => return Err(ConfigError::UnsupportedFormat),
            };
        }

        config.apply_env_overrides()?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Apply `COURIER_*` environment variables to settings left at defaults.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        use std::env;

        let defaults = Self::with_defaults();

        if self.group_gap_seconds == defaults.group_gap_seconds
            && let Ok(value) = env::var("COURIER_GROUP_GAP_SECONDS")
        {
            self.group_gap_seconds = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "COURIER_GROUP_GAP_SECONDS",
                message: "must be a whole number of seconds".to_string(),
            })?;
        }
        if self.page_size == defaults.page_size
            && let Ok(value) = env::var("COURIER_PAGE_SIZE")
        {
            self.page_size = value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "COURIER_PAGE_SIZE",
                message: "must be a positive number".to_string(),
            })?;
        }
        if self.api_base_url == defaults.api_base_url
            && let Ok(value) = env::var("COURIER_API_BASE_URL")
        {
            self.api_base_url = value;
        }
        Ok(())
    }

    /// Validate the configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.page_size == 0 {
            errors.push("Invalid page size. Must be greater than 0.".to_string());
        }
        if self.api_base_url.trim().is_empty() {
            errors.push("API base URL must not be empty.".to_string());
        }
        if self.stream_event.trim().is_empty() {
            errors.push("Stream event name must not be empty.".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Grouper configured with this gap.
    pub fn grouper(&self) -> AuthorGrouper {
        AuthorGrouper::with_gap_seconds(self.group_gap_seconds)
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn thread_url(&self, thread_id: &Uuid) -> String {
        self.api_url(&format!("threads/{thread_id}"))
    }

    pub fn messages_url(&self, thread_id: &Uuid) -> String {
        self.api_url(&format!("threads/{thread_id}/messages"))
    }

    pub fn last_seen_url(&self, thread_id: &Uuid) -> String {
        self.api_url(&format!("threads/{thread_id}/last-seen"))
    }

    pub fn stream_url(&self, thread_id: &Uuid) -> String {
        self.api_url(&format!("stream/threads/{thread_id}"))
    }
}
