//! Frontend configuration module
//!
//! Settings baked in by `build.rs` from `courier.yaml` and the environment,
//! folded into the shared [`ThreadViewConfig`].

use shared::config::ThreadViewConfig;

/// Frontend configuration for API routes and thread view tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// API base URL; relative values are resolved against the page origin
    pub api_base_url: String,
    /// Seconds of silence that start a new message group
    pub group_gap_seconds: u64,
    /// Messages requested per page
    pub page_size: u32,
    /// Server-sent event name carrying new messages
    pub stream_event: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        let defaults = ThreadViewConfig::with_defaults();
        Self {
            api_base_url: option_env!("COURIER_API_BASE_URL")
                .unwrap_or(defaults.api_base_url.as_str())
                .to_string(),
            group_gap_seconds: option_env!("COURIER_GROUP_GAP_SECONDS")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.group_gap_seconds),
            page_size: option_env!("COURIER_PAGE_SIZE")
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.page_size),
            stream_event: option_env!("COURIER_STREAM_EVENT")
                .unwrap_or(defaults.stream_event.as_str())
                .to_string(),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread view configuration with the API base resolved against `origin`.
    pub fn thread_view(&self, origin: Option<&str>) -> ThreadViewConfig {
        ThreadViewConfig {
            group_gap_seconds: self.group_gap_seconds,
            page_size: self.page_size,
            api_base_url: resolve_base_url(&self.api_base_url, origin),
            stream_event: self.stream_event.clone(),
        }
    }
}

/// HTTP clients need absolute URLs, so `/api` becomes `{origin}/api`.
pub fn resolve_base_url(base: &str, origin: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match origin {
        Some(origin) if base.starts_with('/') => {
            format!("{}{}", origin.trim_end_matches('/'), base)
        }
        _ => base.to_string(),
    }
}

/// Origin of the current page, when running in a browser.
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}
