use once_cell::unsync::OnceCell;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::config::ThreadViewConfig;
use shared::models::{
    CurrentUser, DirectMessageThread, ErrorResponse, MessageConnection, ThreadError, ThreadResult,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wasm_bindgen::JsCast;
use web_sys::{HtmlDocument, Window};

use crate::config::{FrontendConfig, page_origin};

const CSRF_COOKIE_NAME: &str = "CSRF-TOKEN";
const CSRF_HEADER: &str = "X-CSRF-Token";

thread_local! {
    static SHARED_CLIENT: OnceCell<CourierClient> = const { OnceCell::new() };
}

/// Lightweight API client for the direct-message endpoints.
#[derive(Clone, Debug)]
pub struct CourierClient {
    config: ThreadViewConfig,
    client: Client,
    csrf_token: Arc<Mutex<Option<String>>>,
}

impl CourierClient {
    /// Create a new API client using the routes in `config`.
    pub fn new(config: ThreadViewConfig) -> Self {
        let client = Self {
            config,
            client: Client::new(),
            csrf_token: Arc::new(Mutex::new(None)),
        };

        if let Some(token) = read_cookie(CSRF_COOKIE_NAME) {
            client.set_csrf_token(Some(token));
        }

        client
    }

    pub fn shared() -> Self {
        SHARED_CLIENT.with(|cell| {
            cell.get_or_init(|| {
                Self::new(FrontendConfig::default().thread_view(page_origin().as_deref()))
            })
            .clone()
        })
    }

    pub fn config(&self) -> &ThreadViewConfig {
        &self.config
    }

    pub fn set_csrf_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.csrf_token.lock() {
            *guard = token;
        }
    }

    pub fn current_csrf_token(&self) -> Option<String> {
        self.csrf_token
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    fn apply_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.current_csrf_token() {
            request.header(CSRF_HEADER, token)
        } else {
            request
        }
    }

    async fn send(&self, request: RequestBuilder) -> ThreadResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| ThreadError::transport(err.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => Err(ThreadError::Api(body)),
            Err(_) => Err(ThreadError::transport(format!("unexpected status {status}"))),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ThreadResult<T> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|err| ThreadError::transport(err.to_string()))
    }

    /// Retrieve the signed-in viewer.
    pub async fn get_current_user(&self) -> ThreadResult<CurrentUser> {
        let url = format!("{}/me", self.config.api_base_url.trim_end_matches('/'));
        self.get_json(self.client.get(url)).await
    }

    /// Fetch thread metadata.
    pub async fn get_thread(&self, thread_id: &Uuid) -> ThreadResult<DirectMessageThread> {
        self.get_json(self.client.get(self.config.thread_url(thread_id)))
            .await
    }

    /// Fetch one page of messages, continuing after `after` when given.
    pub async fn get_thread_messages(
        &self,
        thread_id: &Uuid,
        after: Option<&str>,
    ) -> ThreadResult<MessageConnection> {
        let mut request = self
            .client
            .get(self.config.messages_url(thread_id))
            .query(&[("limit", self.config.page_size)]);
        if let Some(cursor) = after {
            request = request.query(&[("after", cursor)]);
        }
        self.get_json(request).await
    }

    /// Record that the viewer has seen the thread.
    pub async fn set_last_seen(&self, thread_id: &Uuid) -> ThreadResult<()> {
        let request = self.apply_csrf(self.client.post(self.config.last_seen_url(thread_id)));
        self.send(request).await.map(|_| ())
    }

    /// Server-sent events endpoint for new messages in a thread.
    pub fn stream_url(&self, thread_id: &Uuid) -> String {
        self.config.stream_url(thread_id)
    }
}

fn read_cookie(name: &str) -> Option<String> {
    let window: Window = web_sys::window()?;
    let document = window.document()?;
    let html_doc: HtmlDocument = document.dyn_into().ok()?;
    let cookie_string = html_doc.cookie().ok()?;
    cookie_value(&cookie_string, name)
}

fn cookie_value(cookie_string: &str, name: &str) -> Option<String> {
    cookie_string.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_lookup() {
        let cookies = "theme=dark; CSRF-TOKEN=abc123 ; session=xyz";
        assert_eq!(cookie_value(cookies, "CSRF-TOKEN"), Some("abc123".to_string()));
        assert_eq!(cookie_value(cookies, "missing"), None);
        assert_eq!(cookie_value("", "CSRF-TOKEN"), None);
    }

    #[test]
    fn test_csrf_token_round_trip() {
        let client = CourierClient {
            config: ThreadViewConfig::with_defaults(),
            client: Client::new(),
            csrf_token: Arc::new(Mutex::new(None)),
        };

        assert_eq!(client.current_csrf_token(), None);
        client.set_csrf_token(Some("token".to_string()));
        assert_eq!(client.current_csrf_token(), Some("token".to_string()));
        client.set_csrf_token(None);
        assert_eq!(client.current_csrf_token(), None);
    }

    #[test]
    fn test_stream_url_uses_config() {
        let client = CourierClient {
            config: ThreadViewConfig {
                api_base_url: "https://chat.example.com/api".to_string(),
                ..ThreadViewConfig::with_defaults()
            },
            client: Client::new(),
            csrf_token: Arc::new(Mutex::new(None)),
        };
        let thread_id = Uuid::nil();

        assert_eq!(
            client.stream_url(&thread_id),
            "https://chat.example.com/api/stream/threads/00000000-0000-0000-0000-000000000000"
        );
    }
}
