//! HTTP client for cookie-authenticated page fetches.

mod user_agent;

pub use user_agent::{resolve_user_agent, IMPERSONATE_USER_AGENTS, USER_AGENT};

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::cookies::CookieMap;

/// Errors from fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,
}

/// Fetches a page body as text with the given cookies attached.
#[async_trait]
pub trait FetchText: Send + Sync {
    async fn fetch_text(&self, url: &str, cookies: &CookieMap) -> Result<String, FetchError>;
}

/// Options for building an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    pub timeout: Duration,
    /// `None` for the crate user agent, `"impersonate"` for a browser one.
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
}

/// reqwest-backed fetcher.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn with_options(options: &HttpClientOptions) -> Result<Self, reqwest::Error> {
        let user_agent = resolve_user_agent(options.user_agent.as_deref());
        let mut builder = Client::builder()
            .user_agent(&user_agent)
            .timeout(options.timeout)
            .gzip(true)
            .brotli(true);

        if let Some(ref proxy) = options.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET a page and return its body as text.
    ///
    /// Non-success statuses and empty bodies are errors.
    pub async fn get_text(&self, url: &str, cookies: &CookieMap) -> Result<String, FetchError> {
        let mut request = self.client.get(url);
        if let Some(header) = cookies.header_value() {
            request = request.header(COOKIE, header);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        debug!(
            "GET {} -> {} in {}ms",
            url,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(text)
    }
}

#[async_trait]
impl FetchText for HttpClient {
    async fn fetch_text(&self, url: &str, cookies: &CookieMap) -> Result<String, FetchError> {
        self.get_text(url, cookies).await
    }
}
