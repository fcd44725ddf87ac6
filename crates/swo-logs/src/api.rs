//! Logs API abstraction and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};

use crate::error::{LogsError, LogsResult};
use crate::types::{LogsResponse, Page, PageRequest};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches one page of logs per call.
///
/// `HttpLogsApi` talks to the real service; `MockLogsApi` (in `mock.rs`)
/// serves scripted pages for tests.
#[async_trait]
pub trait LogsApi: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> LogsResult<Page>;
}

/// Resolved endpoint and credentials.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API origin, e.g. `https://api.na-01.cloud.solarwinds.com`.
    pub api_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `reqwest`-backed logs API client.
pub struct HttpLogsApi {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl HttpLogsApi {
    pub fn new(config: ApiConfig) -> LogsResult<Self> {
        let base = Url::parse(config.api_url.trim())
            .map_err(|e| LogsError::Transport(format!("invalid API URL {}: {e}", config.api_url)))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LogsError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base,
            token: config.token,
        })
    }

    /// Absolute URL for `request`: origin joined with path, plus the query.
    pub fn url_for(&self, request: &PageRequest) -> LogsResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        let mut url =
            Url::parse(&joined).map_err(|e| LogsError::Transport(format!("{joined}: {e}")))?;
        url.set_query(None);
        if !request.params.is_empty() {
            url.query_pairs_mut().extend_pairs(request.params.pairs());
        }
        Ok(url)
    }
}

#[async_trait]
impl LogsApi for HttpLogsApi {
    async fn fetch_page(&self, request: &PageRequest) -> LogsResult<Page> {
        let url = self.url_for(request)?;
        tracing::debug!(method = "GET", url = %url, "API request");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("swo-cli/", env!("CARGO_PKG_VERSION")))
            .send()
            .await
            .map_err(|e| LogsError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status_code = status.as_u16(), status = %status, "response status");

        let content = response.bytes().await.map_err(|e| {
            LogsError::Transport(format!("error while reading http response body from SWO: {e}"))
        })?;
        tracing::debug!(length_bytes = content.len(), "response body");

        if !status.is_success() {
            return Err(LogsError::InvalidResponse {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&content).into_owned(),
            });
        }

        if content.is_empty() {
            return Err(LogsError::NoContent);
        }

        let body: LogsResponse =
            serde_json::from_slice(&content).map_err(|e| LogsError::Malformed(e.to_string()))?;
        Ok(Page::from(body))
    }
}
