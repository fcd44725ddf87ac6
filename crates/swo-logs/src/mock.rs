//! Mock logs API for testing.
//!
//! Serves a scripted queue of pages and records every request it receives.
//! Once the queue is drained it behaves like an idle server: empty page, no
//! cursor.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::LogsApi;
use crate::error::LogsResult;
use crate::types::{LogEntry, Page, PageRequest};

/// Mock logs API with scripted responses and request recording.
pub struct MockLogsApi {
    /// Responses returned by `fetch_page` (FIFO order).
    responses: Mutex<VecDeque<LogsResult<Page>>>,
    /// Every request passed to `fetch_page`.
    requests: Mutex<Vec<PageRequest>>,
    /// Simulated round-trip latency.
    delay: Option<Duration>,
}

impl MockLogsApi {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Create a mock pre-loaded with successful pages.
    pub fn with_pages(pages: Vec<Page>) -> Self {
        let mock = Self::new();
        for page in pages {
            mock.queue_page(page);
        }
        mock
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_page(&self, page: Page) {
        self.queue_response(Ok(page));
    }

    pub fn queue_response(&self, response: LogsResult<Page>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Copies of all requests received so far.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Responses still waiting to be served.
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

impl Default for MockLogsApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogsApi for MockLogsApi {
    async fn fetch_page(&self, request: &PageRequest) -> LogsResult<Page> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

// ── Fixtures ──────────────────────────────────────────────────

/// A log entry with the given message; other fields are fixed sample values.
pub fn sample_entry(message: &str) -> LogEntry {
    LogEntry {
        time: chrono::DateTime::from_timestamp(946_720_800, 0).unwrap_or_default(),
        message: message.to_string(),
        hostname: "web1".to_string(),
        severity: "INFO".to_string(),
        program: "nginx".to_string(),
    }
}

/// A page of sample entries, one per message.
pub fn sample_page(messages: &[&str], next_cursor: Option<&str>) -> Page {
    Page {
        entries: messages.iter().map(|m| sample_entry(m)).collect(),
        next_cursor: next_cursor.map(str::to_string),
    }
}
