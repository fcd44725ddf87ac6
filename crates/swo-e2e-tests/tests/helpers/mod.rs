//! Shared test harness for E2E tests.
//!
//! Runs the real `swo logs get` pipeline (time parsing, filter, HTTP
//! pagination, follow scheduling, rendering) against a `wiremock` server
//! standing in for the SWO logs API.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use swo_cli::{Config, GetArgs, LogsGet};
use swo_logs::{FixedClock, LogsResult, ShutdownTrigger};

pub const TOKEN: &str = "e2e-token";

/// Reference "now" for every run: 2000-01-01T10:00:30Z.
pub fn reference_now() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2000, 1, 1, 10, 0, 30).unwrap())
}

/// In-memory stdout that can be read after the run, even one that failed.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    /// Parsed JSON output lines.
    pub fn json_lines(&self) -> Vec<Value> {
        self.contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.json_lines()
            .iter()
            .map(|line| line["message"].as_str().unwrap().to_string())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// E2E harness: mock logs API plus resolved config pointing at it.
pub struct TestHarness {
    pub server: MockServer,
    pub config: Config,
    pub clock: FixedClock,
}

impl TestHarness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let config = Config {
            api_url: server.uri(),
            token: TOKEN.to_string(),
        };
        Self {
            server,
            config,
            clock: reference_now(),
        }
    }

    /// `swo logs get --json` with every other flag at its default.
    pub fn args(&self) -> GetArgs {
        GetArgs {
            group: None,
            min_time: "1 hour ago".into(),
            max_time: None,
            system: None,
            json: true,
            follow: false,
            query: Vec::new(),
        }
    }

    /// Run to completion without cancellation.
    pub async fn run(&self, args: GetArgs) -> (LogsResult<()>, SharedBuffer) {
        let out = SharedBuffer::default();
        let get = LogsGet::new(&self.config, &args, &self.clock);
        let (_trigger, shutdown) = ShutdownTrigger::new();
        let result = get.run(out.clone(), shutdown).await.map(|_| ());
        (result, out)
    }

    /// Run with a short poll interval, cancelling after `cancel_after`.
    pub async fn run_cancelled(
        &self,
        args: GetArgs,
        poll_interval: Duration,
        cancel_after: Duration,
    ) -> (LogsResult<()>, SharedBuffer) {
        let out = SharedBuffer::default();
        let get = LogsGet::new(&self.config, &args, &self.clock).with_poll_interval(poll_interval);
        let (trigger, shutdown) = ShutdownTrigger::new();
        tokio::spawn(async move {
            tokio::time::sleep(cancel_after).await;
            trigger.trigger();
        });
        let result = get.run(out.clone(), shutdown).await.map(|_| ());
        (result, out)
    }

    /// Requests the mock server has seen, in arrival order.
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Serve `body` to first-page requests (no `skipToken`), at most `times` times.
    pub async fn mount_first_page(&self, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path("/v1/logs"))
            .and(query_param_is_missing("skipToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Serve `body` to requests carrying `skipToken=<token>`.
    pub async fn mount_cursor_page(&self, token: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/v1/logs"))
            .and(query_param("skipToken", token))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Empty page with no cursor for anything not matched by another mock.
    pub async fn mount_idle(&self) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&[], "")))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }
}

/// Wire body for one page.
pub fn page(messages: &[&str], next_page: &str) -> Value {
    let logs: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            json!({
                "time": format!("2000-01-01T10:00:{:02}Z", i),
                "message": message,
                "hostname": "web1",
                "severity": "INFO",
                "program": "nginx",
            })
        })
        .collect();
    json!({
        "logs": logs,
        "pageInfo": { "prevPage": "", "nextPage": next_page },
    })
}

/// Decoded query pairs of a received request.
pub fn query_pairs(request: &Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

pub fn query_value(request: &Request, key: &str) -> Option<String> {
    query_pairs(request)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}
