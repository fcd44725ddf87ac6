//! Core log query types: wire payloads, pages, and request parameters.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ── Log Entry ─────────────────────────────────────────────────

/// A single log record as returned by the logs API.
///
/// Field names are the wire names; JSON output reuses them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub program: String,
}

// ── Wire Response ─────────────────────────────────────────────

/// `pageInfo` block of a logs response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Body of `GET /v1/logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub page_info: PageInfo,
}

// ── Page ──────────────────────────────────────────────────────

/// One page of results plus the continuation cursor, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub entries: Vec<LogEntry>,
    /// Server-relative URL of the next page. Never an empty string.
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_cursor(&self) -> bool {
        self.next_cursor.is_some()
    }
}

impl From<LogsResponse> for Page {
    fn from(resp: LogsResponse) -> Self {
        let next_cursor = resp
            .page_info
            .next_page
            .filter(|cursor| !cursor.trim().is_empty());
        Self {
            entries: resp.logs,
            next_cursor,
        }
    }
}

// ── Direction ─────────────────────────────────────────────────

/// Order in which the API walks the result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Tail,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Tail => "tail",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Time Range ────────────────────────────────────────────────

/// Start/end bounds of a search. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }
}

/// Format an instant the way the API expects range bounds.
pub fn to_wire_time(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ── Query Params ──────────────────────────────────────────────

/// Ordered query-string pairs. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Remove every value for `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Replace every value for `key` with a single one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.remove(&key);
        self.pairs.push((key, value.into()));
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

// ── Page Request ──────────────────────────────────────────────

/// Path of the logs search endpoint, relative to the API origin.
pub const LOGS_PATH: &str = "v1/logs";

/// Everything one GET needs, relative to the configured API origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub params: QueryParams,
}

impl PageRequest {
    pub fn first(params: QueryParams) -> Self {
        Self {
            path: LOGS_PATH.to_string(),
            params,
        }
    }
}
