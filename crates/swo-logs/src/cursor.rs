//! Continuation cursor handling.
//!
//! The server's `nextPage` is a relative URL whose query string carries the
//! complete state of the next request. It is parsed into [`QueryParams`]
//! wholesale; the client then applies a short, explicit list of
//! [`OverrideRule`]s on top. Nothing else is recomputed locally.

use reqwest::Url;

use crate::error::{LogsError, LogsResult};
use crate::filter::QueryFilter;
use crate::types::{PageRequest, QueryParams};

/// Base used only to resolve relative cursors; its origin is discarded.
const CURSOR_BASE: &str = "http://cursor.invalid/";

/// A key-level edit applied to cursor parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideRule {
    /// Drop every value of the key.
    Remove(String),
    /// Replace every value of the key with one value.
    Set(String, String),
}

impl OverrideRule {
    fn apply(&self, params: &mut QueryParams) {
        match self {
            Self::Remove(key) => params.remove(key),
            Self::Set(key, value) => params.set(key.as_str(), value.as_str()),
        }
    }
}

/// Client-owned overrides merged over every cursor-derived request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorOverrides {
    rules: Vec<OverrideRule>,
}

impl CursorOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    /// Overrides implied by a search: follow mode keeps the window open-ended
    /// by stripping `endTime`.
    pub fn for_filter(filter: &QueryFilter) -> Self {
        let mut overrides = Self::none();
        if filter.is_follow() {
            overrides.push(OverrideRule::Remove("endTime".into()));
        }
        overrides
    }

    pub fn push(&mut self, rule: OverrideRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    /// Apply every rule, in order.
    pub fn apply(&self, params: &mut QueryParams) {
        for rule in &self.rules {
            rule.apply(params);
        }
    }
}

/// Turn a `nextPage` value into the next request.
///
/// Only the path and query are kept; the request always goes to the
/// configured API origin.
pub fn rehydrate(next_page: &str, overrides: &CursorOverrides) -> LogsResult<PageRequest> {
    let base = Url::parse(CURSOR_BASE).map_err(|e| LogsError::InvalidCursor(e.to_string()))?;
    let url = base
        .join(next_page.trim())
        .map_err(|e| LogsError::InvalidCursor(format!("{next_page}: {e}")))?;

    let mut params: QueryParams = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    overrides.apply(&mut params);

    Ok(PageRequest {
        path: url.path().trim_start_matches('/').to_string(),
        params,
    })
}
