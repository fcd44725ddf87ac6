//! Cursor walk over the logs API, one request per page.

use crate::api::LogsApi;
use crate::cursor::{self, CursorOverrides};
use crate::error::LogsResult;
use crate::filter::QueryFilter;
use crate::types::{Direction, Page, PageRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
    First,
    Cursor(String),
    Exhausted,
}

/// Lazily walks the pages of one search.
///
/// The walk ends after the first page that carries no cursor. A cursor is
/// only rehydrated when the following page is requested, so a bad cursor
/// never costs the page that delivered it.
pub struct Paginator<'a> {
    api: &'a dyn LogsApi,
    first: PageRequest,
    overrides: CursorOverrides,
    position: Position,
    requests_made: usize,
}

impl<'a> Paginator<'a> {
    pub fn new(api: &'a dyn LogsApi, filter: &QueryFilter, overrides: CursorOverrides) -> Self {
        Self {
            api,
            first: PageRequest::first(filter.to_params()),
            overrides,
            position: Position::First,
            requests_made: 0,
        }
    }

    /// Fetch the next page, or `None` once the cursor chain has ended.
    ///
    /// A failed request leaves the position unchanged.
    pub async fn next_page(&mut self) -> LogsResult<Option<Page>> {
        let request = match &self.position {
            Position::First => self.first.clone(),
            Position::Cursor(next) => cursor::rehydrate(next, &self.overrides)?,
            Position::Exhausted => return Ok(None),
        };

        self.requests_made += 1;
        tracing::debug!(
            request = self.requests_made,
            path = %request.path,
            params = request.params.len(),
            "fetching page"
        );
        let page = self.api.fetch_page(&request).await?;

        self.position = match &page.next_cursor {
            Some(next) => Position::Cursor(next.clone()),
            None => Position::Exhausted,
        };
        Ok(Some(page))
    }

    /// Go back to the first-page request. Time bounds are not re-resolved.
    pub fn restart(&mut self) {
        self.position = Position::First;
    }

    pub fn is_exhausted(&self) -> bool {
        self.position == Position::Exhausted
    }

    pub fn requests_made(&self) -> usize {
        self.requests_made
    }

    pub fn is_follow(&self) -> bool {
        self.first.params.get("direction") == Some(Direction::Tail.as_str())
    }
}
