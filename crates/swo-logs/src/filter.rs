//! Search filter assembly for the first page of a logs query.

use crate::types::{Direction, QueryParams, TimeRange, to_wire_time};

/// Page size sent with every first-page request.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Everything that goes into the first-page query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub group: Option<String>,
    pub free_text: Option<String>,
    pub direction: Direction,
    pub page_size: u32,
    pub range: TimeRange,
}

impl QueryFilter {
    pub fn builder() -> QueryFilterBuilder {
        QueryFilterBuilder::default()
    }

    /// Query parameters for the first page, in wire order.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("direction", self.direction.as_str());
        params.push("pageSize", self.page_size.to_string());
        if let Some(group) = &self.group {
            params.push("group", group.as_str());
        }
        if let Some(start) = &self.range.start {
            params.push("startTime", to_wire_time(start));
        }
        if let Some(end) = &self.range.end {
            params.push("endTime", to_wire_time(end));
        }
        if let Some(filter) = &self.free_text {
            params.push("filter", filter.as_str());
        }
        params
    }

    pub fn is_follow(&self) -> bool {
        self.direction == Direction::Tail
    }
}

/// Collects the independent inputs of a search. Building cannot fail.
#[derive(Debug, Clone, Default)]
pub struct QueryFilterBuilder {
    group: Option<String>,
    system: Option<String>,
    args: Vec<String>,
    follow: bool,
    page_size: Option<u32>,
    range: TimeRange,
}

impl QueryFilterBuilder {
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Restrict to one host; becomes a `host:"<system>"` clause.
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Positional free-text search terms, passed through verbatim.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn build(self) -> QueryFilter {
        QueryFilter {
            group: self.group.filter(|g| !g.is_empty()),
            free_text: free_text(self.system.as_deref(), &self.args),
            direction: if self.follow {
                Direction::Tail
            } else {
                Direction::Forward
            },
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            range: self.range,
        }
    }
}

/// `host:"<system>"` followed by the search terms, space separated.
fn free_text(system: Option<&str>, args: &[String]) -> Option<String> {
    let host = system
        .filter(|s| !s.is_empty())
        .map(|s| format!("host:\"{s}\""));
    let terms = (!args.is_empty()).then(|| args.join(" "));

    match (host, terms) {
        (Some(host), Some(terms)) => Some(format!("{host} {terms}")),
        (Some(host), None) => Some(host),
        (None, terms) => terms.filter(|t| !t.is_empty()),
    }
}
