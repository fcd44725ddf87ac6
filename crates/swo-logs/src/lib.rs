//! Log query engine for the SolarWinds Observability logs API.
//!
//! Resolves human time expressions, builds the search query, walks the
//! API's cursor-paginated results, optionally keeps polling in follow
//! mode, and renders entries as text lines or JSON lines.

pub mod api;
pub mod clock;
pub mod cursor;
pub mod error;
pub mod filter;
pub mod follow;
pub mod mock;
pub mod paginate;
pub mod render;
pub mod shutdown;
pub mod timeparse;
pub mod types;

// Re-export key types for convenience
pub use api::{ApiConfig, HttpLogsApi, LogsApi};
pub use clock::{Clock, FixedClock, SystemClock};
pub use cursor::{CursorOverrides, OverrideRule};
pub use error::{LogsError, LogsResult, TimeParseError};
pub use filter::{QueryFilter, QueryFilterBuilder};
pub use follow::{DEFAULT_POLL_INTERVAL, FollowScheduler, PageSink, drain};
pub use mock::MockLogsApi;
pub use paginate::Paginator;
pub use render::{OutputFormat, Renderer};
pub use shutdown::{Shutdown, ShutdownTrigger};
pub use timeparse::TimeParser;
pub use types::{Direction, LogEntry, Page, PageRequest, QueryParams, TimeRange};
