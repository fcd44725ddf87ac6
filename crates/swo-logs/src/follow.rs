//! Drives a [`Paginator`] to completion or, in follow mode, forever.

use std::time::Duration;

use crate::error::{LogsError, LogsResult};
use crate::paginate::Paginator;
use crate::shutdown::Shutdown;
use crate::types::Page;

/// Wait between polls after a page with no records.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Destination for fetched pages.
pub trait PageSink {
    fn write_page(&mut self, page: &Page) -> LogsResult<()>;
}

/// Walk the cursor chain once, handing every page to `sink`.
///
/// Returns the number of entries written.
pub async fn drain(
    paginator: &mut Paginator<'_>,
    sink: &mut dyn PageSink,
    shutdown: &mut Shutdown,
) -> LogsResult<usize> {
    let mut entries = 0;
    loop {
        let page = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Err(LogsError::Cancelled),
            page = paginator.next_page() => page?,
        };
        let Some(page) = page else {
            break;
        };
        entries += page.entries.len();
        sink.write_page(&page)?;
    }
    tracing::debug!(entries, requests = paginator.requests_made(), "query complete");
    Ok(entries)
}

/// Tail-mode poll loop.
pub struct FollowScheduler<'a> {
    paginator: Paginator<'a>,
    poll_interval: Duration,
}

impl<'a> FollowScheduler<'a> {
    pub fn new(paginator: Paginator<'a>, poll_interval: Duration) -> Self {
        Self {
            paginator,
            poll_interval,
        }
    }

    pub fn requests_made(&self) -> usize {
        self.paginator.requests_made()
    }

    /// Poll until cancelled or an error occurs.
    ///
    /// A cursor is followed at once unless its page was empty. Any other page
    /// is followed by a wait of `poll_interval`, and when the cursor chain
    /// ends the first-page request is issued again with the bounds it was
    /// built with. `endTime` is never part of a follow-mode request, so the
    /// window stays open.
    pub async fn run(
        &mut self,
        sink: &mut dyn PageSink,
        shutdown: &mut Shutdown,
    ) -> LogsResult<()> {
        loop {
            let page = tokio::select! {
                biased;
                _ = shutdown.cancelled() => return Err(LogsError::Cancelled),
                page = self.paginator.next_page() => page?,
            };
            let Some(page) = page else {
                self.paginator.restart();
                continue;
            };

            sink.write_page(&page)?;

            if page.is_empty() || !page.has_cursor() {
                tracing::debug!(
                    interval_ms = self.poll_interval.as_millis() as u64,
                    records = page.entries.len(),
                    "waiting for new records"
                );
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => return Err(LogsError::Cancelled),
                    _ = tokio::time::sleep(self.poll_interval) => {}
                }
            }

            if !page.has_cursor() {
                self.paginator.restart();
            }
        }
    }
}
