//! Command dispatch and the `logs get` pipeline.

use std::io::{BufWriter, Write};
use std::time::Duration;

use chrono::TimeZone;
use swo_logs::{
    ApiConfig, Clock, CursorOverrides, DEFAULT_POLL_INTERVAL, FollowScheduler, HttpLogsApi,
    LogsError, LogsResult, OutputFormat, Paginator, QueryFilter, Renderer, Shutdown, SystemClock,
    TimeParser, TimeRange, drain,
};

use crate::cli::{Cli, Command, GetArgs, LogsCommand};
use crate::config::Config;

/// Run the parsed command line to completion.
///
/// A follow run stopped by `shutdown` counts as success; see [`finish`].
pub async fn run(cli: Cli, shutdown: Shutdown) -> anyhow::Result<()> {
    let config = Config::load(cli.api_url.clone(), cli.api_token.clone(), &cli.config)?;

    match &cli.command {
        Command::Logs {
            command: LogsCommand::Get(args),
        } => {
            let get = LogsGet::new(&config, args, &SystemClock);
            let out = BufWriter::new(std::io::stdout());
            finish(args, get.run(out, shutdown).await)
        }
    }
}

/// Map the outcome of `logs get` to the process result.
///
/// Only a follow run may end by cancellation without error.
pub fn finish<T>(args: &GetArgs, result: LogsResult<T>) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(LogsError::Cancelled) if args.follow => {
            tracing::info!("follow cancelled");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// One `swo logs get` invocation.
pub struct LogsGet<'a> {
    config: &'a Config,
    args: &'a GetArgs,
    clock: &'a dyn Clock,
    poll_interval: Duration,
}

impl<'a> LogsGet<'a> {
    pub fn new(config: &'a Config, args: &'a GetArgs, clock: &'a dyn Clock) -> Self {
        Self {
            config,
            args,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Resolve the time bounds, fetch, and render into `out`.
    ///
    /// Returns the writer once a non-follow query completes.
    pub async fn run<W: Write>(&self, out: W, mut shutdown: Shutdown) -> LogsResult<W> {
        let parser = TimeParser::new(self.clock);
        let filter = build_filter(self.args, &parser)?;
        tracing::debug!(
            direction = %filter.direction,
            start = ?filter.range.start,
            end = ?filter.range.end,
            "query prepared"
        );

        let api = HttpLogsApi::new(ApiConfig::new(&self.config.api_url, &self.config.token))?;
        let mut paginator = Paginator::new(&api, &filter, CursorOverrides::for_filter(&filter));
        let mut renderer = Renderer::new(out, output_format(self.args));

        if filter.is_follow() {
            let mut scheduler = FollowScheduler::new(paginator, self.poll_interval);
            scheduler.run(&mut renderer, &mut shutdown).await?;
        } else {
            drain(&mut paginator, &mut renderer, &mut shutdown).await?;
        }
        Ok(renderer.into_inner())
    }
}

pub fn output_format(args: &GetArgs) -> OutputFormat {
    if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

/// Build the search from command-line arguments. Bounds are parsed once here.
pub fn build_filter<Tz: TimeZone>(
    args: &GetArgs,
    parser: &TimeParser<Tz>,
) -> LogsResult<QueryFilter> {
    let start = parse_bound(Some(args.min_time.as_str()), parser).map_err(LogsError::MinTime)?;
    let end = parse_bound(args.max_time.as_deref(), parser).map_err(LogsError::MaxTime)?;

    let mut builder = QueryFilter::builder()
        .args(args.query.iter().cloned())
        .follow(args.follow)
        .range(TimeRange::new(start, end));
    if let Some(group) = &args.group {
        builder = builder.group(group.as_str());
    }
    if let Some(system) = &args.system {
        builder = builder.system(system.as_str());
    }
    Ok(builder.build())
}

fn parse_bound<Tz: TimeZone>(
    input: Option<&str>,
    parser: &TimeParser<Tz>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, swo_logs::TimeParseError> {
    match input.filter(|s| !s.trim().is_empty()) {
        Some(input) => parser.parse(input).map(Some),
        None => Ok(None),
    }
}
