//! Terminal and JSON-lines output for log entries.

use std::fmt::Display;
use std::io::Write;

use chrono::{DateTime, Local, Offset, TimeZone, Utc};
use serde::Serialize;

use crate::error::{LogsError, LogsResult};
use crate::follow::PageSink;
use crate::types::{LogEntry, Page};

/// Timestamp layout for text output, e.g. `Jan 02 15:04:05`.
pub const TEXT_TIME_FORMAT: &str = "%b %d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One JSON output line. Field order matches the wire payload.
#[derive(Serialize)]
struct JsonLine<'a> {
    time: String,
    message: &'a str,
    hostname: &'a str,
    severity: &'a str,
    program: &'a str,
}

/// Writes entries to `W`, timestamps shown in zone `Tz`.
pub struct Renderer<W: Write, Tz: TimeZone = Local> {
    out: W,
    format: OutputFormat,
    zone: Tz,
}

impl<W: Write> Renderer<W, Local> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self::with_zone(out, format, Local)
    }
}

impl<W: Write, Tz: TimeZone> Renderer<W, Tz>
where
    Tz::Offset: Display,
{
    pub fn with_zone(out: W, format: OutputFormat, zone: Tz) -> Self {
        Self { out, format, zone }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write `entries` in the order given, then flush.
    pub fn render(&mut self, entries: &[LogEntry]) -> LogsResult<()> {
        for entry in entries {
            self.render_entry(entry)?;
        }
        self.out.flush().map_err(render_error)
    }

    fn render_entry(&mut self, entry: &LogEntry) -> LogsResult<()> {
        let time = self.localize(&entry.time);
        match self.format {
            OutputFormat::Text => writeln!(
                self.out,
                "{} {} {} {}",
                time.format(TEXT_TIME_FORMAT),
                entry.hostname,
                entry.program,
                entry.message
            )
            .map_err(render_error),
            OutputFormat::Json => {
                let line = JsonLine {
                    time: json_time(&time),
                    message: &entry.message,
                    hostname: &entry.hostname,
                    severity: &entry.severity,
                    program: &entry.program,
                };
                serde_json::to_writer(&mut self.out, &line)
                    .map_err(|e| LogsError::Render(e.to_string()))?;
                self.out.write_all(b"\n").map_err(render_error)
            }
        }
    }

    fn localize(&self, time: &DateTime<Utc>) -> DateTime<Tz> {
        time.with_timezone(&self.zone)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, Tz: TimeZone> PageSink for Renderer<W, Tz>
where
    Tz::Offset: Display,
{
    fn write_page(&mut self, page: &Page) -> LogsResult<()> {
        self.render(&page.entries)
    }
}

/// RFC 3339 with nanosecond precision, trailing fraction zeros trimmed and
/// `Z` for a zero offset: `2000-01-01T10:00:01.5Z`.
fn json_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let mut out = time.format("%Y-%m-%dT%H:%M:%S%.9f").to_string();
    let trimmed = out.trim_end_matches('0').trim_end_matches('.').len();
    out.truncate(trimmed);
    if time.offset().fix().local_minus_utc() == 0 {
        out.push('Z');
    } else {
        out.push_str(&time.format("%:z").to_string());
    }
    out
}

fn render_error(e: std::io::Error) -> LogsError {
    LogsError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn entry(time: &str, message: &str) -> LogEntry {
        LogEntry {
            time: DateTime::parse_from_rfc3339(time).unwrap().with_timezone(&Utc),
            message: message.into(),
            hostname: "web1".into(),
            severity: "INFO".into(),
            program: "nginx".into(),
        }
    }

    fn render_utc(format: OutputFormat, entries: &[LogEntry]) -> String {
        let mut renderer = Renderer::with_zone(Vec::new(), format, Utc);
        renderer.render(entries).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn text_line_layout() {
        let out = render_utc(
            OutputFormat::Text,
            &[entry("2006-01-02T15:04:05Z", "GET /index.html 200")],
        );
        assert_eq!(out, "Jan 02 15:04:05 web1 nginx GET /index.html 200\n");
    }

    #[test]
    fn text_uses_renderer_zone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut renderer = Renderer::with_zone(Vec::new(), OutputFormat::Text, plus_two);
        renderer
            .render(&[entry("2006-01-02T23:04:05Z", "late")])
            .unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.starts_with("Jan 03 01:04:05 "));
    }

    #[test]
    fn json_is_one_object_per_line() {
        let out = render_utc(
            OutputFormat::Json,
            &[
                entry("2000-01-01T10:00:00Z", "first"),
                entry("2000-01-01T10:00:01.5Z", "second"),
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"time":"2000-01-01T10:00:00Z","message":"first","hostname":"web1","severity":"INFO","program":"nginx"}"#
        );
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["time"], "2000-01-01T10:00:01.5Z");
        assert_eq!(second["message"], "second");
    }

    #[test]
    fn json_time_carries_renderer_offset() {
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let mut renderer = Renderer::with_zone(Vec::new(), OutputFormat::Json, minus_five);
        renderer.render(&[entry("2000-01-01T10:00:00Z", "m")]).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["time"], "2000-01-01T05:00:00-05:00");
    }

    #[test]
    fn json_time_trims_fraction_zeros() {
        let cases = [
            ("2000-01-01T10:00:01.120Z", "2000-01-01T10:00:01.12Z"),
            ("2000-01-01T10:00:01.000001Z", "2000-01-01T10:00:01.000001Z"),
            ("2000-01-01T10:00:01.123456789Z", "2000-01-01T10:00:01.123456789Z"),
            ("2000-01-01T10:00:10Z", "2000-01-01T10:00:10Z"),
        ];
        for (input, expected) in cases {
            let time = DateTime::parse_from_rfc3339(input).unwrap().with_timezone(&Utc);
            assert_eq!(json_time(&time), expected, "{input}");
        }
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let time = DateTime::parse_from_rfc3339("2000-01-01T10:00:00.250Z").unwrap();
        assert_eq!(json_time(&time.with_timezone(&plus_two)), "2000-01-01T12:00:00.25+02:00");
    }

    #[test]
    fn order_is_preserved_and_empty_renders_nothing() {
        let out = render_utc(
            OutputFormat::Text,
            &[
                entry("2000-01-01T10:00:05Z", "newer"),
                entry("2000-01-01T10:00:01Z", "older"),
            ],
        );
        let messages: Vec<&str> = out.lines().map(|l| l.rsplit(' ').next().unwrap()).collect();
        assert_eq!(messages, ["newer", "older"]);

        assert_eq!(render_utc(OutputFormat::Json, &[]), "");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_render_error() {
        let mut renderer = Renderer::with_zone(FailingWriter, OutputFormat::Text, Utc);
        let err = renderer
            .write_page(&Page {
                entries: vec![entry("2000-01-01T10:00:00Z", "m")],
                next_cursor: None,
            })
            .unwrap_err();
        assert!(matches!(err, LogsError::Render(_)));
    }
}
