//! Time expression parsing for `--min-time` / `--max-time`.
//!
//! An expression is either an absolute timestamp in one of the layouts in
//! [`layouts::LAYOUTS`] (tried in table order, first match wins) or an English
//! phrase such as `5 seconds ago` or `yesterday at noon`, resolved against a
//! reference instant. A trailing ` UTC` forces the UTC zone; otherwise
//! zone-less input is read in the local zone.
//!
//! The result is always a UTC instant; [`to_wire_time`] gives the RFC 3339
//! form the API expects.

pub mod layouts;
pub mod natural;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::clock::Clock;
use crate::error::TimeParseError;
use crate::types::to_wire_time;

const UTC_SUFFIX: &str = " UTC";

/// Zone used for input that carries no offset of its own.
#[derive(Debug, Clone, Copy)]
pub enum ZoneRef<'a, Tz: TimeZone> {
    Utc,
    Local(&'a Tz),
}

impl<Tz: TimeZone> ZoneRef<'_, Tz> {
    /// Interpret a wall-clock time in this zone.
    ///
    /// Ambiguous times (DST fold) resolve to the earlier instant; times in a
    /// DST gap do not exist and yield `None`.
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc => Some(Utc.from_utc_datetime(naive)),
            Self::Local(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Wall-clock view of `instant` in this zone.
    pub fn wall_clock(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            Self::Utc => instant.naive_utc(),
            Self::Local(tz) => instant.with_timezone(*tz).naive_local(),
        }
    }
}

/// Inputs shared by every layout and phrase parser for a single parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a, Tz: TimeZone> {
    pub zone: ZoneRef<'a, Tz>,
    pub reference: DateTime<Utc>,
}

/// Parses time expressions against a reference instant read once from a
/// [`Clock`].
#[derive(Debug, Clone)]
pub struct TimeParser<Tz: TimeZone = Local> {
    reference: DateTime<Utc>,
    local: Tz,
}

impl TimeParser<Local> {
    /// Parser anchored at `clock.now()` in the process-local zone.
    pub fn new(clock: &dyn Clock) -> Self {
        Self::with_zone(clock, Local)
    }
}

impl<Tz: TimeZone> TimeParser<Tz> {
    /// Parser anchored at `clock.now()` with an explicit local zone.
    pub fn with_zone(clock: &dyn Clock, local: Tz) -> Self {
        Self {
            reference: clock.now(),
            local,
        }
    }

    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Parse `input` into a UTC instant.
    pub fn parse(&self, input: &str) -> Result<DateTime<Utc>, TimeParseError> {
        let (body, zone) = match input.strip_suffix(UTC_SUFFIX) {
            Some(stripped) => (stripped, ZoneRef::Utc),
            None => (input, ZoneRef::Local(&self.local)),
        };
        let body = body.trim();
        let ctx = ParseContext {
            zone,
            reference: self.reference,
        };

        if let Some((layout, instant)) = layouts::parse_any(body, &ctx) {
            tracing::debug!(input, layout = layout.name, "parsed absolute time");
            return Ok(instant);
        }

        if let Some(instant) = natural::parse(body, &ctx) {
            tracing::debug!(input, "parsed relative time");
            return Ok(instant);
        }

        // Layouts that carry a zone abbreviation need their ` UTC` token back.
        if let ZoneRef::Utc = ctx.zone {
            if let Some((layout, instant)) = layouts::parse_any(input.trim(), &ctx) {
                tracing::debug!(input, layout = layout.name, "parsed absolute time");
                return Ok(instant);
            }
        }

        Err(TimeParseError::Unrecognized(input.to_string()))
    }

    /// Parse `input` and format it for the wire.
    pub fn parse_rfc3339(&self, input: &str) -> Result<String, TimeParseError> {
        self.parse(input).map(|instant| to_wire_time(&instant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::FixedOffset;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 10, 0, 30).unwrap()
    }

    fn utc_parser() -> TimeParser<Utc> {
        TimeParser::with_zone(&FixedClock(reference()), Utc)
    }

    fn plus_two_parser() -> TimeParser<FixedOffset> {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        TimeParser::with_zone(&FixedClock(reference()), offset)
    }

    #[test]
    fn rfc3339_round_trips() {
        let parser = utc_parser();
        assert_eq!(
            parser.parse_rfc3339("2000-01-01T12:13:14Z").unwrap(),
            "2000-01-01T12:13:14Z"
        );
    }

    #[test]
    fn rfc822_with_abbreviation() {
        let parser = utc_parser();
        assert_eq!(
            parser.parse_rfc3339("04 Feb 00 13:14 MST").unwrap(),
            "2000-02-04T13:14:00Z"
        );
    }

    #[test]
    fn seconds_ago_and_in_seconds() {
        let parser = utc_parser();
        assert_eq!(
            parser.parse_rfc3339("5 seconds ago").unwrap(),
            "2000-01-01T10:00:25Z"
        );
        assert_eq!(
            parser.parse_rfc3339("in 5 seconds").unwrap(),
            "2000-01-01T10:00:35Z"
        );
        assert_eq!(
            parser.parse_rfc3339("10 seconds ago").unwrap(),
            "2000-01-01T10:00:20Z"
        );
    }

    #[test]
    fn utc_suffix_is_stripped() {
        let parser = utc_parser();
        assert_eq!(
            parser.parse_rfc3339("2024-05-13 13:00:00 UTC").unwrap(),
            "2024-05-13T13:00:00Z"
        );
    }

    #[test]
    fn utc_abbreviation_layouts_keep_their_zone_token() {
        let parser = plus_two_parser();
        for (input, expected) in [
            ("Mon, 02 Jan 2006 15:04:05 UTC", "2006-01-02T15:04:05Z"),
            ("02 Jan 06 15:04 UTC", "2006-01-02T15:04:00Z"),
            ("Monday, 02-Jan-06 15:04:05 UTC", "2006-01-02T15:04:05Z"),
            ("Mon Jan  2 15:04:05 UTC 2006", "2006-01-02T15:04:05Z"),
        ] {
            assert_eq!(parser.parse_rfc3339(input).as_deref(), Ok(expected), "{input}");
        }
    }

    #[test]
    fn utc_suffix_overrides_local_zone() {
        let parser = plus_two_parser();
        assert_eq!(
            parser.parse_rfc3339("2024-05-13 13:00:00 UTC").unwrap(),
            "2024-05-13T13:00:00Z"
        );
        // Without the suffix the same wall-clock time is read at +02:00.
        assert_eq!(
            parser.parse_rfc3339("2024-05-13 13:00:00").unwrap(),
            "2024-05-13T11:00:00Z"
        );
    }

    #[test]
    fn explicit_offset_ignores_local_zone() {
        let parser = plus_two_parser();
        assert_eq!(
            parser.parse_rfc3339("2024-05-13T13:00:00-05:00").unwrap(),
            "2024-05-13T18:00:00Z"
        );
    }

    #[test]
    fn relative_phrases_do_not_depend_on_zone() {
        assert_eq!(
            plus_two_parser().parse("1 hour ago").unwrap(),
            utc_parser().parse("1 hour ago").unwrap()
        );
    }

    #[test]
    fn unrecognized_input_fails() {
        let err = utc_parser().parse("what?").unwrap_err();
        assert_eq!(err, TimeParseError::Unrecognized("what?".into()));
    }

    #[test]
    fn reference_is_read_once() {
        let parser = utc_parser();
        assert_eq!(parser.reference(), reference());
        assert_eq!(parser.parse("now").unwrap(), reference());
        assert_eq!(parser.parse("now").unwrap(), parser.parse("now").unwrap());
    }
}
