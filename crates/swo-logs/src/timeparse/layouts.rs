//! Ordered table of absolute timestamp layouts.
//!
//! Order is precedence: [`parse_any`] returns the first entry that accepts the
//! whole input. Entries are named after the conventional layout they accept.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::{ParseContext, ZoneRef};

/// How a layout's pattern is applied and where its offset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    /// Carries a numeric offset (`%z`).
    Offset,
    /// RFC 3339, with or without fractional seconds.
    Rfc3339,
    /// Carries a zone abbreviation such as `MST` (`%Z`).
    Abbrev,
    /// Full date and time without any zone.
    Naive,
    /// Month, day and time; the year comes from the reference instant.
    Yearless,
    /// Date only; midnight.
    DateOnly,
    /// Time only; the date comes from the reference instant.
    TimeOnly,
}

/// One absolute layout.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub name: &'static str,
    pub pattern: &'static str,
    pub kind: LayoutKind,
}

impl Layout {
    const fn new(name: &'static str, pattern: &'static str, kind: LayoutKind) -> Self {
        Self {
            name,
            pattern,
            kind,
        }
    }

    /// Parse `input` with this layout alone.
    pub fn parse<Tz: TimeZone>(
        &self,
        input: &str,
        ctx: &ParseContext<'_, Tz>,
    ) -> Option<DateTime<Utc>> {
        match self.kind {
            LayoutKind::Offset => DateTime::parse_from_str(input, self.pattern)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            LayoutKind::Rfc3339 => DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            LayoutKind::Abbrev => {
                let abbrev = zone_abbreviation(input)?;
                let naive = NaiveDateTime::parse_from_str(input, self.pattern).ok()?;
                if is_utc_abbreviation(abbrev) {
                    ZoneRef::<Tz>::Utc.localize(&naive)
                } else {
                    ctx.zone.localize(&naive)
                }
            }
            LayoutKind::Naive => {
                let naive = NaiveDateTime::parse_from_str(input, self.pattern).ok()?;
                ctx.zone.localize(&naive)
            }
            LayoutKind::Yearless => {
                let year = ctx.zone.wall_clock(&ctx.reference).year();
                let with_year = format!("{year} {input}");
                let naive = NaiveDateTime::parse_from_str(&with_year, self.pattern).ok()?;
                ctx.zone.localize(&naive)
            }
            LayoutKind::DateOnly => {
                let date = NaiveDate::parse_from_str(input, self.pattern).ok()?;
                ctx.zone.localize(&date.and_time(NaiveTime::MIN))
            }
            LayoutKind::TimeOnly => {
                let time = NaiveTime::parse_from_str(input, self.pattern).ok()?;
                let date = ctx.zone.wall_clock(&ctx.reference).date();
                ctx.zone.localize(&date.and_time(time))
            }
        }
    }
}

/// Absolute layouts in precedence order.
pub const LAYOUTS: &[Layout] = &[
    Layout::new("Layout", "%m/%d %I:%M:%S%p '%y %z", LayoutKind::Offset),
    Layout::new("ANSIC", "%a %b %e %H:%M:%S %Y", LayoutKind::Naive),
    Layout::new("UnixDate", "%a %b %e %H:%M:%S %Z %Y", LayoutKind::Abbrev),
    Layout::new("RubyDate", "%a %b %d %H:%M:%S %z %Y", LayoutKind::Offset),
    Layout::new("RFC822", "%d %b %y %H:%M %Z", LayoutKind::Abbrev),
    Layout::new("RFC822Z", "%d %b %y %H:%M %z", LayoutKind::Offset),
    Layout::new("RFC850", "%A, %d-%b-%y %H:%M:%S %Z", LayoutKind::Abbrev),
    Layout::new("RFC1123", "%a, %d %b %Y %H:%M:%S %Z", LayoutKind::Abbrev),
    Layout::new("RFC1123Z", "%a, %d %b %Y %H:%M:%S %z", LayoutKind::Offset),
    Layout::new("RFC3339", "%Y-%m-%dT%H:%M:%S%:z", LayoutKind::Rfc3339),
    Layout::new("RFC3339Nano", "%Y-%m-%dT%H:%M:%S%.f%:z", LayoutKind::Rfc3339),
    Layout::new("ISO8601", "%Y-%m-%dT%H:%M:%S%.f", LayoutKind::Naive),
    Layout::new("Kitchen", "%I:%M%p", LayoutKind::TimeOnly),
    Layout::new("Stamp", "%Y %b %e %H:%M:%S", LayoutKind::Yearless),
    Layout::new("StampMilli", "%Y %b %e %H:%M:%S%.3f", LayoutKind::Yearless),
    Layout::new("StampNano", "%Y %b %e %H:%M:%S%.9f", LayoutKind::Yearless),
    Layout::new("DateTime", "%Y-%m-%d %H:%M:%S", LayoutKind::Naive),
    Layout::new("DateOnly", "%Y-%m-%d", LayoutKind::DateOnly),
    Layout::new("TimeOnly", "%H:%M:%S", LayoutKind::TimeOnly),
];

/// Try every layout in order; return the first that matches.
pub fn parse_any<Tz: TimeZone>(
    input: &str,
    ctx: &ParseContext<'_, Tz>,
) -> Option<(&'static Layout, DateTime<Utc>)> {
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(input, ctx).map(|instant| (layout, instant)))
}

/// Look up a layout by name.
pub fn layout(name: &str) -> Option<&'static Layout> {
    LAYOUTS.iter().find(|l| l.name == name)
}

/// The zone abbreviation token of `input`: 1–5 uppercase ASCII letters.
///
/// `%Z` skips any non-whitespace run when parsing, so without this check a
/// numeric offset would be accepted in its place.
fn zone_abbreviation(input: &str) -> Option<&str> {
    input
        .split_whitespace()
        .find(|tok| (1..=5).contains(&tok.len()) && tok.chars().all(|c| c.is_ascii_uppercase()))
}

fn is_utc_abbreviation(abbrev: &str) -> bool {
    matches!(abbrev, "UTC" | "GMT" | "Z" | "UT")
}
