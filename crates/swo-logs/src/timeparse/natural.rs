//! English time phrases resolved against the reference instant.
//!
//! Supported forms (case-insensitive, whole input):
//!
//! - `now`, `noon`, `midnight`
//! - `5 seconds ago`, `in 2 hours`, `a day from now`, `10m ago`
//! - `today`, `yesterday`, `tomorrow`, optionally `at <clock>`
//! - `monday`, `last friday`, `next sunday`, optionally `at <clock>`
//! - `last week`, `next month`, `last year`
//!
//! Date words move the date and keep the reference time of day unless an
//! `at <clock>` part is present. `<clock>` is `noon`, `midnight`, `16:30`,
//! `4am` or `4:30pm`.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use regex::Regex;
use std::sync::LazyLock;

use super::ParseContext;

const AMOUNT: &str = r"(?P<n>\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)";
const UNIT: &str = r"(?P<unit>[a-z]+)";

static RE_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{AMOUNT}\s*{UNIT}\s+ago$")).unwrap());

static RE_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^in\s+{AMOUNT}\s*{UNIT}$")).unwrap());

static RE_FROM_NOW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{AMOUNT}\s*{UNIT}\s+from\s+now$")).unwrap());

static RE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<day>today|yesterday|tomorrow)(?:\s+at\s+(?P<clock>.+))?$").unwrap()
});

static RE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?P<which>last|next|this)\s+)?(?P<weekday>monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thu|fri|sat|sun)(?:\s+at\s+(?P<clock>.+))?$",
    )
    .unwrap()
});

static RE_LAST_NEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<which>last|next)\s+(?P<unit>week|month|year)$").unwrap());

static RE_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<h>\d{1,2})(?::(?P<m>\d{2}))?(?::(?P<s>\d{2}))?\s*(?P<ampm>am|pm)?$").unwrap()
});

/// Calendar unit of a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    fn from_word(word: &str) -> Option<Self> {
        let unit = match word {
            "s" | "sec" | "secs" | "second" | "seconds" => Self::Second,
            "m" | "min" | "mins" | "minute" | "minutes" => Self::Minute,
            "h" | "hr" | "hrs" | "hour" | "hours" => Self::Hour,
            "d" | "day" | "days" => Self::Day,
            "w" | "wk" | "wks" | "week" | "weeks" => Self::Week,
            "mo" | "month" | "months" => Self::Month,
            "y" | "yr" | "yrs" | "year" | "years" => Self::Year,
            _ => return None,
        };
        Some(unit)
    }
}

/// Resolve an English phrase, or `None` if it is not one.
pub fn parse<Tz: TimeZone>(input: &str, ctx: &ParseContext<'_, Tz>) -> Option<DateTime<Utc>> {
    let phrase = normalize(input);

    match phrase.as_str() {
        "now" => return Some(ctx.reference),
        "noon" | "midnight" => return on_date(ctx, today(ctx), Some(phrase.as_str())),
        _ => {}
    }

    if let Some(caps) = RE_AGO.captures(&phrase) {
        let (n, unit) = amount_and_unit(&caps)?;
        return shift(ctx, -n, unit);
    }
    if let Some(caps) = RE_IN
        .captures(&phrase)
        .or_else(|| RE_FROM_NOW.captures(&phrase))
    {
        let (n, unit) = amount_and_unit(&caps)?;
        return shift(ctx, n, unit);
    }
    if let Some(caps) = RE_DAY.captures(&phrase) {
        let date = match &caps["day"] {
            "yesterday" => today(ctx).pred_opt()?,
            "tomorrow" => today(ctx).succ_opt()?,
            _ => today(ctx),
        };
        return on_date(ctx, date, caps.name("clock").map(|m| m.as_str()));
    }
    if let Some(caps) = RE_WEEKDAY.captures(&phrase) {
        let target = weekday(&caps["weekday"][..3])?;
        let date = match caps.name("which").map(|m| m.as_str()) {
            Some("last") => previous_weekday(today(ctx), target),
            Some("next") => next_weekday(today(ctx), target),
            _ => current_or_previous_weekday(today(ctx), target),
        };
        return on_date(ctx, date, caps.name("clock").map(|m| m.as_str()));
    }
    if let Some(caps) = RE_LAST_NEXT.captures(&phrase) {
        let n = if &caps["which"] == "last" { -1 } else { 1 };
        let unit = Unit::from_word(&caps["unit"])?;
        return shift(ctx, n, unit);
    }

    None
}

/// Move the reference instant by `n` units.
///
/// Fixed-length units are exact durations; months and years move the
/// wall-clock date in the active zone.
pub fn shift<Tz: TimeZone>(
    ctx: &ParseContext<'_, Tz>,
    n: i64,
    unit: Unit,
) -> Option<DateTime<Utc>> {
    let fixed = match unit {
        Unit::Second => Some(Duration::try_seconds(n)?),
        Unit::Minute => Some(Duration::try_minutes(n)?),
        Unit::Hour => Some(Duration::try_hours(n)?),
        Unit::Day => Some(Duration::try_days(n)?),
        Unit::Week => Some(Duration::try_weeks(n)?),
        Unit::Month | Unit::Year => None,
    };
    if let Some(delta) = fixed {
        return ctx.reference.checked_add_signed(delta);
    }

    let months = if unit == Unit::Year { n.checked_mul(12)? } else { n };
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    let wall = ctx.zone.wall_clock(&ctx.reference);
    let moved = if months < 0 {
        wall.checked_sub_months(magnitude)?
    } else {
        wall.checked_add_months(magnitude)?
    };
    ctx.zone.localize(&moved)
}

fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn amount_and_unit(caps: &regex::Captures<'_>) -> Option<(i64, Unit)> {
    Some((amount(&caps["n"])?, Unit::from_word(&caps["unit"])?))
}

fn amount(word: &str) -> Option<i64> {
    let n = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    Some(n)
}

fn today<Tz: TimeZone>(ctx: &ParseContext<'_, Tz>) -> NaiveDate {
    ctx.zone.wall_clock(&ctx.reference).date()
}

/// `date` at `clock`, or at the reference time of day when no clock is given.
fn on_date<Tz: TimeZone>(
    ctx: &ParseContext<'_, Tz>,
    date: NaiveDate,
    clock: Option<&str>,
) -> Option<DateTime<Utc>> {
    let time = match clock {
        Some(clock) => parse_clock(clock)?,
        None => ctx.zone.wall_clock(&ctx.reference).time(),
    };
    ctx.zone.localize(&NaiveDateTime::new(date, time))
}

/// Parse `noon`, `midnight`, `16:30`, `16:30:05`, `4am`, `4:30 pm`.
pub fn parse_clock(clock: &str) -> Option<NaiveTime> {
    match clock {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return Some(NaiveTime::MIN),
        _ => {}
    }

    let caps = RE_CLOCK.captures(clock)?;
    let mut hour: u32 = caps["h"].parse().ok()?;
    let minute: u32 = caps.name("m").map_or(Some(0), |m| m.as_str().parse().ok())?;
    let second: u32 = caps.name("s").map_or(Some(0), |s| s.as_str().parse().ok())?;

    match caps.name("ampm").map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            hour %= 12;
            if meridiem == "pm" {
                hour += 12;
            }
        }
        // A bare number is too ambiguous to be a clock time.
        None if caps.name("m").is_none() => return None,
        None => {}
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

fn weekday(prefix: &str) -> Option<Weekday> {
    let day = match prefix {
        "mon" => Weekday::Mon,
        "tue" => Weekday::Tue,
        "wed" => Weekday::Wed,
        "thu" => Weekday::Thu,
        "fri" => Weekday::Fri,
        "sat" => Weekday::Sat,
        "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

/// Most recent `target` strictly before `date`.
fn previous_weekday(date: NaiveDate, target: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 7 - target.num_days_from_monday()) % 7;
    let back = if back == 0 { 7 } else { back };
    date - Duration::days(i64::from(back))
}

/// First `target` strictly after `date`.
fn next_weekday(date: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (target.num_days_from_monday() + 7 - date.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    date + Duration::days(i64::from(ahead))
}

/// `date` itself if it is a `target`, else the most recent one.
fn current_or_previous_weekday(date: NaiveDate, target: Weekday) -> NaiveDate {
    if date.weekday() == target {
        date
    } else {
        previous_weekday(date, target)
    }
}
