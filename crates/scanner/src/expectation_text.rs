//! Parsing of `[meter-expect:<text>]` bodies into expectations.
//!
//! ```text
//! <meter> <direction> <value> (by <date> | in <n> <days|weeks>)
//! ```
//!
//! For example `conversion increase by 5% in 30 days` or
//! `gdprCompliant become true by 2018-07-26`. The declaring commit's date is
//! the start of the evaluation window.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use metronome_core::{Direction, Expectation, Measure, Time};
use regex::Regex;
use std::sync::OnceLock;
use crate::{Result, ScanError};

fn grammar() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?ix)
            ^\s*
            (?P<meter>\S+)\s+
            (?P<direction>increase[\s_]+by|increase[\s_]+to|decrease[\s_]+by|decrease[\s_]+to|become|maintain)\s+
            (?P<value>"(?:[^"\\]|\\.)*"|[^\s"]+)\s+
            (?:by\s+(?P<date>\S+)|in\s+(?P<count>\d+)\s+(?P<span>days?|weeks?))
            \s*$"#,
        )
        .expect("valid expectation grammar")
    })
}

/// Parse expectation text declared at `declared_at`.
pub fn parse_expectation(text: &str, declared_at: Time) -> Result<Expectation> {
    let invalid = |reason: &str| ScanError::InvalidExpectation {
        text: text.to_string(),
        reason: reason.to_string(),
    };

    let caps = grammar()
        .captures(text)
        .ok_or_else(|| invalid("expected `<meter> <direction> <value> by <date>` or `... in <n> days`"))?;

    let direction: Direction = caps["direction"].parse().map_err(|e: String| invalid(&e))?;
    let measure = parse_measure(&caps["value"]).ok_or_else(|| invalid("unreadable value"))?;

    let deadline = if let Some(date) = caps.name("date") {
        parse_date(date.as_str()).ok_or_else(|| invalid("deadline must be YYYY-MM-DD or RFC 3339"))?
    } else {
        let count: i64 = caps["count"].parse().map_err(|_| invalid("duration too large"))?;
        let span = caps["span"].to_lowercase();
        let duration = if span.starts_with("week") {
            Duration::try_weeks(count)
        } else {
            Duration::try_days(count)
        };
        duration
            .and_then(|d| declared_at.checked_add_signed(d))
            .ok_or_else(|| invalid("duration too large"))?
    };

    Ok(Expectation::new(&caps["meter"], declared_at, deadline, direction, measure)?)
}

fn parse_measure(raw: &str) -> Option<Measure> {
    if raw.starts_with('"') {
        return serde_json::from_str::<String>(raw).ok().map(Measure::Text);
    }
    if let Some(number) = raw.strip_suffix('%') {
        return number.parse::<f64>().ok().map(Measure::Percent);
    }
    if raw.eq_ignore_ascii_case("true") {
        return Some(Measure::Boolean(true));
    }
    if raw.eq_ignore_ascii_case("false") {
        return Some(Measure::Boolean(false));
    }
    Some(match raw.parse::<f64>() {
        Ok(number) => Measure::Number(number),
        Err(_) => Measure::Text(raw.to_string()),
    })
}

fn parse_date(raw: &str) -> Option<Time> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
