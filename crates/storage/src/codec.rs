//! Text format of a readings file.
//!
//! ```text
//! # FILE IS AUTOGENERATED
//!
//! conversion = 0.42
//! gdprCompliant = true
//! teamFeeling = "happy"
//! ```

use std::collections::BTreeMap;
use metronome_core::{Reading, ReadingValue, Time};
use crate::{Result, StorageError};

/// First lines of every generated readings file.
pub const AUTOGENERATED_HEADER: &str = "# FILE IS AUTOGENERATED\n\n";

/// Render readings as `name = value` lines sorted by name.
///
/// Meters with no value are left out.
pub fn stringify_readings<I, K>(readings: I) -> String
where
    I: IntoIterator<Item = (K, Option<ReadingValue>)>,
    K: Into<String>,
{
    let sorted: BTreeMap<String, ReadingValue> = readings
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.into(), v)))
        .collect();

    let mut out = String::from(AUTOGENERATED_HEADER);
    for (name, value) in &sorted {
        out.push_str(name);
        out.push_str(" = ");
        out.push_str(&format_value(value));
        out.push('\n');
    }
    out
}

/// Parse a readings file, dating every reading at `date`.
pub fn parse_readings(content: &str, date: Time) -> Result<Vec<Reading>> {
    let mut readings = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_err = |reason: &str| StorageError::Parse {
            line: idx + 1,
            reason: reason.to_string(),
        };

        let (name, value) = line.split_once('=').ok_or_else(|| parse_err("expected `name = value`"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(parse_err("missing meter name"));
        }
        let value = parse_value(value.trim()).ok_or_else(|| parse_err("unrecognised value"))?;
        readings.push(Reading::new(name, value, date));
    }
    Ok(readings)
}

/// Parse a single value: `true`, `false`, a JSON string literal, or a finite number.
pub fn parse_value(s: &str) -> Option<ReadingValue> {
    match s {
        "true" => Some(ReadingValue::Boolean(true)),
        "false" => Some(ReadingValue::Boolean(false)),
        _ if s.starts_with('"') => serde_json::from_str::<String>(s).ok().map(ReadingValue::Text),
        _ => s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(ReadingValue::Number),
    }
}

fn format_value(value: &ReadingValue) -> String {
    match value {
        ReadingValue::Number(v) => v.to_string(),
        ReadingValue::Boolean(v) => v.to_string(),
        // Serializing a String to JSON cannot fail.
        ReadingValue::Text(v) => serde_json::to_string(v).unwrap_or_default(),
    }
}
