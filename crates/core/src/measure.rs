//! Measures (expectation targets) and reading values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target of an expectation, tagged with its unit.
///
/// Serialized as `{ "unit": "percent", "value": 5.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum Measure {
    /// Relative change, in percent of the baseline reading
    Percent(f64),
    /// Absolute number
    Number(f64),
    /// Boolean state
    Boolean(bool),
    /// Free-form text state
    #[serde(rename = "string")]
    Text(String),
}

impl Measure {
    /// Unit category of this measure.
    pub fn unit(&self) -> Unit {
        match self {
            Measure::Percent(_) => Unit::Percent,
            Measure::Number(_) => Unit::Number,
            Measure::Boolean(_) => Unit::Boolean,
            Measure::Text(_) => Unit::String,
        }
    }

    /// Numeric target, for percent and number measures.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Measure::Percent(v) | Measure::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether a reading value is exactly equal to this target.
    ///
    /// Equality is type-sensitive: `Number(1.0)` never equals `Text("1")`.
    pub fn matches(&self, value: &ReadingValue) -> bool {
        match (self, value) {
            (Measure::Percent(t) | Measure::Number(t), ReadingValue::Number(v)) => t == v,
            (Measure::Boolean(t), ReadingValue::Boolean(v)) => t == v,
            (Measure::Text(t), ReadingValue::Text(v)) => t == v,
            _ => false,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Percent(v) => write!(f, "{}%", v),
            Measure::Number(v) => write!(f, "{}", v),
            Measure::Boolean(v) => write!(f, "{}", v),
            Measure::Text(v) => f.write_str(&quote(v)),
        }
    }
}

// JSON string literal, the quoting used by expectation text and readings files.
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_default()
}

/// Unit category of a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Percent of the baseline
    Percent,
    /// Absolute number
    Number,
    /// Boolean
    Boolean,
    /// Text
    String,
}

impl Unit {
    /// Whether a reading value belongs to the category this unit expects.
    ///
    /// Percent and number both take numeric readings.
    pub fn accepts(self, value: &ReadingValue) -> bool {
        matches!(
            (self, value),
            (Unit::Percent | Unit::Number, ReadingValue::Number(_))
                | (Unit::Boolean, ReadingValue::Boolean(_))
                | (Unit::String, ReadingValue::Text(_))
        )
    }

    /// Whether measures of this unit carry a number.
    pub fn is_numeric(self) -> bool {
        matches!(self, Unit::Percent | Unit::Number)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Percent => "percent",
            Unit::Number => "number",
            Unit::Boolean => "boolean",
            Unit::String => "string",
        };
        f.write_str(s)
    }
}

/// Observed value of a meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    /// Numeric reading
    Number(f64),
    /// Boolean reading
    Boolean(bool),
    /// Text reading
    Text(String),
}

impl ReadingValue {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Number(v) => write!(f, "{}", v),
            ReadingValue::Boolean(v) => write!(f, "{}", v),
            ReadingValue::Text(v) => f.write_str(&quote(v)),
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(v: f64) -> Self {
        ReadingValue::Number(v)
    }
}

impl From<bool> for ReadingValue {
    fn from(v: bool) -> Self {
        ReadingValue::Boolean(v)
    }
}

impl From<&str> for ReadingValue {
    fn from(v: &str) -> Self {
        ReadingValue::Text(v.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(v: String) -> Self {
        ReadingValue::Text(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_accepts_by_category() {
        let number = ReadingValue::Number(5.0);
        let boolean = ReadingValue::Boolean(true);
        let text = ReadingValue::Text("str".to_string());

        assert!(Unit::Percent.accepts(&number));
        assert!(Unit::Number.accepts(&number));
        assert!(!Unit::Percent.accepts(&boolean));
        assert!(!Unit::Number.accepts(&text));

        assert!(Unit::Boolean.accepts(&boolean));
        assert!(!Unit::Boolean.accepts(&number));
        assert!(!Unit::Boolean.accepts(&text));

        assert!(Unit::String.accepts(&text));
        assert!(!Unit::String.accepts(&number));
        assert!(!Unit::String.accepts(&boolean));
    }

    #[test]
    fn test_measure_matches_is_type_sensitive() {
        assert!(Measure::Boolean(true).matches(&ReadingValue::Boolean(true)));
        assert!(!Measure::Boolean(true).matches(&ReadingValue::Boolean(false)));
        assert!(!Measure::Text("1".into()).matches(&ReadingValue::Number(1.0)));
        assert!(Measure::Number(1.0).matches(&ReadingValue::Number(1.0)));
    }

    #[test]
    fn test_measure_serializes_with_unit_tag() {
        let json = serde_json::to_value(Measure::Percent(5.0)).unwrap();
        assert_eq!(json, serde_json::json!({"unit": "percent", "value": 5.0}));

        let text: Measure =
            serde_json::from_value(serde_json::json!({"unit": "string", "value": "happy"})).unwrap();
        assert_eq!(text, Measure::Text("happy".to_string()));
    }

    #[test]
    fn test_reading_value_deserializes_untagged() {
        let values: Vec<ReadingValue> = serde_json::from_str(r#"[0.5, true, "ok"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ReadingValue::Number(0.5),
                ReadingValue::Boolean(true),
                ReadingValue::Text("ok".to_string()),
            ]
        );
    }

    #[test]
    fn test_measure_display() {
        assert_eq!(Measure::Percent(5.0).to_string(), "5%");
        assert_eq!(Measure::Number(2.5).to_string(), "2.5");
        assert_eq!(Measure::Text("happy".into()).to_string(), "\"happy\"");
    }

    #[test]
    fn test_text_display_uses_json_quoting() {
        let raw = "tab\there \u{1}";
        let expected = serde_json::to_string(raw).unwrap();
        assert_eq!(Measure::Text(raw.into()).to_string(), expected);
        assert_eq!(ReadingValue::Text(raw.into()).to_string(), expected);
        assert_eq!(expected, "\"tab\\there \\u0001\"");

        let back: String = serde_json::from_str(&Measure::Text(raw.into()).to_string()).unwrap();
        assert_eq!(back, raw);
    }
}
