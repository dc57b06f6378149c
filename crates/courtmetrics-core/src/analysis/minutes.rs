// Minutes-played parsing.
//
// The provider encodes minutes as "MM:SS" strings in box scores, as ISO-8601
// durations ("PT32M45.00S") on some v3 endpoints, and as bare numbers in
// game logs. All of them reduce to a single f64 under a rounding policy.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// How the seconds component of a "MM:SS" value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MinutesRounding {
    /// Keep the minute component, drop the seconds ("32:45" -> 32).
    #[default]
    Truncate,
    /// Round to the nearest whole minute ("32:45" -> 33).
    Round,
    /// Keep fractional minutes ("32:45" -> 32.75).
    Exact,
}

/// Minutes as the provider sent them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawMinutes {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

impl RawMinutes {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => RawMinutes::Text(s.trim().to_string()),
            Some(Value::Number(n)) => n.as_f64().map_or(RawMinutes::Missing, RawMinutes::Number),
            _ => RawMinutes::Missing,
        }
    }

    /// Parsed minutes under `rounding`.
    pub fn parse(&self, rounding: MinutesRounding) -> f64 {
        parse_minutes(self, rounding)
    }
}

impl fmt::Display for RawMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawMinutes::Text(s) if s.is_empty() => write!(f, "--"),
            RawMinutes::Text(s) => write!(f, "{s}"),
            RawMinutes::Number(n) => write!(f, "{n}"),
            RawMinutes::Missing => write!(f, "--"),
        }
    }
}

/// Parse a minutes value. Unparseable or missing input yields 0.
pub fn parse_minutes(raw: &RawMinutes, rounding: MinutesRounding) -> f64 {
    match raw {
        RawMinutes::Number(n) => *n,
        RawMinutes::Missing => 0.0,
        RawMinutes::Text(s) => parse_minutes_str(s, rounding),
    }
}

/// String form of [`parse_minutes`].
pub fn parse_minutes_str(s: &str, rounding: MinutesRounding) -> f64 {
    let s = s.trim();
    let parsed = if let Some((mins, secs)) = s.split_once(':') {
        split_clock(mins, secs)
    } else if let Some(rest) = s.strip_prefix("PT") {
        split_iso(rest)
    } else {
        return s.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0);
    };

    match parsed {
        Some((mins, secs)) => apply_rounding(mins, secs, rounding),
        None => 0.0,
    }
}

fn split_clock(mins: &str, secs: &str) -> Option<(f64, f64)> {
    let mins: f64 = mins.trim().parse().ok()?;
    // Seconds are optional for truncation; a malformed tail still keeps MM.
    let secs: f64 = secs.trim().parse().unwrap_or(0.0);
    Some((mins, secs))
}

fn split_iso(rest: &str) -> Option<(f64, f64)> {
    let (mins, tail) = rest.split_once('M')?;
    let mins: f64 = mins.parse().ok()?;
    let secs = tail
        .strip_suffix('S')
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    Some((mins, secs))
}

fn apply_rounding(mins: f64, secs: f64, rounding: MinutesRounding) -> f64 {
    let mins = mins.trunc();
    match rounding {
        MinutesRounding::Truncate => mins,
        MinutesRounding::Round => (mins + secs / 60.0).round(),
        MinutesRounding::Exact => mins + secs / 60.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> RawMinutes {
        RawMinutes::Text(s.to_string())
    }

    #[test]
    fn clock_format_truncates_seconds() {
        assert_eq!(parse_minutes(&text("32:45"), MinutesRounding::Truncate), 32.0);
        assert_eq!(parse_minutes(&text("7:10"), MinutesRounding::Truncate), 7.0);
        assert_eq!(parse_minutes(&text("0:59"), MinutesRounding::Truncate), 0.0);
    }

    #[test]
    fn clock_format_round_and_exact() {
        assert_eq!(parse_minutes(&text("32:45"), MinutesRounding::Round), 33.0);
        assert_eq!(parse_minutes(&text("32:15"), MinutesRounding::Round), 32.0);
        assert!((parse_minutes(&text("32:45"), MinutesRounding::Exact) - 32.75).abs() < 1e-9);
    }

    #[test]
    fn iso_duration() {
        assert_eq!(parse_minutes(&text("PT32M45.00S"), MinutesRounding::Truncate), 32.0);
        assert!((parse_minutes(&text("PT07M30.00S"), MinutesRounding::Exact) - 7.5).abs() < 1e-9);
        assert_eq!(parse_minutes(&text("PTxxM"), MinutesRounding::Truncate), 0.0);
    }

    #[test]
    fn bare_numbers_used_as_is() {
        assert_eq!(parse_minutes(&RawMinutes::Number(28.0), MinutesRounding::Truncate), 28.0);
        assert_eq!(parse_minutes(&text("31"), MinutesRounding::Truncate), 31.0);
        assert_eq!(parse_minutes(&text("24.5"), MinutesRounding::Truncate), 24.5);
    }

    #[test]
    fn unparseable_and_missing_are_zero() {
        assert_eq!(parse_minutes(&text("DNP"), MinutesRounding::Truncate), 0.0);
        assert_eq!(parse_minutes(&text(""), MinutesRounding::Truncate), 0.0);
        assert_eq!(parse_minutes(&text("ab:cd"), MinutesRounding::Truncate), 0.0);
        assert_eq!(parse_minutes(&RawMinutes::Missing, MinutesRounding::Truncate), 0.0);
        assert_eq!(parse_minutes(&text("NaN"), MinutesRounding::Truncate), 0.0);
    }

    #[test]
    fn from_json_value() {
        assert_eq!(RawMinutes::from_value(Some(&json!("34:02"))), text("34:02"));
        assert_eq!(RawMinutes::from_value(Some(&json!(30))), RawMinutes::Number(30.0));
        assert_eq!(RawMinutes::from_value(Some(&json!(null))), RawMinutes::Missing);
        assert_eq!(RawMinutes::from_value(None), RawMinutes::Missing);
    }

    #[test]
    fn display() {
        assert_eq!(text("34:02").to_string(), "34:02");
        assert_eq!(RawMinutes::Number(30.0).to_string(), "30");
        assert_eq!(RawMinutes::Missing.to_string(), "--");
    }
}
