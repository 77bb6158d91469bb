//! Decoders for list-shaped trend fields.
//!
//! Both decoders are total: they never fail. A field that cannot be read as a
//! list becomes an empty series; an element that cannot be read becomes an
//! absent slot, so positions stay aligned with sibling series.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::decode::literal::{Literal, parse_literal};
use crate::domain::{DateSeries, NumericSeries};

/// Fixed timestamp pattern used by the trend endpoint's `maxdate` tokens.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A list element, whether it came from a JSON array or a parsed literal.
enum Element<'a> {
    Json(&'a Value),
    Literal(&'a Literal),
}

/// Decode a raw field into a numeric series.
///
/// - JSON arrays are decoded element-wise (already-decoded output round-trips)
/// - strings are parsed as list literals; malformed literals yield `[]`
/// - anything else yields `[]`
pub fn decode_numeric_series(raw: &Value) -> NumericSeries {
    match raw {
        Value::Array(items) => items.iter().map(|v| element_to_f64(Element::Json(v))).collect(),
        Value::String(text) => match parse_list_literal(text) {
            Some(items) => items.iter().map(|l| element_to_f64(Element::Literal(l))).collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Decode a raw field into a date axis (`YYYY-MM-DD HH:MM:SS` tokens).
pub fn decode_date_series(raw: &Value) -> DateSeries {
    match raw {
        Value::Array(items) => items.iter().map(|v| element_to_datetime(Element::Json(v))).collect(),
        Value::String(text) => match parse_list_literal(text) {
            Some(items) => items
                .iter()
                .map(|l| element_to_datetime(Element::Literal(l)))
                .collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Coerce a scalar token to a finite float.
///
/// Surrounding single quotes and whitespace are ignored, so `"'1.5'"` and
/// `" 1.5 "` both read as `1.5`. NaN and infinities are treated as absent.
pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let cleaned = token.trim().trim_matches('\'').trim();
    if cleaned.is_empty() {
        return None;
    }
    finite(cleaned.parse::<f64>().ok()?)
}

pub fn parse_timestamp_token(token: &str) -> Option<NaiveDateTime> {
    let cleaned = token.trim_matches('\'');
    NaiveDateTime::parse_from_str(cleaned, TIMESTAMP_FORMAT).ok()
}

fn parse_list_literal(text: &str) -> Option<Vec<Literal>> {
    match parse_literal(text) {
        Ok(Literal::List(items)) => Some(items),
        Ok(_) => {
            tracing::debug!(field = text, "list field holds a non-list literal");
            None
        }
        Err(err) => {
            tracing::debug!(field = text, error = %err, "malformed list literal");
            None
        }
    }
}

fn element_to_f64(element: Element<'_>) -> Option<f64> {
    match element {
        Element::Json(Value::Number(n)) => n.as_f64().and_then(finite),
        Element::Json(Value::String(s)) => parse_numeric_token(s),
        Element::Literal(Literal::Number(n)) => finite(*n),
        Element::Literal(Literal::Str(s)) => parse_numeric_token(s),
        _ => None,
    }
}

fn element_to_datetime(element: Element<'_>) -> Option<NaiveDateTime> {
    match element {
        Element::Json(Value::String(s)) => parse_timestamp_token(s),
        Element::Literal(Literal::Str(s)) => parse_timestamp_token(s),
        _ => None,
    }
}

fn finite(v: f64) -> Option<f64> {
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn decodes_string_literal_with_absent_entries() {
        let series = decode_numeric_series(&json!("['1.5', '2.5', None, 'bad']"));
        assert_eq!(series, vec![Some(1.5), Some(2.5), None, None]);
    }

    #[test]
    fn malformed_literal_yields_empty_series() {
        assert!(decode_numeric_series(&json!("['1.5', '2.5'")).is_empty());
        assert!(decode_numeric_series(&json!("1.5, 2.5]")).is_empty());
        assert!(decode_numeric_series(&json!("")).is_empty());
    }

    #[test]
    fn deeply_nested_literal_yields_empty_series() {
        assert!(decode_numeric_series(&json!("[".repeat(100_000))).is_empty());
        let balanced = format!("{}{}", "[".repeat(5_000), "]".repeat(5_000));
        assert!(decode_numeric_series(&json!(balanced)).is_empty());
        assert!(decode_date_series(&json!("[".repeat(100_000))).is_empty());
        // Shallow nesting still parses; the inner list is just not a number.
        assert_eq!(decode_numeric_series(&json!("[[1], '2']")), vec![None, Some(2.0)]);
    }

    #[test]
    fn non_list_values_yield_empty_series() {
        assert!(decode_numeric_series(&Value::Null).is_empty());
        assert!(decode_numeric_series(&json!(42)).is_empty());
        assert!(decode_numeric_series(&json!("42")).is_empty());
        assert!(decode_numeric_series(&json!("('1', '2')")).is_empty());
        assert!(decode_numeric_series(&json!({"a": 1})).is_empty());
    }

    #[test]
    fn non_finite_and_non_numeric_elements_are_absent() {
        let series = decode_numeric_series(&json!("['nan', 'inf', '-inf', True, [1], 7, '1e3']"));
        assert_eq!(series, vec![None, None, None, None, None, Some(7.0), Some(1000.0)]);
    }

    #[test]
    fn inner_quotes_are_stripped() {
        let series = decode_numeric_series(&json!("[\"'3.25'\", ' 4 ']"));
        assert_eq!(series, vec![Some(3.25), Some(4.0)]);
    }

    #[test]
    fn already_decoded_arrays_round_trip() {
        let first = decode_numeric_series(&json!("['10', None, '30.5']"));
        let as_json = serde_json::to_value(&first).unwrap();
        assert_eq!(as_json, json!([10.0, null, 30.5]));
        assert_eq!(decode_numeric_series(&as_json), first);
    }

    #[test]
    fn decodes_dates_preserving_positions() {
        let dates = decode_date_series(&json!("['2024-01-01 00:00:00', 'garbage']"));
        assert_eq!(dates, vec![Some(dt(2024, 1, 1)), None]);
    }

    #[test]
    fn date_decoder_handles_arrays_and_bad_literals() {
        let dates = decode_date_series(&json!(["2024-02-03 00:00:00", null, "2024-02-05"]));
        assert_eq!(dates, vec![Some(dt(2024, 2, 3)), None, None]);
        assert!(decode_date_series(&json!("['2024-01-01 00:00:00'")).is_empty());
        assert!(decode_date_series(&json!("[]")).is_empty());
        assert!(decode_date_series(&Value::Null).is_empty());
    }

    #[test]
    fn numeric_token_parsing() {
        assert_eq!(parse_numeric_token("'12.5'"), Some(12.5));
        assert_eq!(parse_numeric_token("-3"), Some(-3.0));
        assert_eq!(parse_numeric_token("abc"), None);
        assert_eq!(parse_numeric_token("''"), None);
        assert_eq!(parse_numeric_token("NaN"), None);
    }
}
