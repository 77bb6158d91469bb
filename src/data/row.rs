//! Typed access to loosely-typed API rows.
//!
//! The API gives no guarantees about field presence or type: a metric can be a
//! number in one row, a numeric string in the next, and `null` or missing in a
//! third. `RawRow::field` turns each lookup into an explicit present/absent
//! result so report code never indexes JSON directly.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::decode::parse_numeric_token;
use crate::domain::ReportKind;

/// Result of looking up one field on a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Absent,
    Present(&'a Value),
}

impl<'a> Field<'a> {
    pub fn is_absent(self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn raw(self) -> Option<&'a Value> {
        match self {
            Field::Absent => None,
            Field::Present(v) => Some(v),
        }
    }

    /// Numeric value, if the field holds a finite number or numeric string.
    pub fn number(self) -> Option<f64> {
        self.raw().and_then(coerce_f64)
    }

    /// String value, if the field holds a non-empty string.
    pub fn str(self) -> Option<&'a str> {
        match self.raw() {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Present but carrying no data: `null`, `""`, or the literal text `"null"`.
    pub fn is_nullish(self) -> bool {
        match self.raw() {
            Some(Value::Null) => true,
            Some(Value::String(s)) => {
                let t = s.trim();
                t.is_empty() || t.eq_ignore_ascii_case("null")
            }
            _ => false,
        }
    }

    /// Raw cell text for tables (strings unquoted, absent/null as `N/A`).
    pub fn text(self) -> String {
        match self.raw() {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Coerce a scalar JSON value to a finite float.
///
/// Numbers are taken as-is; strings go through the same token rules as list
/// elements. Booleans, arrays, objects and `null` are not numbers.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_numeric_token(s),
        _ => None,
    }
}

/// One object from a response's `data` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawRow {
    fields: Map<String, Value>,
}

impl RawRow {
    /// Accept a JSON value only if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Field<'_> {
        match self.fields.get(name) {
            Some(v) => Field::Present(v),
            None => Field::Absent,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

}

/// Union of columns across rows: known schema columns first, then extras sorted.
pub fn columns_for(kind: ReportKind, rows: &[RawRow]) -> Vec<String> {
    let schema = kind.schema();
    let mut out: Vec<String> = schema
        .iter()
        .filter(|name| rows.iter().any(|r| r.has(name)))
        .map(|name| name.to_string())
        .collect();

    let extras: BTreeSet<&String> = rows
        .iter()
        .flat_map(|r| r.fields.keys())
        .filter(|k| !schema.contains(&k.as_str()))
        .collect();
    out.extend(extras.into_iter().cloned());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> RawRow {
        RawRow::from_value(v).unwrap()
    }

    #[test]
    fn field_reports_presence_and_coerces_numbers() {
        let r = row(json!({"volume": "1500.5", "total_users": 12, "game": "Axie", "bot_count": null}));
        assert_eq!(r.field("volume").number(), Some(1500.5));
        assert_eq!(r.field("total_users").number(), Some(12.0));
        assert_eq!(r.field("game").number(), None);
        assert_eq!(r.field("game").str(), Some("Axie"));
        assert!(r.field("missing").is_absent());
        assert!(!r.field("bot_count").is_absent());
        assert!(r.field("bot_count").is_nullish());
        assert_eq!(r.field("bot_count").number(), None);
    }

    #[test]
    fn nullish_covers_text_null_and_empty() {
        let r = row(json!({"a": "null", "b": "", "c": "0", "d": 0}));
        assert!(r.field("a").is_nullish());
        assert!(r.field("b").is_nullish());
        assert!(!r.field("c").is_nullish());
        assert!(!r.field("d").is_nullish());
        assert!(!r.field("missing").is_nullish());
    }

    #[test]
    fn text_renders_cells() {
        let r = row(json!({"s": "abc", "n": 1.5, "z": null, "l": [1, 2]}));
        assert_eq!(r.field("s").text(), "abc");
        assert_eq!(r.field("n").text(), "1.5");
        assert_eq!(r.field("z").text(), "N/A");
        assert_eq!(r.field("l").text(), "[1,2]");
        assert_eq!(r.field("missing").text(), "N/A");
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(RawRow::from_value(json!([1, 2])).is_none());
        assert!(RawRow::from_value(json!("row")).is_none());
    }

    #[test]
    fn columns_put_schema_first_then_sorted_extras() {
        let rows = vec![
            row(json!({"zeta": 1, "volume": 2, "blockchain": "ethereum"})),
            row(json!({"alpha": 1, "total_users": 3})),
        ];
        let cols = columns_for(ReportKind::Wallet, &rows);
        assert_eq!(cols, vec!["blockchain", "total_users", "volume", "alpha", "zeta"]);
        assert_eq!(columns_for(ReportKind::Wallet, &rows[1..]), vec!["total_users", "alpha"]);
    }
}
