//! Dynamic value type for target objects and rule operands.
//!
//! Target objects usually arrive as JSON request payloads. [`Value`] mirrors
//! that shape, but keeps map entries in insertion order so that iteration
//! over a spec or an object is deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically typed value.
///
/// Deserializes untagged, so any JSON or TOML document maps onto it
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered array of values
    Array(Vec<Value>),
    /// Insertion-ordered key-value map
    Map(IndexMap<String, Value>),
}

/// Ordered map of attribute name to value.
pub type ValueMap = IndexMap<String, Value>;

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Parse a value from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    /// Integers are automatically converted to floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Numeric reading used by bound comparisons.
    ///
    /// Numbers read as themselves and booleans as 1 and 0. Strings read as
    /// the numeric literal they spell (blank reads as 0), and arrays read
    /// through their textual form, so `[5]` is 5 and `[]` is 0. Maps and
    /// text that is not a numeric literal have no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(_) | Value::Float(_) => self.as_float(),
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => parse_numeric_text(s),
            Value::Array(_) => parse_numeric_text(&self.to_text()),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as an array reference.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        if let Value::Array(arr) = self {
            Some(arr)
        } else {
            None
        }
    }

    /// Try to get this value as a map reference.
    pub fn as_map(&self) -> Option<&ValueMap> {
        if let Value::Map(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Look up a key if this value is a map.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Textual form of the value, as matched by pattern rules.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Textual form: strings unquoted, numbers in shortest form, arrays joined
/// with commas (null entries as empty text), maps as `[object Object]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", format_number(*fl)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(arr) => {
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if !item.is_null() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Map(_) => write!(f, "[object Object]"),
        }
    }
}

/// Render a number the way payload producers print it: plain decimal for
/// moderate magnitudes, exponent form (`1e+21`, `1e-7`) outside
/// `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

/// Parse text as a numeric literal. Blank text reads as 0; anything that is
/// not a decimal, `0x`/`0o`/`0b` integer or `Infinity` literal reads as
/// `None`.
fn parse_numeric_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    let (sign, unsigned) = match text.as_bytes()[0] {
        b'-' => (-1.0, &text[1..]),
        b'+' => (1.0, &text[1..]),
        _ => (1.0, text),
    };
    if unsigned == "Infinity" {
        return Some(sign * f64::INFINITY);
    }

    let radix = match unsigned.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        // Prefixed literals take no sign.
        let digits = &unsigned[2..];
        if unsigned.len() != text.len() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        return u128::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    let is_decimal = unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal || !unsigned.bytes().next().is_some_and(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    unsigned.parse::<f64>().ok().map(|n| sign * n)
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_preserves_key_order() {
        let value = Value::from_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = value.as_map().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_untagged_variants() {
        let value = Value::from_json(r#"[null, true, 17, 2.5, "ab", [], {}]"#).unwrap();
        let arr = value.as_array().unwrap();
        assert!(arr[0].is_null());
        assert_eq!(arr[1], Value::Boolean(true));
        assert_eq!(arr[2], Value::Integer(17));
        assert_eq!(arr[3], Value::Float(2.5));
        assert_eq!(arr[4], Value::String("ab".to_string()));
        assert_eq!(arr[5].type_name(), "array");
        assert_eq!(arr[6].type_name(), "map");
    }

    #[test]
    fn test_numeric_reading() {
        assert_eq!(Value::Integer(17).as_number(), Some(17.0));
        assert_eq!(Value::Float(2.5).as_number(), Some(2.5));
        assert_eq!(Value::Boolean(true).as_number(), Some(1.0));
        assert_eq!(Value::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(Value::from("abc").as_number(), None);
        assert_eq!(Value::Map(ValueMap::new()).as_number(), None);
    }

    #[test]
    fn test_numeric_text_literals() {
        assert_eq!(Value::from("").as_number(), Some(0.0));
        assert_eq!(Value::from("   ").as_number(), Some(0.0));
        assert_eq!(Value::from("-Infinity").as_number(), Some(f64::NEG_INFINITY));
        assert_eq!(Value::from("0x1F").as_number(), Some(31.0));
        assert_eq!(Value::from(".5").as_number(), Some(0.5));
        assert_eq!(Value::from("1e3").as_number(), Some(1000.0));
        assert_eq!(Value::from("-0x1F").as_number(), None);
        assert_eq!(Value::from("inf").as_number(), None);
        assert_eq!(Value::from("infinity").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::from("e5").as_number(), None);
        assert_eq!(Value::from("1_000").as_number(), None);
    }

    #[test]
    fn test_array_numeric_reading() {
        assert_eq!(Value::Array(vec![]).as_number(), Some(0.0));
        assert_eq!(Value::Array(vec![Value::Integer(5)]).as_number(), Some(5.0));
        assert_eq!(Value::Array(vec![Value::Null]).as_number(), Some(0.0));
        assert_eq!(
            Value::Array(vec![Value::Integer(1), Value::Integer(2)]).as_number(),
            None
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(18.0), "18");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e22), "1.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_text_form() {
        assert_eq!(Value::from("ab").to_text(), "ab");
        assert_eq!(Value::Integer(17).to_text(), "17");
        assert_eq!(Value::Float(18.0).to_text(), "18");
        assert_eq!(Value::Null.to_text(), "null");
        assert_eq!(
            Value::Array(vec![Value::Integer(1), Value::from("x")]).to_text(),
            "1,x"
        );
        assert_eq!(
            Value::Array(vec![Value::Null, Value::Integer(1), Value::Null]).to_text(),
            ",1,"
        );
        let map = Value::from_json(r#"{"a":1}"#).unwrap();
        assert_eq!(map.to_text(), "[object Object]");
        assert_eq!(Value::Float(1e21).to_text(), "1e+21");
    }

    #[test]
    fn test_from_serde_json() {
        let json: serde_json::Value = serde_json::json!({ "age": 17, "name": null });
        let value = Value::from(json);
        assert_eq!(value.get("age"), Some(&Value::Integer(17)));
        assert_eq!(value.get("name"), Some(&Value::Null));
        assert_eq!(value.get("missing"), None);
    }
}
