use rusqlite::types::ValueRef;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Decoded value of a single board column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum BoardValue {
    Empty,
    Scalar(String),
    EnumIndex(i64),
    Date(String),
}

impl BoardValue {
    /// Decode a column from its encoded JSON `value` and display `text`.
    ///
    /// Decoding is per column and never fails: anything that is not a
    /// recognisable JSON payload falls back to the display text.
    pub fn decode(value: Option<&str>, text: Option<&str>) -> Self {
        let raw = value.map(str::trim).filter(|v| !v.is_empty());

        if let Some(raw) = raw {
            match serde_json::from_str::<Value>(raw) {
                Ok(json) => {
                    if let Some(decoded) = Self::from_json(&json) {
                        return decoded;
                    }
                }
                Err(e) => {
                    tracing::debug!(value = raw, error = %e, "column value is not JSON, using text");
                }
            }
        }

        Self::from_text(text)
    }

    fn from_json(json: &Value) -> Option<Self> {
        match json {
            Value::Null => None,
            Value::String(s) if s.is_empty() => Some(BoardValue::Empty),
            Value::String(s) => Some(BoardValue::Scalar(s.clone())),
            Value::Number(n) => Some(BoardValue::Scalar(n.to_string())),
            Value::Bool(b) => Some(BoardValue::Scalar(b.to_string())),
            Value::Object(map) => {
                if let Some(index) = map.get("index").and_then(index_of_json) {
                    return Some(BoardValue::EnumIndex(index));
                }
                match map.get("date") {
                    Some(Value::String(d)) if !d.is_empty() => Some(BoardValue::Date(d.clone())),
                    Some(_) => Some(BoardValue::Empty),
                    None => None,
                }
            }
            Value::Array(_) => None,
        }
    }

    fn from_text(text: Option<&str>) -> Self {
        match text {
            Some(t) if !t.is_empty() => BoardValue::Scalar(t.to_string()),
            _ => BoardValue::Empty,
        }
    }

    /// Flat text used by the default comparison rule.
    pub fn as_text(&self) -> String {
        match self {
            BoardValue::Empty => String::new(),
            BoardValue::Scalar(s) | BoardValue::Date(s) => s.clone(),
            BoardValue::EnumIndex(i) => i.to_string(),
        }
    }
}

fn index_of_json(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl fmt::Display for BoardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardValue::Empty => write!(f, "<empty>"),
            BoardValue::Scalar(s) => write!(f, "{s}"),
            BoardValue::EnumIndex(i) => write!(f, "{{index: {i}}}"),
            BoardValue::Date(d) => write!(f, "{{date: {d}}}"),
        }
    }
}

/// Scalar read from a reporting view column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceValue {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
}

impl SourceValue {
    pub fn text(s: &str) -> Self {
        SourceValue::Text(s.to_string())
    }

    /// Stringified value, `None` for SQL NULL.
    pub fn as_text(&self) -> Option<String> {
        match self {
            SourceValue::Null => None,
            SourceValue::Text(s) => Some(s.clone()),
            SourceValue::Integer(i) => Some(i.to_string()),
            SourceValue::Real(r) => Some(r.to_string()),
        }
    }
}

impl From<ValueRef<'_>> for SourceValue {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => SourceValue::Null,
            ValueRef::Integer(i) => SourceValue::Integer(i),
            ValueRef::Real(r) => SourceValue::Real(r),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                SourceValue::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

impl From<&str> for SourceValue {
    fn from(s: &str) -> Self {
        SourceValue::text(s)
    }
}

impl From<f64> for SourceValue {
    fn from(r: f64) -> Self {
        SourceValue::Real(r)
    }
}

impl From<i64> for SourceValue {
    fn from(i: i64) -> Self {
        SourceValue::Integer(i)
    }
}

impl<T: Into<SourceValue>> From<Option<T>> for SourceValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SourceValue::Null)
    }
}

impl fmt::Display for SourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(s) => write!(f, "{s}"),
            None => write!(f, "NULL"),
        }
    }
}
