//! Core types for parsed envelopes

use crate::error::{ParseError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// A single field value in a parsed message
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Header value or joined body
    Text(String),

    /// Body lines, when joining is disabled
    Lines(Vec<String>),

    /// Header value coerced to a timestamp
    Date(DateTime<Utc>),

    /// Header value coerced to a number
    Number(f64),
}

impl Value {
    /// Whether this value is kept when written into a message.
    ///
    /// Empty text and zero or NaN numbers are not.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Lines(_) | Self::Date(_) => true,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Self::Lines(lines) => Some(lines),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Lines(lines) => write!(f, "{}", lines.join(",")),
            Self::Date(d) => write!(f, "{}", format_date(d)),
            Self::Number(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            Self::Number(n) if n.is_nan() => write!(f, "NaN"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

// Largest integer an f64 holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Lines(lines) => lines.serialize(serializer),
            Self::Date(d) => serializer.serialize_str(&format_date(d)),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

/// A parsed envelope: header fields in the order they first appeared,
/// plus the body field when the message had one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    fields: Vec<(String, Value)>,
    body_key: String,
}

impl Message {
    #[must_use]
    pub fn new(body_key: impl Into<String>) -> Self {
        Self {
            fields: Vec::new(),
            body_key: body_key.into(),
        }
    }

    /// Insert or replace a field. A replaced field keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(existing) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    #[must_use]
    pub fn get_date(&self, key: &str) -> Option<&DateTime<Utc>> {
        self.get(key).and_then(Value::as_date)
    }

    #[must_use]
    pub fn get_lines(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(Value::as_lines)
    }

    /// The body field, absent when the message had no blank separator line
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.get(&self.body_key)
    }

    /// Name of the field the body is stored under
    #[must_use]
    pub fn body_key(&self) -> &str {
        &self.body_key
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the message as a JSON object, fields in message order
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ParseError::Serialize(e.to_string()))
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
