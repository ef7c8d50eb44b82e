//! Loosely-typed input values and their shape classification.

use std::fmt;

use serde_json::{Number, Value};

/// Shape of a parameter value as seen by the typed accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value, or an explicit JSON `null`.
    Null,
    /// `true` / `false`.
    Bool,
    /// Any JSON number.
    Number,
    /// A JSON string.
    String,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl ValueKind {
    /// Classify a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Lowercase name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw parameter value handed to
/// [`ActionSession::from_raw`](crate::ActionSession::from_raw).
///
/// Callers that only have loosely-typed data (query strings, host callbacks,
/// command-line flags) build these; the session infers the stored shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Absent; the entry is dropped.
    Null,
    /// Stored as a string.
    Str(String),
    /// Stored as an integer.
    Int(i64),
    /// Stored as an unsigned integer.
    UInt(u64),
    /// Stored as a number; must be finite.
    Float(f64),
    /// Stored as its Unicode code point.
    Char(char),
    /// Stored as a boolean.
    Bool(bool),
    /// Already structured; only objects and arrays are accepted.
    Json(Value),
}

impl RawValue {
    /// Infer a value from a command-line style token.
    ///
    /// `true`/`false` become booleans, base-10 integers become integers,
    /// finite decimals become floats, everything else stays a string.
    #[must_use]
    pub fn infer(token: &str) -> Self {
        match token {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(n) = token.parse::<i64>() {
            return Self::Int(n);
        }
        if let Ok(n) = token.parse::<u64>() {
            return Self::UInt(n);
        }
        match token.parse::<f64>() {
            Ok(f) if f.is_finite() && token.contains('.') => Self::Float(f),
            _ => Self::Str(token.to_owned()),
        }
    }

    /// Convert into the stored representation.
    ///
    /// Returns `Ok(None)` for [`RawValue::Null`] and `Err` with a short
    /// description for values the session cannot represent.
    pub(crate) fn into_json(self) -> Result<Option<Value>, &'static str> {
        let value = match self {
            Self::Null => return Ok(None),
            Self::Str(s) => Value::String(s),
            Self::Int(n) => Value::from(n),
            Self::UInt(n) => Value::from(n),
            Self::Float(f) => Number::from_f64(f)
                .map(Value::Number)
                .ok_or("non-finite float")?,
            Self::Char(c) => Value::from(u32::from(c)),
            Self::Bool(b) => Value::Bool(b),
            Self::Json(v @ (Value::Object(_) | Value::Array(_))) => v,
            Self::Json(Value::Null) => return Err("json null"),
            Self::Json(Value::Bool(_)) => return Err("json boolean"),
            Self::Json(Value::Number(_)) => return Err("json number"),
            Self::Json(Value::String(_)) => return Err("json string"),
        };
        Ok(Some(value))
    }
}

macro_rules! raw_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for RawValue {
            fn from(n: $t) -> Self {
                Self::Int(i64::from(n))
            }
        }
    )*};
}

macro_rules! raw_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for RawValue {
            fn from(n: $t) -> Self {
                Self::UInt(u64::from(n))
            }
        }
    )*};
}

raw_from_signed!(i8, i16, i32, i64);
raw_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for RawValue {
    fn from(n: isize) -> Self {
        // isize is at most 64 bits on supported targets
        Self::Int(n as i64)
    }
}

impl From<usize> for RawValue {
    fn from(n: usize) -> Self {
        Self::UInt(n as u64)
    }
}

impl From<f32> for RawValue {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<char> for RawValue {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Value> for RawValue {
    fn from(v: Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
