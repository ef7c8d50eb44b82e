//! Per-request parameter bag with typed accessors.
//!
//! An [`ActionSession`] is built once per dispatch, never mutated, and
//! dropped when the handler returns. Every strict accessor has a lenient
//! twin that yields `None` instead of a [`ParamError`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::envelope::{ResponseEnvelope, Status};
use crate::error::{ParamError, SessionError};
use crate::value::{RawValue, ValueKind};

/// Immutable, typed view over the parameters of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSession {
    params: Map<String, Value>,
    echo: String,
}

impl ActionSession {
    /// A session with no parameters.
    #[must_use]
    pub fn empty(echo: impl Into<String>) -> Self {
        Self {
            params: Map::new(),
            echo: echo.into(),
        }
    }

    /// Build from loosely-typed entries, inferring each stored shape.
    ///
    /// [`RawValue::Null`] entries are skipped. Later entries overwrite
    /// earlier ones with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnsupportedValue`] for a value with no
    /// parameter representation (non-finite floats, bare JSON scalars).
    pub fn from_raw<I, K, V>(entries: I, echo: impl Into<String>) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        let mut params = Map::new();
        for (key, value) in entries {
            let key = key.into();
            match value.into().into_json() {
                Ok(Some(value)) => {
                    params.insert(key, value);
                }
                Ok(None) => {}
                Err(kind) => return Err(SessionError::UnsupportedValue { key, kind }),
            }
        }
        Ok(Self {
            params,
            echo: echo.into(),
        })
    }

    /// Build from an already-structured object.
    #[must_use]
    pub fn from_object(params: Map<String, Value>, echo: impl Into<String>) -> Self {
        Self {
            params,
            echo: echo.into(),
        }
    }

    /// Build from a JSON value that must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAnObject`] for any other shape.
    pub fn from_json(value: Value, echo: impl Into<String>) -> Result<Self, SessionError> {
        match value {
            Value::Object(params) => Ok(Self::from_object(params, echo)),
            other => Err(SessionError::NotAnObject {
                actual: ValueKind::of(&other),
            }),
        }
    }

    /// Opaque correlation token supplied by the caller.
    #[must_use]
    pub fn echo(&self) -> &str {
        &self.echo
    }

    /// The underlying parameter object.
    #[must_use]
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// Whether a value is stored under `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Number of stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameters are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterate over the stored keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    // ── Type predicates ────────────────────────────────────────────────────

    /// Whether the value under `key` is a string.
    #[must_use]
    pub fn is_string(&self, key: &str) -> bool {
        matches!(self.params.get(key), Some(Value::String(_)))
    }

    /// Whether the value under `key` is an array.
    #[must_use]
    pub fn is_array(&self, key: &str) -> bool {
        matches!(self.params.get(key), Some(Value::Array(_)))
    }

    /// Whether the value under `key` is an object.
    #[must_use]
    pub fn is_object(&self, key: &str) -> bool {
        matches!(self.params.get(key), Some(Value::Object(_)))
    }

    // ── Strict accessors ───────────────────────────────────────────────────

    /// Integer stored under `key`.
    ///
    /// Floats are accepted when they have no fractional part and fit in `i64`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if absent, [`ParamError::WrongType`] if not a
    /// number or not integral, [`ParamError::OutOfRange`] if it overflows.
    pub fn get_long(&self, key: &str) -> Result<i64, ParamError> {
        let value = self.require(key)?;
        let Value::Number(n) = value else {
            return Err(wrong_type(key, ValueKind::Number, value));
        };
        if let Some(v) = n.as_i64() {
            return Ok(v);
        }
        if n.is_u64() {
            return Err(out_of_range(key, "i64"));
        }
        let Some(f) = n.as_f64().filter(|f| f.fract() == 0.0) else {
            return Err(wrong_type(key, ValueKind::Number, value));
        };
        // i64::MAX is not exactly representable; 2^63 is the first float past it
        #[allow(clippy::cast_precision_loss)]
        let lower = i64::MIN as f64;
        if f >= -lower || f < lower {
            return Err(out_of_range(key, "i64"));
        }
        #[allow(clippy::cast_possible_truncation)]
        let v = f as i64;
        Ok(v)
    }

    /// 32-bit integer stored under `key`.
    ///
    /// # Errors
    ///
    /// As [`get_long`](Self::get_long), plus [`ParamError::OutOfRange`] when
    /// the value does not fit in `i32`.
    pub fn get_int(&self, key: &str) -> Result<i32, ParamError> {
        let v = self.get_long(key)?;
        i32::try_from(v).map_err(|_| out_of_range(key, "i32"))
    }

    /// String stored under `key`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if absent, [`ParamError::WrongType`] if not a
    /// string. Numbers are not stringified.
    pub fn get_string(&self, key: &str) -> Result<&str, ParamError> {
        match self.require(key)? {
            Value::String(s) => Ok(s),
            other => Err(wrong_type(key, ValueKind::String, other)),
        }
    }

    /// Boolean stored under `key`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if absent, [`ParamError::WrongType`] if not a
    /// boolean.
    pub fn get_boolean(&self, key: &str) -> Result<bool, ParamError> {
        match self.require(key)? {
            Value::Bool(b) => Ok(*b),
            other => Err(wrong_type(key, ValueKind::Bool, other)),
        }
    }

    /// Object stored under `key`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if absent, [`ParamError::WrongType`] if not an
    /// object.
    pub fn get_object(&self, key: &str) -> Result<&Map<String, Value>, ParamError> {
        match self.require(key)? {
            Value::Object(map) => Ok(map),
            other => Err(wrong_type(key, ValueKind::Object, other)),
        }
    }

    /// Array stored under `key`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if absent, [`ParamError::WrongType`] if not an
    /// array.
    pub fn get_array(&self, key: &str) -> Result<&[Value], ParamError> {
        match self.require(key)? {
            Value::Array(items) => Ok(items),
            other => Err(wrong_type(key, ValueKind::Array, other)),
        }
    }

    /// Decode the value under `key` into `T`.
    ///
    /// # Errors
    ///
    /// [`ParamError::Missing`] if absent, [`ParamError::Deserialize`] if the
    /// value does not match `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, ParamError> {
        let value = self.require(key)?;
        T::deserialize(value).map_err(|err| ParamError::Deserialize {
            key: key.to_owned(),
            reason: err.to_string(),
        })
    }

    // ── Lenient accessors ──────────────────────────────────────────────────

    /// Like [`get_long`](Self::get_long), `None` on any failure.
    #[must_use]
    pub fn get_long_or_null(&self, key: &str) -> Option<i64> {
        self.get_long(key).ok()
    }

    /// Like [`get_int`](Self::get_int), `None` on any failure.
    #[must_use]
    pub fn get_int_or_null(&self, key: &str) -> Option<i32> {
        self.get_int(key).ok()
    }

    /// Like [`get_string`](Self::get_string), `None` on any failure.
    #[must_use]
    pub fn get_string_or_null(&self, key: &str) -> Option<&str> {
        self.get_string(key).ok()
    }

    /// Boolean under `key`, or `default` when absent or not a boolean.
    #[must_use]
    pub fn get_boolean_or(&self, key: &str, default: bool) -> bool {
        self.get_boolean(key).unwrap_or(default)
    }

    /// Like [`get_object`](Self::get_object), `None` on any failure.
    #[must_use]
    pub fn get_object_or_null(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get_object(key).ok()
    }

    /// Like [`get_array`](Self::get_array), `None` on any failure.
    #[must_use]
    pub fn get_array_or_null(&self, key: &str) -> Option<&[Value]> {
        self.get_array(key).ok()
    }

    // ── Envelope helpers ───────────────────────────────────────────────────

    /// Success without payload, echoing this session.
    #[must_use]
    pub fn ok(&self) -> ResponseEnvelope {
        ResponseEnvelope::ok(self.echo.as_str())
    }

    /// Success with payload, echoing this session.
    pub fn ok_with<T: Serialize>(&self, data: T) -> ResponseEnvelope {
        ResponseEnvelope::ok_with(data, self.echo.as_str())
    }

    /// Success with payload and a message, echoing this session.
    pub fn ok_with_message<T: Serialize>(
        &self,
        data: T,
        msg: impl Into<String>,
    ) -> ResponseEnvelope {
        ResponseEnvelope::ok_with(data, self.echo.as_str()).with_message(msg)
    }

    /// Bad-parameter failure, echoing this session.
    pub fn bad_param(&self, why: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope::bad_param(why, self.echo.as_str())
    }

    /// Logic-error failure, echoing this session.
    pub fn logic_error(&self, why: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope::logic(why, self.echo.as_str())
    }

    /// Internal-handler-error failure, echoing this session.
    pub fn internal_error(&self, why: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope::internal(why, self.echo.as_str())
    }

    /// Failure with an arbitrary status, echoing this session.
    pub fn failed(&self, status: Status, why: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope::failed(status, why, self.echo.as_str())
    }

    fn require(&self, key: &str) -> Result<&Value, ParamError> {
        self.params.get(key).ok_or_else(|| ParamError::Missing {
            key: key.to_owned(),
        })
    }
}

fn wrong_type(key: &str, expected: ValueKind, actual: &Value) -> ParamError {
    ParamError::WrongType {
        key: key.to_owned(),
        expected,
        actual: ValueKind::of(actual),
    }
}

fn out_of_range(key: &str, expected: &'static str) -> ParamError {
    ParamError::OutOfRange {
        key: key.to_owned(),
        expected,
    }
}
