//! Uniform response envelope returned by every dispatch.
//!
//! The serialized form is a single JSON object with a fixed field order:
//!
//! ```json
//! {"status":"ok","retcode":0,"data":{},"message":"","echo":"42"}
//! ```
//!
//! `status` carries the success flag (`"ok"` / `"failed"`), `retcode` the
//! numeric [`Status`], and `data` the payload, where `{}` marks "no payload".

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::EnvelopeError;

const OUTCOME_OK: &str = "ok";
const OUTCOME_FAILED: &str = "failed";

/// Used when an envelope cannot be encoded at all.
const ENCODING_FAILURE: &str =
    r#"{"status":"failed","retcode":20002,"data":{},"message":"envelope encoding failed","echo":""}"#;

/// Result status of one dispatch.
///
/// The core itself only produces `Ok`, `BadParam`, `LogicError` and
/// `InternalHandlerError`. `BadRequest` and `UnsupportedAction` belong to the
/// callers of the core; `Custom` carries domain-specific codes.
///
/// Statuses compare and hash by [`code`](Self::code), so `Custom(10003)` is
/// the same status as `BadParam`. [`Status::custom`] and [`Status::from_code`]
/// return the named variant for a known code.
#[derive(Debug, Clone, Copy)]
pub enum Status {
    /// Success.
    Ok,
    /// The request itself could not be understood.
    BadRequest,
    /// No handler is registered under the requested name.
    UnsupportedAction,
    /// A parameter is missing or unusable.
    BadParam,
    /// Unexpected failure while processing.
    InternalHandlerError,
    /// A business-level precondition does not hold.
    LogicError,
    /// Domain-specific failure code.
    Custom(u32),
}

impl Status {
    /// Numeric code written to the `retcode` field.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::Ok => 0,
            Self::BadRequest => 10001,
            Self::UnsupportedAction => 10002,
            Self::BadParam => 10003,
            Self::InternalHandlerError => 20002,
            Self::LogicError => 35000,
            Self::Custom(code) => code,
        }
    }

    /// Map a numeric code back to a status.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Ok,
            10001 => Self::BadRequest,
            10002 => Self::UnsupportedAction,
            10003 => Self::BadParam,
            20002 => Self::InternalHandlerError,
            35000 => Self::LogicError,
            other => Self::Custom(other),
        }
    }

    /// Domain-specific status, resolved to a named variant when `code`
    /// already has one.
    #[must_use]
    pub const fn custom(code: u32) -> Self {
        Self::from_code(code)
    }

    /// Named variant for this status's code.
    #[must_use]
    pub const fn canonical(self) -> Self {
        Self::from_code(self.code())
    }

    /// Returns `true` for the success code.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        self.code() == 0
    }

    /// Stable kebab-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BadRequest => "bad-request",
            Self::UnsupportedAction => "unsupported-action",
            Self::BadParam => "bad-parameter",
            Self::InternalHandlerError => "internal-handler-error",
            Self::LogicError => "logic-error",
            Self::Custom(_) => "custom",
        }
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Self::Custom(code) => write!(f, "custom({code})"),
            other => f.write_str(other.label()),
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_code)
    }
}

/// The result of one dispatch.
///
/// Fields are private; the constructors guarantee that a successful envelope
/// always carries [`Status::Ok`] and that a failed one always carries the
/// empty payload marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "status", serialize_with = "serialize_outcome")]
    success: bool,
    #[serde(rename = "retcode")]
    status: Status,
    #[serde(rename = "data")]
    payload: Value,
    message: String,
    echo: String,
}

fn serialize_outcome<S: Serializer>(success: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *success { OUTCOME_OK } else { OUTCOME_FAILED })
}

/// The explicit "no payload" marker, `{}`.
#[must_use]
pub fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl ResponseEnvelope {
    /// Success without payload.
    #[must_use]
    pub fn ok(echo: impl Into<String>) -> Self {
        Self {
            success: true,
            status: Status::Ok,
            payload: empty_object(),
            message: String::new(),
            echo: echo.into(),
        }
    }

    /// Success carrying `data` as payload.
    ///
    /// A value that serializes to `null` is stored as the empty marker. If
    /// serialization fails the result is an internal-handler-error envelope.
    pub fn ok_with<T: Serialize>(data: T, echo: impl Into<String>) -> Self {
        let echo = echo.into();
        match serde_json::to_value(data) {
            Ok(Value::Null) => Self::ok(echo),
            Ok(payload) => Self {
                payload,
                ..Self::ok(echo)
            },
            Err(err) => Self::internal(format!("failed to encode payload: {err}"), echo),
        }
    }

    /// Set the message of a successful envelope.
    ///
    /// A failure envelope keeps the message it was built with.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        if self.success {
            self.message = msg.into();
        }
        self
    }

    /// Failure with the given status and message.
    ///
    /// The status is stored in its [canonical](Status::canonical) form.
    /// `Status::Ok` is not a failure status and is reported as
    /// [`Status::InternalHandlerError`].
    pub fn failed(status: Status, msg: impl Into<String>, echo: impl Into<String>) -> Self {
        let status = status.canonical();
        let status = if status.is_ok() {
            tracing::warn!("failure envelope requested with ok status");
            Status::InternalHandlerError
        } else {
            status
        };
        Self {
            success: false,
            status,
            payload: empty_object(),
            message: msg.into(),
            echo: echo.into(),
        }
    }

    /// A required parameter is missing.
    pub fn no_param(name: &str, echo: impl Into<String>) -> Self {
        Self::failed(Status::BadParam, format!("lack of [{name}]"), echo)
    }

    /// A parameter is present but unusable.
    pub fn bad_param(why: impl Into<String>, echo: impl Into<String>) -> Self {
        Self::failed(Status::BadParam, why, echo)
    }

    /// A business-level precondition does not hold.
    pub fn logic(why: impl Into<String>, echo: impl Into<String>) -> Self {
        Self::failed(Status::LogicError, why, echo)
    }

    /// Unexpected failure while processing.
    pub fn internal(why: impl Into<String>, echo: impl Into<String>) -> Self {
        Self::failed(Status::InternalHandlerError, why, echo)
    }

    /// No handler is registered under `action`.
    pub fn unsupported_action(action: &str, echo: impl Into<String>) -> Self {
        Self::failed(
            Status::UnsupportedAction,
            format!("unsupported action [{action}]"),
            echo,
        )
    }

    /// Whether the dispatch succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Result status.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Payload; `{}` when there is none.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Whether the payload is the empty marker.
    #[must_use]
    pub fn has_empty_payload(&self) -> bool {
        matches!(&self.payload, Value::Object(map) if map.is_empty())
    }

    /// Human-readable message; empty on success unless set with
    /// [`with_message`](Self::with_message).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Echo token copied from the request.
    #[must_use]
    pub fn echo(&self) -> &str {
        &self.echo
    }

    /// Serialize to the wire form.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to encode response envelope");
            ENCODING_FAILURE.to_owned()
        })
    }

    /// Parse the wire form, rejecting envelopes that break the
    /// success/status invariant.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError`] on malformed JSON, an unknown outcome
    /// string, or an outcome that contradicts the status code.
    pub fn from_json(text: &str) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope = serde_json::from_str(text)?;
        let success = match wire.status.as_str() {
            OUTCOME_OK => true,
            OUTCOME_FAILED => false,
            _ => return Err(EnvelopeError::UnknownOutcome(wire.status)),
        };
        if success != wire.retcode.is_ok() {
            return Err(EnvelopeError::Inconsistent {
                outcome: wire.status,
                code: wire.retcode.code(),
            });
        }
        let payload = if success { wire.data } else { empty_object() };
        Ok(Self {
            success,
            status: wire.retcode,
            payload,
            message: wire.message,
            echo: wire.echo,
        })
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[derive(Deserialize)]
struct WireEnvelope {
    status: String,
    retcode: Status,
    #[serde(default = "empty_object")]
    data: Value,
    #[serde(default)]
    message: String,
    #[serde(default)]
    echo: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn assert_invariant(env: &ResponseEnvelope) {
        assert_eq!(env.is_success(), env.status() == Status::Ok);
        if env.status() != Status::Ok {
            assert!(env.has_empty_payload());
        }
    }

    #[test]
    fn ok_wire_format() {
        assert_snapshot!(
            ResponseEnvelope::ok("42").to_json(),
            @r#"{"status":"ok","retcode":0,"data":{},"message":"","echo":"42"}"#
        );
    }

    #[test]
    fn failure_wire_format() {
        assert_snapshot!(
            ResponseEnvelope::no_param("group_id", "e1").to_json(),
            @r#"{"status":"failed","retcode":10003,"data":{},"message":"lack of [group_id]","echo":"e1"}"#
        );
    }

    #[test]
    fn ok_with_payload() {
        let env = ResponseEnvelope::ok_with(json!({"user_id": 10001}), "x");
        assert!(env.is_success());
        assert_eq!(env.payload(), &json!({"user_id": 10001}));
        assert_eq!(env.message(), "");
        assert_eq!(env.echo(), "x");
    }

    #[test]
    fn ok_with_unit_is_empty_marker() {
        let env = ResponseEnvelope::ok_with((), "");
        assert!(env.has_empty_payload());
    }

    #[test]
    fn ok_with_unencodable_payload_is_internal_error() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);
        let env = ResponseEnvelope::ok_with(map, "e");
        assert_eq!(env.status(), Status::InternalHandlerError);
        assert!(env.message().starts_with("failed to encode payload"));
        assert_eq!(env.echo(), "e");
    }

    #[test]
    fn failed_with_ok_status_is_coerced() {
        let env = ResponseEnvelope::failed(Status::Ok, "nope", "");
        assert_eq!(env.status(), Status::InternalHandlerError);
        assert!(!env.is_success());
    }

    #[test]
    fn every_constructor_keeps_invariant() {
        let envelopes = [
            ResponseEnvelope::ok("a"),
            ResponseEnvelope::ok_with(vec![1, 2, 3], "a"),
            ResponseEnvelope::bad_param("why", "a"),
            ResponseEnvelope::no_param("p", "a"),
            ResponseEnvelope::logic("why", "a"),
            ResponseEnvelope::internal("why", "a"),
            ResponseEnvelope::unsupported_action("bogus", "a"),
            ResponseEnvelope::failed(Status::Custom(36000), "tired", "a"),
            ResponseEnvelope::failed(Status::Custom(0), "zero", "a"),
            ResponseEnvelope::failed(Status::Custom(10003), "collides", "a"),
            ResponseEnvelope::ok("a").with_message("done"),
            ResponseEnvelope::ok_with(json!({"n": 1}), "a").with_message("done"),
            ResponseEnvelope::logic("why", "a").with_message("ignored"),
        ];
        for env in &envelopes {
            assert_invariant(env);
            assert_eq!(env.echo(), "a");
        }
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [
            Status::Ok,
            Status::BadRequest,
            Status::UnsupportedAction,
            Status::BadParam,
            Status::InternalHandlerError,
            Status::LogicError,
            Status::Custom(36000),
        ] {
            assert_eq!(Status::from_code(status.code()), status);
        }
    }

    #[test]
    fn custom_codes_collapse_onto_named_statuses() {
        assert_eq!(Status::Custom(10003), Status::BadParam);
        assert_eq!(Status::Custom(0), Status::Ok);
        assert_eq!(Status::Custom(0).is_ok(), Status::Custom(0) == Status::Ok);
        assert_ne!(Status::Custom(36000), Status::LogicError);
        assert!(matches!(Status::custom(20002), Status::InternalHandlerError));
        assert!(matches!(Status::custom(36000), Status::Custom(36000)));
        assert_eq!(Status::Custom(10003).to_string(), "bad-parameter");

        let set: std::collections::HashSet<Status> =
            [Status::Custom(35000), Status::LogicError].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn colliding_custom_code_survives_wire_round_trip() {
        let env = ResponseEnvelope::failed(Status::Custom(10003), "x", "e");
        assert!(matches!(env.status(), Status::BadParam));

        let back = ResponseEnvelope::from_json(&env.to_json()).unwrap();
        assert_eq!(back, env);
        assert_eq!(back.status(), Status::BadParam);
    }

    #[test]
    fn custom_zero_failure_is_coerced() {
        let env = ResponseEnvelope::failed(Status::Custom(0), "zero", "");
        assert_eq!(env.status(), Status::InternalHandlerError);
        assert!(!env.is_success());
    }

    #[test]
    fn success_message_round_trips() {
        let env = ResponseEnvelope::ok_with(json!({"id": 7}), "m").with_message("sent");
        assert!(env.is_success());
        assert_eq!(env.message(), "sent");
        assert_snapshot!(
            env.to_json(),
            @r#"{"status":"ok","retcode":0,"data":{"id":7},"message":"sent","echo":"m"}"#
        );
        assert_eq!(ResponseEnvelope::from_json(&env.to_json()).unwrap(), env);
    }

    #[test]
    fn with_message_leaves_failures_alone() {
        let env = ResponseEnvelope::logic("muted", "").with_message("done");
        assert_eq!(env.message(), "muted");
        assert_eq!(env.status(), Status::LogicError);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::BadParam.to_string(), "bad-parameter");
        assert_eq!(Status::Custom(36000).to_string(), "custom(36000)");
    }

    #[test]
    fn parse_wire_form() {
        let env = ResponseEnvelope::from_json(
            r#"{"status":"ok","retcode":0,"data":{"good":true},"message":"","echo":"42"}"#,
        )
        .unwrap();
        assert_eq!(env, ResponseEnvelope::ok_with(json!({"good": true}), "42"));
    }

    #[test]
    fn parse_rejects_inconsistent_outcome() {
        let err = ResponseEnvelope::from_json(
            r#"{"status":"ok","retcode":10003,"data":{},"message":"","echo":""}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EnvelopeError::Inconsistent { code: 10003, .. }));

        let err = ResponseEnvelope::from_json(
            r#"{"status":"maybe","retcode":0,"data":{},"message":"","echo":""}"#,
        )
        .unwrap_err();
        assert!(matches!(err, EnvelopeError::UnknownOutcome(_)));
    }
}
