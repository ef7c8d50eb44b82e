use std::io::Write;

use anyhow::Result;
use clap::Args;
use courier_action::{ActionSession, Dispatcher, RawValue, ResponseEnvelope, Status, ValueKind};
use serde_json::{Map, Value};

/// Arguments of `courier call`.
#[derive(Debug, Args)]
pub struct CallArgs {
    /// Action name or alias
    pub action: String,

    /// Parameters as a JSON object
    #[arg(long, value_name = "JSON")]
    pub params: Option<String>,

    /// One parameter; the value's type is inferred (bool, integer, decimal, else string).
    /// Repeatable, and wins over the same key in --params
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub param: Vec<(String, String)>,

    /// Token echoed back in the response
    #[arg(long, default_value = "")]
    pub echo: String,

    /// Per-call timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

/// Dispatch the call and write the envelope. Returns the envelope's success flag.
pub async fn run(args: &CallArgs, dispatcher: &Dispatcher, out: &mut impl Write) -> Result<bool> {
    let envelope = match session(args) {
        Ok(session) => dispatcher.dispatch(&args.action, &session).await,
        Err(rejected) => {
            tracing::warn!(action = %args.action, message = rejected.message(), "request rejected");
            rejected
        }
    };
    writeln!(out, "{}", envelope.to_json())?;
    Ok(envelope.is_success())
}

/// Merge `--params` and `-p` into a session; a malformed request becomes a
/// `bad-request` envelope.
fn session(args: &CallArgs) -> Result<ActionSession, ResponseEnvelope> {
    let bad_request = |why: String| ResponseEnvelope::failed(Status::BadRequest, why, &args.echo);

    let mut params = match args.params.as_deref() {
        None => Map::new(),
        Some(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(bad_request(format!(
                    "--params must be a JSON object, got {}",
                    ValueKind::of(&other)
                )));
            }
            Err(e) => return Err(bad_request(format!("--params is not valid JSON: {e}"))),
        },
    };

    let inline = ActionSession::from_raw(
        args.param
            .iter()
            .map(|(key, value)| (key.as_str(), RawValue::infer(value))),
        "",
    )
    .map_err(|e| bad_request(e.to_string()))?;
    params.extend(inline.params().clone());

    Ok(ActionSession::from_object(params, args.echo.as_str()))
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn args(action: &str) -> CallArgs {
        CallArgs {
            action: action.to_owned(),
            params: None,
            param: Vec::new(),
            echo: String::new(),
            timeout_ms: None,
        }
    }

    #[test]
    fn key_value_parsing() {
        assert_eq!(
            parse_key_value("user_id=42"),
            Ok(("user_id".to_owned(), "42".to_owned()))
        );
        assert_eq!(
            parse_key_value("msg=a=b"),
            Ok(("msg".to_owned(), "a=b".to_owned()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn inline_params_override_json() {
        let call = CallArgs {
            params: Some(r#"{"user_id": 1, "group_id": 2}"#.into()),
            param: vec![
                ("user_id".into(), "7".into()),
                ("auto_escape".into(), "true".into()),
            ],
            echo: "e".into(),
            ..args("test")
        };
        let session = session(&call).unwrap();
        assert_eq!(
            Value::Object(session.params().clone()),
            json!({"user_id": 7, "group_id": 2, "auto_escape": true})
        );
        assert_eq!(session.echo(), "e");
    }

    #[test]
    fn non_object_params_are_a_bad_request() {
        let call = CallArgs {
            params: Some("[1, 2]".into()),
            echo: "x".into(),
            ..args("test")
        };
        let rejected = session(&call).unwrap_err();
        assert_eq!(rejected.status(), Status::BadRequest);
        assert_eq!(rejected.message(), "--params must be a JSON object, got array");
        assert_eq!(rejected.echo(), "x");
    }

    #[tokio::test]
    async fn writes_one_envelope_line() {
        let dispatcher = Dispatcher::new(Arc::new(courier_action::builtin::default_registry()));
        let call = CallArgs {
            param: vec![("a".into(), "1".into())],
            echo: "9".into(),
            ..args("test")
        };
        let mut out = Vec::new();
        let ok = run(&call, &dispatcher, &mut out).await.unwrap();

        assert!(ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"status\":\"ok\",\"retcode\":0,\"data\":{\"a\":1},\"message\":\"\",\"echo\":\"9\"}\n"
        );
    }
}
