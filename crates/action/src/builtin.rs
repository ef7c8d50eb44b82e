//! Framework-info handlers that need nothing beyond the dispatch core.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;

use crate::envelope::ResponseEnvelope;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::registry::ActionRegistry;
use crate::session::ActionSession;

/// Name reported by `get_version`.
pub const APP_NAME: &str = "courier";
/// Protocol revision reported by `get_version`.
pub const PROTOCOL_VERSION: &str = "v11";

/// `test`: echoes the parameter bag back as payload.
#[derive(Debug, Default)]
pub struct TestHandler;

#[async_trait]
impl ActionHandler for TestHandler {
    fn path(&self) -> &str {
        "test"
    }

    async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
        let keys: Vec<&str> = session.keys().collect();
        tracing::debug!(?keys, "test action");
        Ok(session.ok_with(session.params()))
    }
}

/// Payload of `get_status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusInfo {
    /// The dispatcher is healthy.
    pub good: bool,
    /// The dispatcher accepts requests.
    pub online: bool,
    /// Seconds since the handler was created.
    pub uptime_secs: u64,
}

/// `get_status`: liveness and uptime.
#[derive(Debug)]
pub struct GetStatus {
    started: Instant,
}

impl GetStatus {
    /// Start the uptime clock now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for GetStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionHandler for GetStatus {
    fn path(&self) -> &str {
        "get_status"
    }

    async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
        Ok(session.ok_with(StatusInfo {
            good: true,
            online: true,
            uptime_secs: self.started.elapsed().as_secs(),
        }))
    }
}

/// Payload of `get_version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Application name.
    pub app_name: &'static str,
    /// Crate version.
    pub app_version: &'static str,
    /// Protocol revision.
    pub protocol_version: &'static str,
}

/// `get_version` (alias `get_version_info`).
#[derive(Debug, Default)]
pub struct GetVersion;

#[async_trait]
impl ActionHandler for GetVersion {
    fn path(&self) -> &str {
        "get_version"
    }

    fn aliases(&self) -> &[&str] {
        &["get_version_info"]
    }

    async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
        Ok(session.ok_with(VersionInfo {
            app_name: APP_NAME,
            app_version: env!("CARGO_PKG_VERSION"),
            protocol_version: PROTOCOL_VERSION,
        }))
    }
}

/// `get_supported_actions`: every name the registry answers to.
///
/// The list is fixed when the registry is assembled by [`registry`].
#[derive(Debug)]
pub struct GetSupportedActions {
    names: Vec<String>,
}

impl GetSupportedActions {
    const PATH: &'static str = "get_supported_actions";

    /// Report `names` (sorted) plus this handler's own path.
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        names.push(Self::PATH.to_owned());
        names.sort_unstable();
        names.dedup();
        Self { names }
    }
}

#[async_trait]
impl ActionHandler for GetSupportedActions {
    fn path(&self) -> &str {
        Self::PATH
    }

    async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
        Ok(session.ok_with(&self.names))
    }
}

/// Registry holding only the built-in handlers.
#[must_use]
pub fn default_registry() -> ActionRegistry {
    registry(std::iter::empty())
}

/// Assemble a registry of the built-in handlers followed by `extra`.
///
/// `extra` is registered after the built-ins, so it may replace any of them.
/// `get_supported_actions` is added last and lists every resulting name.
#[must_use]
pub fn registry<I>(extra: I) -> ActionRegistry
where
    I: IntoIterator<Item = Arc<dyn ActionHandler>>,
{
    let mut handlers: Vec<Arc<dyn ActionHandler>> = vec![
        Arc::new(TestHandler),
        Arc::new(GetStatus::new()),
        Arc::new(GetVersion),
    ];
    handlers.extend(extra);

    let mut registry = ActionRegistry::from_handlers(handlers);
    let names: Vec<String> = registry.names().into_iter().map(str::to_owned).collect();
    if !registry.contains(GetSupportedActions::PATH) {
        registry.register([Arc::new(GetSupportedActions::new(names)) as Arc<dyn ActionHandler>]);
    }
    tracing::debug!(actions = registry.len(), "action registry assembled");
    registry
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::handler::ActionHandlerExt;

    #[tokio::test]
    async fn get_status_reports_liveness() {
        let env = GetStatus::new().respond(&ActionSession::empty("42")).await;
        assert!(env.is_success());
        assert_eq!(env.payload()["good"], json!(true));
        assert_eq!(env.payload()["online"], json!(true));
        assert_eq!(env.echo(), "42");
        assert_eq!(env.message(), "");
    }

    #[tokio::test]
    async fn test_echoes_params() {
        let session = ActionSession::from_json(json!({"a": 1, "b": [true]}), "").unwrap();
        let env = TestHandler.respond(&session).await;
        assert_eq!(env.payload(), &json!({"a": 1, "b": [true]}));
    }

    #[tokio::test]
    async fn version_alias_resolves() {
        let reg = default_registry();
        let handler = reg.lookup("get_version_info").unwrap();
        let env = handler.respond(&ActionSession::empty("")).await;
        assert_eq!(env.payload()["app_name"], json!("courier"));
        assert_eq!(env.payload()["protocol_version"], json!("v11"));
    }

    #[tokio::test]
    async fn supported_actions_lists_every_name() {
        let reg = default_registry();
        let env = reg
            .lookup("get_supported_actions")
            .unwrap()
            .respond(&ActionSession::empty(""))
            .await;
        assert_eq!(
            env.payload(),
            &json!([
                "get_status",
                "get_supported_actions",
                "get_version",
                "get_version_info",
                "test"
            ])
        );
        assert_eq!(reg.len(), 5);
    }

    #[tokio::test]
    async fn extra_handlers_override_builtins() {
        struct MyStatus;

        #[async_trait]
        impl ActionHandler for MyStatus {
            fn path(&self) -> &str {
                "get_status"
            }

            async fn run(&self, s: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
                Ok(s.ok())
            }
        }

        let reg = registry([Arc::new(MyStatus) as Arc<dyn ActionHandler>]);
        let env = reg
            .lookup("get_status")
            .unwrap()
            .respond(&ActionSession::empty(""))
            .await;
        assert!(env.is_success());
        assert!(env.has_empty_payload());
    }
}
