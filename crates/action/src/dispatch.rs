//! Name-based dispatch over a shared [`ActionRegistry`].

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::envelope::ResponseEnvelope;
use crate::handler::ActionHandlerExt;
use crate::registry::ActionRegistry;
use crate::session::ActionSession;

/// Dispatcher settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Upper bound on a single dispatch, in milliseconds. `None` waits
    /// for the handler indefinitely.
    pub timeout_ms: Option<u64>,
}

impl DispatchConfig {
    /// Per-dispatch timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Resolves action names and runs the matching handler.
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a dispatcher with default settings.
    #[must_use]
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self::with_config(registry, DispatchConfig::default())
    }

    /// Create a dispatcher with explicit settings.
    #[must_use]
    pub fn with_config(registry: Arc<ActionRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this dispatcher resolves against.
    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Active settings.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run `action` against `session` and return its envelope.
    ///
    /// An unknown name yields an `unsupported-action` envelope. When a
    /// timeout is configured and elapses, the pending handler future is
    /// dropped and an `internal-handler-error` envelope is returned.
    pub async fn dispatch(&self, action: &str, session: &ActionSession) -> ResponseEnvelope {
        let span = tracing::debug_span!("dispatch", action, echo = session.echo());
        async {
            let Some(handler) = self.registry.lookup(action) else {
                tracing::warn!("unsupported action");
                return ResponseEnvelope::unsupported_action(action, session.echo());
            };

            let envelope = match self.config.timeout() {
                Some(limit) => tokio::time::timeout(limit, handler.respond(session))
                    .await
                    .unwrap_or_else(|_| {
                        tracing::warn!(timeout = ?limit, "action timed out");
                        ResponseEnvelope::internal(
                            format!("action {action} timed out"),
                            session.echo(),
                        )
                    }),
                None => handler.respond(session).await,
            };

            if envelope.is_success() {
                tracing::debug!(status = %envelope.status(), "action completed");
            } else {
                tracing::warn!(
                    status = %envelope.status(),
                    message = envelope.message(),
                    "action failed"
                );
            }
            envelope
        }
        .instrument(span)
        .await
    }

    /// [`dispatch`](Self::dispatch), serialized to the wire form.
    pub async fn dispatch_json(&self, action: &str, session: &ActionSession) -> String {
        self.dispatch(action, session).await.to_json()
    }
}
