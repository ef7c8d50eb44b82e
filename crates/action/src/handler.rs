//! Per-action handler contract and the dispatch entry point.
//!
//! Handler authors implement [`ActionHandler`]. Callers go through
//! [`ActionHandlerExt::respond`] / [`ActionHandlerExt::handle`], which run the
//! required-parameter gate and turn every outcome, including a panic, into
//! exactly one [`ResponseEnvelope`].

use std::any::Any;
use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;

use crate::envelope::ResponseEnvelope;
use crate::error::ActionError;
use crate::session::ActionSession;

/// A named, stateless unit of business logic.
///
/// One instance is shared by every concurrent dispatch of its action, so
/// implementations must not keep per-request state in `self`; everything a
/// call needs arrives in the [`ActionSession`].
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use courier_action::{ActionError, ActionHandler, ActionSession, ResponseEnvelope};
///
/// struct SendLike;
///
/// #[async_trait]
/// impl ActionHandler for SendLike {
///     fn path(&self) -> &str {
///         "send_like"
///     }
///
///     fn required_params(&self) -> &[&str] {
///         &["user_id"]
///     }
///
///     async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
///         let times = session.get_int_or_null("times").unwrap_or(1);
///         if !(1..=10).contains(&times) {
///             return Err(ActionError::logic("times must be within 1..=10"));
///         }
///         Ok(session.ok())
///     }
/// }
/// ```
#[async_trait]
pub trait ActionHandler: Send + Sync + 'static {
    /// Canonical action name.
    fn path(&self) -> &str;

    /// Additional names this handler answers to.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Parameters that must be present before [`run`](Self::run) is entered.
    fn required_params(&self) -> &[&str] {
        &[]
    }

    /// The action's business logic.
    ///
    /// Accessor failures propagated with `?` are reported as
    /// internal-handler-error; map them with
    /// [`ParamError::into_bad_param`](crate::ParamError::into_bad_param) to
    /// report bad-parameter instead.
    async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError>;
}

/// Entry points every [`ActionHandler`] gets for free.
#[async_trait]
pub trait ActionHandlerExt: ActionHandler {
    /// Run the handler and always produce an envelope.
    ///
    /// 1. The first name in [`required_params`](ActionHandler::required_params)
    ///    missing from `session` short-circuits with `bad-parameter`.
    /// 2. Otherwise [`run`](ActionHandler::run) is awaited; an `Err` becomes a
    ///    failure envelope.
    ///
    /// Both steps run inside the panic guard: a panic anywhere in the
    /// handler's own code becomes `internal-handler-error`.
    async fn respond(&self, session: &ActionSession) -> ResponseEnvelope {
        let guarded = AssertUnwindSafe(async {
            if let Some(missing) = first_missing(self.required_params(), session) {
                tracing::debug!(action = self.path(), param = missing, "required parameter missing");
                return Ok(ResponseEnvelope::no_param(missing, session.echo()));
            }
            self.run(session).await
        });

        match guarded.catch_unwind().await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "action failed");
                ResponseEnvelope::failed(err.status(), err.message(), session.echo())
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::error!(panic = %reason, "action panicked");
                ResponseEnvelope::internal(reason, session.echo())
            }
        }
    }

    /// [`respond`](Self::respond), serialized to the wire form.
    async fn handle(&self, session: &ActionSession) -> String {
        self.respond(session).await.to_json()
    }
}

impl<T: ActionHandler + ?Sized> ActionHandlerExt for T {}

fn first_missing<'a>(required: &'a [&'a str], session: &ActionSession) -> Option<&'a str> {
    required.iter().copied().find(|name| !session.has(name))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic");
    format!("handler panicked: {detail}")
}
