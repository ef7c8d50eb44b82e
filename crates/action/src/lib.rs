//! # Courier Action
//!
//! Action-dispatch core: a registry mapping action names to handlers, a
//! typed view over each request's parameter bag, a required-parameter gate,
//! and a uniform response envelope every handler answers with.
//!
//! ## Core Types
//!
//! - [`ActionHandler`]: per-action contract (name, aliases, required
//!   parameters, business logic)
//! - [`ActionHandlerExt`]: gated entry points (`respond`, `handle`)
//! - [`ActionRegistry`]: name and alias lookup, last registration wins
//! - [`ActionSession`]: immutable parameter bag with typed accessors
//! - [`ResponseEnvelope`] / [`Status`]: result encoding
//! - [`Dispatcher`]: name-based dispatch with an optional timeout
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use courier_action::prelude::*;
//!
//! struct GetUid;
//!
//! #[async_trait]
//! impl ActionHandler for GetUid {
//!     fn path(&self) -> &str { "get_uid" }
//!     fn required_params(&self) -> &[&str] { &["uin"] }
//!
//!     async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
//!         let uin = session.get_long("uin")?;
//!         Ok(session.ok_with(serde_json::json!({ "uid": format!("u_{uin}") })))
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = courier_action::builtin::registry([Arc::new(GetUid) as Arc<dyn ActionHandler>]);
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//!
//! let session = ActionSession::from_raw([("uin", 10001)], "req-1").unwrap();
//! let envelope = dispatcher.dispatch("get_uid", &session).await;
//! assert!(envelope.is_success());
//! assert_eq!(envelope.echo(), "req-1");
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Framework-info handlers and registry assembly.
pub mod builtin;
/// Name-based dispatch and its settings.
pub mod dispatch;
/// Response envelope and status taxonomy.
pub mod envelope;
/// Error types for accessors, session construction and business logic.
pub mod error;
/// Handler contract and gated entry points.
pub mod handler;
/// Convenience re-exports for handler authors.
pub mod prelude;
/// Action name lookup table.
pub mod registry;
/// Per-request parameter bag.
pub mod session;
/// Raw input values and shape classification.
pub mod value;

// ── Public re-exports ───────────────────────────────────────────────────────

pub use dispatch::{DispatchConfig, Dispatcher};
pub use envelope::{ResponseEnvelope, Status, empty_object};
pub use error::{ActionError, EnvelopeError, ParamError, SessionError};
pub use handler::{ActionHandler, ActionHandlerExt};
pub use registry::ActionRegistry;
pub use session::ActionSession;
pub use value::{RawValue, ValueKind};
