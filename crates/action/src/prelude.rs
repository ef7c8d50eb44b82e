//! Convenience re-exports for handler authors.
//!
//! ```rust
//! use courier_action::prelude::*;
//! ```

pub use crate::dispatch::Dispatcher;
pub use crate::envelope::{ResponseEnvelope, Status};
pub use crate::error::{ActionError, ParamError};
pub use crate::handler::{ActionHandler, ActionHandlerExt};
pub use crate::registry::ActionRegistry;
pub use crate::session::ActionSession;
pub use crate::value::RawValue;
