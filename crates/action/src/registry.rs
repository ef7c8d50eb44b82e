use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::ActionHandler;

/// Lookup table from action name (canonical path or alias) to handler.
///
/// Populated once at startup from an ordered list and then shared read-only,
/// typically as `Arc<ActionRegistry>`. When two handlers claim the same name
/// the one registered later wins; collisions are not rejected.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use courier_action::{ActionError, ActionHandler, ActionRegistry, ActionSession, ResponseEnvelope};
///
/// struct GetCookies;
///
/// #[async_trait]
/// impl ActionHandler for GetCookies {
///     fn path(&self) -> &str { "get_cookies" }
///     fn aliases(&self) -> &[&str] { &["cookies"] }
///     async fn run(&self, s: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
///         Ok(s.ok())
///     }
/// }
///
/// let mut registry = ActionRegistry::new();
/// registry.register([Arc::new(GetCookies) as Arc<dyn ActionHandler>]);
///
/// assert!(registry.lookup("get_cookies").is_some());
/// assert!(registry.lookup("cookies").is_some());
/// assert!(registry.lookup("unknown").is_none());
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Default)]
pub struct ActionRegistry {
    by_name: HashMap<String, Arc<dyn ActionHandler>>,
    handlers: Vec<Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an ordered handler list.
    #[must_use]
    pub fn from_handlers<I>(handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ActionHandler>>,
    {
        let mut registry = Self::new();
        registry.register(handlers);
        registry
    }

    /// Register handlers in iteration order.
    ///
    /// Each handler is inserted under its aliases and then its canonical
    /// path, so a handler's own path beats an alias it also declares, and a
    /// later handler overwrites any name an earlier one claimed.
    pub fn register<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = Arc<dyn ActionHandler>>,
    {
        for handler in handlers {
            for alias in handler.aliases() {
                self.insert(alias, &handler);
            }
            self.insert(handler.path(), &handler);
            if !self.handlers.iter().any(|h| Arc::ptr_eq(h, &handler)) {
                self.handlers.push(handler);
            }
        }
    }

    fn insert(&mut self, name: &str, handler: &Arc<dyn ActionHandler>) {
        if let Some(previous) = self.by_name.insert(name.to_owned(), Arc::clone(handler)) {
            if !Arc::ptr_eq(&previous, handler) {
                tracing::debug!(
                    name,
                    previous = previous.path(),
                    replacement = handler.path(),
                    "action name re-registered"
                );
            }
        }
    }

    /// Look up the handler registered under `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.by_name.get(name)
    }

    /// Whether any handler answers to `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered names, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Every registered name, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Distinct handler instances in registration order.
    pub fn handlers(&self) -> impl Iterator<Item = &Arc<dyn ActionHandler>> {
        self.handlers.iter()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("count", &self.by_name.len())
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::envelope::ResponseEnvelope;
    use crate::error::ActionError;
    use crate::session::ActionSession;

    struct Named {
        path: &'static str,
        aliases: &'static [&'static str],
        tag: &'static str,
    }

    #[async_trait]
    impl ActionHandler for Named {
        fn path(&self) -> &str {
            self.path
        }

        fn aliases(&self) -> &[&str] {
            self.aliases
        }

        async fn run(&self, session: &ActionSession) -> Result<ResponseEnvelope, ActionError> {
            Ok(session.ok_with(self.tag))
        }
    }

    fn named(
        path: &'static str,
        aliases: &'static [&'static str],
        tag: &'static str,
    ) -> Arc<dyn ActionHandler> {
        Arc::new(Named { path, aliases, tag })
    }

    #[test]
    fn empty_registry() {
        let reg = ActionRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
        assert!(reg.lookup("anything").is_none());
    }

    #[test]
    fn path_and_aliases_share_one_handler() {
        let reg = ActionRegistry::from_handlers([named(
            "get_version_info",
            &["get_version", "version"],
            "v",
        )]);

        assert_eq!(reg.len(), 3);
        let a = reg.lookup("get_version_info").unwrap();
        let b = reg.lookup("get_version").unwrap();
        let c = reg.lookup("version").unwrap();
        assert!(Arc::ptr_eq(a, b));
        assert!(Arc::ptr_eq(b, c));
        assert_eq!(reg.handlers().count(), 1);
    }

    #[test]
    fn later_registration_wins() {
        let reg = ActionRegistry::from_handlers([
            named("send_msg", &["send_message"], "first"),
            named("send_message", &[], "second"),
        ]);

        assert_eq!(reg.lookup("send_message").unwrap().path(), "send_message");
        assert_eq!(reg.lookup("send_msg").unwrap().path(), "send_msg");
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn alias_overrides_earlier_path() {
        let reg = ActionRegistry::from_handlers([
            named("a", &[], "first"),
            named("b", &["a"], "second"),
        ]);
        // "a" is claimed by the second handler's alias
        assert_eq!(reg.lookup("a").unwrap().path(), "b");
    }

    #[test]
    fn same_handler_registered_twice_is_listed_once() {
        let h = named("test", &[], "t");
        let reg = ActionRegistry::from_handlers([Arc::clone(&h), h]);
        assert_eq!(reg.handlers().count(), 1);
    }

    #[test]
    fn names_sorted() {
        let reg = ActionRegistry::from_handlers([
            named("b", &["c"], ""),
            named("a", &[], ""),
        ]);
        assert_eq!(reg.names(), vec!["a", "b", "c"]);
        assert!(reg.contains("c"));
        assert!(!reg.contains("d"));
    }

    #[test]
    fn debug_format() {
        let reg = ActionRegistry::from_handlers([named("test", &[], "")]);
        let debug = format!("{reg:?}");
        assert!(debug.contains("ActionRegistry"));
        assert!(debug.contains("count: 1"));
    }
}
