use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, trace};

use crate::args::EventArgs;
use crate::known::KnownEvent;

/// Callback bound to an event name.
///
/// Receives the dispatch context (whatever the embedding layer hands the
/// registry, usually a server handle) and the host-supplied arguments. The
/// return value is passed back to the host untouched.
pub type Handler<C> = Arc<dyn Fn(&C, &EventArgs) -> bool + Send + Sync>;

/// Error during handler registration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("a handler for {0} is already registered")]
    Duplicate(String),
}

/// Table from event name to exactly one handler.
///
/// Handlers are only ever added. Lookups take a read lock and clone the
/// handler out before calling it, so a handler may itself register further
/// events without deadlocking.
pub struct EventRegistry<C: ?Sized> {
    handlers: RwLock<HashMap<String, Handler<C>>>,
}

impl<C: ?Sized> EventRegistry<C> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Bind `name` to `handler`.
    ///
    /// Fails with [`RegistryError::Duplicate`] if the name is already bound;
    /// the existing handler stays in place.
    pub fn register<F>(&self, name: impl Into<String>, handler: F) -> Result<(), RegistryError>
    where
        F: Fn(&C, &EventArgs) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if handlers.contains_key(&name) {
            debug!(target: "events", "Rejected second handler for {}", name);
            return Err(RegistryError::Duplicate(name));
        }

        if KnownEvent::from_name(&name).is_none() {
            debug!(target: "events", "{} is not a known host callback", name);
        }

        info!(target: "events", "Registered {} event", name);
        handlers.insert(name, Arc::new(handler));
        Ok(())
    }

    /// Invoke the handler bound to `name`.
    ///
    /// Returns `None` when nothing is bound; the host treats that the same as
    /// an event nobody subscribed to.
    pub fn dispatch(&self, ctx: &C, name: &str, args: &EventArgs) -> Option<bool> {
        let handler = self.handler(name);
        match handler {
            Some(handler) => {
                trace!(target: "events", "Dispatching {}{}", name, args);
                Some(handler(ctx, args))
            }
            None => {
                trace!(target: "events", "No handler for {}", name);
                None
            }
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn handler(&self, name: &str) -> Option<Handler<C>> {
        self.read().get(name).cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Handler<C>>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: ?Sized> Default for EventRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> fmt::Debug for EventRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("events", &self.names())
            .finish()
    }
}
