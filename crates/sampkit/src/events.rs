//! Process-wide event table.
//!
//! Script code binds handlers once, typically while the gamemode loads, and
//! the host glue calls [`dispatch`] whenever the server fires a callback.
//!
//! ```no_run
//! use sampkit::{events, Server};
//!
//! events::on("OnPlayerConnect", |server: &Server, args| {
//!     let Some(playerid) = args.int(0) else { return false };
//!     let _ = server.player(playerid).send_message(0xFFFF_FFFF, "Welcome!");
//!     true
//! })
//! .unwrap();
//! ```

use std::sync::LazyLock;

use sampkit_events::{EventArgs, EventRegistry};

use crate::error::Result;
use crate::server::Server;

static REGISTRY: LazyLock<EventRegistry<Server>> = LazyLock::new(EventRegistry::new);

/// Bind `handler` to the callback `name` for the rest of the process.
///
/// A second binding for the same name fails with
/// [`Error::DuplicateRegistration`](crate::Error::DuplicateRegistration).
pub fn on<F>(name: &str, handler: F) -> Result<()>
where
    F: Fn(&Server, &EventArgs) -> bool + Send + Sync + 'static,
{
    REGISTRY.register(name, handler)?;
    Ok(())
}

/// Run the handler bound to `name`, if any, and return what it returned
pub fn dispatch(server: &Server, name: &str, args: &EventArgs) -> Option<bool> {
    REGISTRY.dispatch(server, name, args)
}

pub fn is_registered(name: &str) -> bool {
    REGISTRY.is_registered(name)
}

/// Names with a handler, sorted
pub fn registered() -> Vec<String> {
    REGISTRY.names()
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use sampkit_events::event_args;

    use super::*;
    use crate::error::Error;
    use crate::host::SimulatedHost;

    // The table is shared by every test in this binary, so each test uses
    // its own event names.

    #[test]
    fn test_duplicate_registration_fails() {
        assert!(on("OnTestDuplicate", |_, _| true).is_ok());
        assert_eq!(
            on("OnTestDuplicate", |_, _| false),
            Err(Error::DuplicateRegistration("OnTestDuplicate".into()))
        );
    }

    #[test]
    fn test_dispatch_passes_server_and_args() {
        on("OnTestEcho", |server, args| {
            server.print(&format!("echo {}", args.text(0).unwrap_or_default()));
            true
        })
        .unwrap();

        let sim = Rc::new(SimulatedHost::new());
        let server = Server::new(sim.clone());
        assert_eq!(
            dispatch(&server, "OnTestEcho", &event_args!["hi"]),
            Some(true)
        );
        assert_eq!(sim.console(), vec!["echo hi".to_string()]);
    }

    #[test]
    fn test_unbound_dispatch_is_noop() {
        let sim = Rc::new(SimulatedHost::new());
        let server = Server::new(sim.clone());
        assert_eq!(dispatch(&server, "OnTestNobody", &EventArgs::new()), None);
        assert!(sim.calls().is_empty());
        assert!(!is_registered("OnTestNobody"));
    }
}
