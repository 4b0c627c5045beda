//! Named host callback registry for sampkit
//!
//! The host runtime fires callbacks by name (`OnPlayerConnect`,
//! `OnDialogResponse`, ...) with a handful of positional arguments. This crate
//! holds the table that maps each name to the single handler script code
//! attached to it. It knows nothing about players or objects; the embedding
//! crate picks the context type handed to handlers.

mod args;
mod known;
mod registry;

pub use args::{EventArg, EventArgs};
pub use known::KnownEvent;
pub use registry::{EventRegistry, Handler, RegistryError};
