//! Typed, object-style handles over a multiplayer game server's flat
//! native API.
//!
//! The host identifies players, objects and text draws by integer ids and
//! reports failure through booleans, status codes and sentinel values. This
//! crate wraps each id in a handle whose methods return [`Result`], and
//! routes named host callbacks to registered handlers through [`events`].

pub mod capability;
pub mod config;
mod error;
pub mod events;
pub mod host;
pub mod logging;
mod object;
mod player;
pub mod scope;
mod server;
pub mod status;
mod textdraw;
pub mod types;
mod vehicle;

pub use capability::{Broadcast, Entity, Movable, PlayerOwned, TextOverlay};
pub use config::{ConfigLoadError, SampkitConfig};
pub use error::{ConstraintViolation, EntityKind, Error, Result};
pub use host::{EntityId, Host, HostRef};
pub use object::{GlobalObject, Object, PlayerObject};
pub use player::Player;
pub use server::Server;
pub use status::Motion;
pub use textdraw::{GlobalTextDraw, PlayerTextDraw, TextDraw};
pub use types::{
    Animation, AnimationFlags, Colour, DanceStyle, Dialog, DialogStyle, Font, PlayerState, SpawnInfo,
    SpecialAction, TextAlignment, Vec3, WeaponSlot,
};
pub use vehicle::Vehicle;

pub use sampkit_events::{event_args, EventArg, EventArgs, KnownEvent};
