//! What each kind of handle can do.
//!
//! Handles implement the traits that match their family instead of
//! inheriting from a common base:
//!
//! | handle                 | traits                                   |
//! |------------------------|------------------------------------------|
//! | [`GlobalObject`]       | [`Movable`]                              |
//! | [`PlayerObject`]       | [`Movable`] + [`PlayerOwned`]            |
//! | [`GlobalTextDraw`]     | [`TextOverlay`] + [`Broadcast`]          |
//! | [`PlayerTextDraw`]     | [`TextOverlay`] + [`PlayerOwned`]        |
//! | [`Player`], [`Vehicle`]| [`Entity`]                               |
//!
//! [`GlobalObject`]: crate::GlobalObject
//! [`PlayerObject`]: crate::PlayerObject
//! [`GlobalTextDraw`]: crate::GlobalTextDraw
//! [`PlayerTextDraw`]: crate::PlayerTextDraw
//! [`Vehicle`]: crate::Vehicle

use crate::error::Result;
use crate::host::EntityId;
use crate::player::Player;
use crate::status::Motion;
use crate::types::{Colour, Font, TextAlignment, Vec3};

/// Anything the host refers to by an identifier
pub trait Entity {
    fn id(&self) -> EntityId;
}

/// A world entity that can be placed, rotated and moved
pub trait Movable: Entity {
    fn position(&self) -> Result<Vec3>;
    fn set_position(&self, position: Vec3) -> Result<()>;
    fn rotation(&self) -> Result<Vec3>;
    fn set_rotation(&self, rotation: Vec3) -> Result<()>;

    /// Start moving towards `target` at `speed` units per second.
    ///
    /// The returned ETA is an upper bound; arrival is reported by the host
    /// through the `On*ObjectMoved` callbacks.
    fn move_to(&self, target: Vec3, speed: f32, rotation: Vec3) -> Motion;

    /// Asks the host every time
    fn is_moving(&self) -> bool;

    /// Stop any movement in progress. Harmless on a stationary entity.
    fn stop(&self);

    fn destroy(&self) -> Result<()>;

    /// Asks the host every time
    fn is_valid(&self) -> bool;
}

/// Entities living in one player's namespace
pub trait PlayerOwned {
    fn owner(&self) -> &Player;
}

/// On-screen text overlay
pub trait TextOverlay: Entity {
    fn destroy(&self) -> Result<()>;
    fn set_string(&self, text: &str) -> Result<()>;
    fn set_font(&self, font: Font) -> Result<()>;
    fn use_box(&self, enabled: bool) -> Result<()>;
    /// Caches `alignment` whether or not the host accepts it
    fn set_alignment(&mut self, alignment: TextAlignment) -> Result<()>;
    /// Last alignment requested through this handle; not read back from the host
    fn alignment(&self) -> TextAlignment;

    /// Set the text area size. With centred text the host reads the two
    /// components swapped, so they are passed through as `(y, x)`.
    fn set_text_size(&self, x: f32, y: f32) -> Result<()>;

    fn set_colour(&self, colour: Colour) -> Result<()>;
    fn set_box_colour(&self, colour: Colour) -> Result<()>;
    fn set_background_colour(&self, colour: Colour) -> Result<()>;
    fn set_selectable(&self, selectable: bool) -> Result<()>;

    /// Only visible with [`Font::ModelPreview`]
    fn set_preview_model(&self, model: i32) -> Result<()>;
    fn set_preview_rotation(&self, rotation: Vec3, zoom: f32) -> Result<()>;
    fn set_preview_vehicle_colours(&self, colour1: i32, colour2: i32) -> Result<()>;

    fn set_color(&self, colour: Colour) -> Result<()> {
        self.set_colour(colour)
    }

    fn set_box_color(&self, colour: Colour) -> Result<()> {
        self.set_box_colour(colour)
    }

    fn set_background_color(&self, colour: Colour) -> Result<()> {
        self.set_background_colour(colour)
    }
}

/// Overlays any player can be shown
pub trait Broadcast: Entity {
    fn show_for_player(&self, player: &Player) -> Result<()>;
    fn hide_for_player(&self, player: &Player) -> Result<()>;
    fn show_for_all(&self) -> Result<()>;
    fn hide_for_all(&self) -> Result<()>;
}
