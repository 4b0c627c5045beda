use std::fmt;

use tracing::debug;

use crate::capability::{Broadcast, Entity, PlayerOwned, TextOverlay};
use crate::error::Result;
use crate::host::{EntityId, HostRef};
use crate::player::Player;
use crate::scope::{Global, PerPlayer, TextDrawScope};
use crate::status;
use crate::types::{Colour, Font, TextAlignment, Vec3};

/// On-screen text in the namespace chosen by `S`.
///
/// The handle remembers the alignment it last set because the host reads
/// the size arguments differently for centred text.
pub struct TextDraw<S: TextDrawScope> {
    id: EntityId,
    scope: S,
    alignment: TextAlignment,
}

pub type GlobalTextDraw = TextDraw<Global>;
pub type PlayerTextDraw<'p> = TextDraw<PerPlayer<'p>>;

impl<S: TextDrawScope> TextDraw<S> {
    pub fn create_in(scope: S, x: f32, y: f32, text: &str) -> Result<Self> {
        let id = status::created(scope.create(x, y, text), S::INVALID, S::KIND)?;
        debug!(target: "sampkit", "Created {} {} at ({}, {})", S::KIND, id, x, y);
        Ok(Self::bind(scope, id))
    }

    /// Wrap an identifier the host handed out earlier. The alignment is
    /// assumed to be the host default.
    pub fn bind(scope: S, id: EntityId) -> Self {
        Self {
            id,
            scope,
            alignment: TextAlignment::default(),
        }
    }

    fn check(&self, ok: bool) -> Result<()> {
        status::ensure(ok, S::KIND, self.id)
    }
}

impl GlobalTextDraw {
    pub fn create(host: &HostRef, x: f32, y: f32, text: &str) -> Result<Self> {
        Self::create_in(Global::new(host.clone()), x, y, text)
    }

    pub fn from_id(host: &HostRef, id: EntityId) -> Self {
        Self::bind(Global::new(host.clone()), id)
    }
}

impl<'p> PlayerTextDraw<'p> {
    pub fn create(owner: &'p Player, x: f32, y: f32, text: &str) -> Result<Self> {
        Self::create_in(PerPlayer::new(owner), x, y, text)
    }

    pub fn from_id(owner: &'p Player, id: EntityId) -> Self {
        Self::bind(PerPlayer::new(owner), id)
    }

    /// Show on the owner's screen
    pub fn show(&self) -> Result<()> {
        let owner = self.scope.owner();
        self.check(owner.host().player_text_draw_show(owner.id(), self.id))
    }

    pub fn hide(&self) -> Result<()> {
        let owner = self.scope.owner();
        self.check(owner.host().player_text_draw_hide(owner.id(), self.id))
    }
}

impl<S: TextDrawScope> Entity for TextDraw<S> {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl<S: TextDrawScope> TextOverlay for TextDraw<S> {
    fn destroy(&self) -> Result<()> {
        self.check(self.scope.destroy(self.id))?;
        debug!(target: "sampkit", "Destroyed {} {}", S::KIND, self.id);
        Ok(())
    }

    fn set_string(&self, text: &str) -> Result<()> {
        self.check(self.scope.set_string(self.id, text))
    }

    fn set_font(&self, font: Font) -> Result<()> {
        self.check(self.scope.font(self.id, font.code()))
    }

    fn use_box(&self, enabled: bool) -> Result<()> {
        self.check(self.scope.use_box(self.id, enabled))
    }

    fn set_alignment(&mut self, alignment: TextAlignment) -> Result<()> {
        self.alignment = alignment;
        self.check(self.scope.alignment(self.id, alignment.code()))
    }

    fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    fn set_text_size(&self, x: f32, y: f32) -> Result<()> {
        let (x, y) = match self.alignment {
            TextAlignment::Center => (y, x),
            TextAlignment::Left | TextAlignment::Right => (x, y),
        };
        self.check(self.scope.text_size(self.id, x, y))
    }

    fn set_colour(&self, colour: Colour) -> Result<()> {
        self.check(self.scope.colour(self.id, colour))
    }

    fn set_box_colour(&self, colour: Colour) -> Result<()> {
        self.check(self.scope.box_colour(self.id, colour))
    }

    fn set_background_colour(&self, colour: Colour) -> Result<()> {
        self.check(self.scope.background_colour(self.id, colour))
    }

    fn set_selectable(&self, selectable: bool) -> Result<()> {
        self.check(self.scope.selectable(self.id, selectable))
    }

    fn set_preview_model(&self, model: i32) -> Result<()> {
        self.check(self.scope.preview_model(self.id, model))
    }

    fn set_preview_rotation(&self, rotation: Vec3, zoom: f32) -> Result<()> {
        self.check(self.scope.preview_rotation(self.id, rotation, zoom))
    }

    fn set_preview_vehicle_colours(&self, colour1: i32, colour2: i32) -> Result<()> {
        self.check(self.scope.preview_vehicle_colours(self.id, colour1, colour2))
    }
}

impl Broadcast for GlobalTextDraw {
    fn show_for_player(&self, player: &Player) -> Result<()> {
        let ok = self.scope.host().text_draw_show_for_player(player.id(), self.id);
        self.check(ok)
    }

    fn hide_for_player(&self, player: &Player) -> Result<()> {
        let ok = self.scope.host().text_draw_hide_for_player(player.id(), self.id);
        self.check(ok)
    }

    fn show_for_all(&self) -> Result<()> {
        self.check(self.scope.host().text_draw_show_for_all(self.id))
    }

    fn hide_for_all(&self) -> Result<()> {
        self.check(self.scope.host().text_draw_hide_for_all(self.id))
    }
}

impl PlayerOwned for PlayerTextDraw<'_> {
    fn owner(&self) -> &Player {
        self.scope.owner()
    }
}

impl<S: TextDrawScope + fmt::Debug> fmt::Debug for TextDraw<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDraw")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .field("alignment", &self.alignment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::error::{EntityKind, Error};
    use crate::host::SimulatedHost;

    #[test]
    fn test_text_size_passes_through_for_left_and_right() {
        let sim = Rc::new(SimulatedHost::new());
        let host: HostRef = sim.clone();
        let mut td = GlobalTextDraw::create(&host, 320.0, 240.0, "hello").unwrap();

        td.set_text_size(10.0, 20.0).unwrap();
        assert_eq!(sim.text_draw(td.id()).unwrap().size, (10.0, 20.0));

        td.set_alignment(TextAlignment::Right).unwrap();
        td.set_text_size(10.0, 20.0).unwrap();
        assert_eq!(sim.text_draw(td.id()).unwrap().size, (10.0, 20.0));
    }

    #[test]
    fn test_alignment_cached_even_when_host_rejects() {
        let sim = Rc::new(SimulatedHost::new());
        let host: HostRef = sim.clone();
        let mut td = GlobalTextDraw::create(&host, 0.0, 0.0, "x").unwrap();

        sim.fail_next("TextDrawAlignment");
        assert!(td.set_alignment(TextAlignment::Center).is_err());
        assert_eq!(td.alignment(), TextAlignment::Center);

        td.set_text_size(10.0, 20.0).unwrap();
        assert_eq!(sim.text_draw(td.id()).unwrap().size, (20.0, 10.0));
    }

    #[test]
    fn test_colour_aliases_forward() {
        let sim = Rc::new(SimulatedHost::new());
        let host: HostRef = sim.clone();
        let td = GlobalTextDraw::create(&host, 0.0, 0.0, "x").unwrap();

        td.set_color(0xFF00_00FF).unwrap();
        td.set_box_color(0x00FF_00FF).unwrap();
        td.set_background_color(0x0000_FFFF).unwrap();
        let state = sim.text_draw(td.id()).unwrap();
        assert_eq!(state.colour, 0xFF00_00FF);
        assert_eq!(state.box_colour, 0x00FF_00FF);
        assert_eq!(state.background_colour, 0x0000_FFFF);
    }

    #[test]
    fn test_broadcast_and_destroy() {
        let sim = Rc::new(SimulatedHost::new());
        let host: HostRef = sim.clone();
        let alice = Player::new(host.clone(), sim.connect_player("Alice", "127.0.0.1"));
        let td = GlobalTextDraw::create(&host, 0.0, 0.0, "x").unwrap();

        td.show_for_player(&alice).unwrap();
        assert!(sim.text_draw(td.id()).unwrap().shown_for.contains(&alice.id()));
        td.hide_for_all().unwrap();
        assert!(sim.text_draw(td.id()).unwrap().shown_for.is_empty());

        td.destroy().unwrap();
        assert_eq!(
            td.set_string("gone"),
            Err(Error::invalid(EntityKind::TextDraw, td.id()))
        );
    }

    #[test]
    fn test_player_text_draw_show_hide() {
        let sim = Rc::new(SimulatedHost::new());
        let host: HostRef = sim.clone();
        let alice = Player::new(host.clone(), sim.connect_player("Alice", "127.0.0.1"));
        let td = alice.create_text_draw(10.0, 10.0, "score").unwrap();

        td.show().unwrap();
        assert!(sim
            .player_text_draw(alice.id(), td.id())
            .unwrap()
            .shown_for
            .contains(&alice.id()));
        td.hide().unwrap();
        assert_eq!(td.owner().id(), alice.id());
    }
}
