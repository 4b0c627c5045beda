//! Which host namespace a handle's identifier lives in.
//!
//! Objects and text draws come in a server-wide flavour and a per-player
//! flavour that take the same arguments plus the owning player's id. A scope
//! value picks the matching native for each operation so the handle types
//! can be written once.

use std::fmt;

use crate::capability::Entity;
use crate::error::EntityKind;
use crate::host::{
    EntityId, HostRef, INVALID_OBJECT_ID, INVALID_PLAYER_TEXT_DRAW, INVALID_TEXT_DRAW,
};
use crate::player::Player;
use crate::types::{Colour, Vec3};

/// Server-wide namespace
#[derive(Clone)]
pub struct Global {
    host: HostRef,
}

impl Global {
    pub fn new(host: HostRef) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostRef {
        &self.host
    }
}

impl fmt::Debug for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Global")
    }
}

/// One player's namespace. The owner's id is read on every call.
#[derive(Debug, Clone, Copy)]
pub struct PerPlayer<'p> {
    owner: &'p Player,
}

impl<'p> PerPlayer<'p> {
    pub fn new(owner: &'p Player) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &'p Player {
        self.owner
    }

    fn playerid(&self) -> EntityId {
        self.owner.id()
    }
}

/// Object natives for one namespace
pub trait ObjectScope {
    const KIND: EntityKind;
    const INVALID: EntityId;

    fn create(&self, model: i32, position: Vec3, rotation: Vec3, draw_distance: f32) -> EntityId;
    fn destroy(&self, id: EntityId) -> bool;
    fn is_valid(&self, id: EntityId) -> bool;
    fn move_to(&self, id: EntityId, target: Vec3, speed: f32, rotation: Vec3) -> i32;
    fn is_moving(&self, id: EntityId) -> bool;
    fn stop(&self, id: EntityId) -> bool;
    fn set_pos(&self, id: EntityId, position: Vec3) -> bool;
    fn set_rot(&self, id: EntityId, rotation: Vec3) -> bool;
    fn get_pos(&self, id: EntityId, position: &mut Vec3) -> bool;
    fn get_rot(&self, id: EntityId, rotation: &mut Vec3) -> bool;
}

impl ObjectScope for Global {
    const KIND: EntityKind = EntityKind::Object;
    const INVALID: EntityId = INVALID_OBJECT_ID;

    fn create(&self, model: i32, position: Vec3, rotation: Vec3, draw_distance: f32) -> EntityId {
        self.host.create_object(model, position, rotation, draw_distance)
    }

    fn destroy(&self, id: EntityId) -> bool {
        self.host.destroy_object(id)
    }

    fn is_valid(&self, id: EntityId) -> bool {
        self.host.is_valid_object(id)
    }

    fn move_to(&self, id: EntityId, target: Vec3, speed: f32, rotation: Vec3) -> i32 {
        self.host.move_object(id, target, speed, rotation)
    }

    fn is_moving(&self, id: EntityId) -> bool {
        self.host.is_object_moving(id)
    }

    fn stop(&self, id: EntityId) -> bool {
        self.host.stop_object(id)
    }

    fn set_pos(&self, id: EntityId, position: Vec3) -> bool {
        self.host.set_object_pos(id, position)
    }

    fn set_rot(&self, id: EntityId, rotation: Vec3) -> bool {
        self.host.set_object_rot(id, rotation)
    }

    fn get_pos(&self, id: EntityId, position: &mut Vec3) -> bool {
        self.host.get_object_pos(id, position)
    }

    fn get_rot(&self, id: EntityId, rotation: &mut Vec3) -> bool {
        self.host.get_object_rot(id, rotation)
    }
}

impl ObjectScope for PerPlayer<'_> {
    const KIND: EntityKind = EntityKind::PlayerObject;
    const INVALID: EntityId = INVALID_OBJECT_ID;

    fn create(&self, model: i32, position: Vec3, rotation: Vec3, draw_distance: f32) -> EntityId {
        self.owner
            .host()
            .create_player_object(self.playerid(), model, position, rotation, draw_distance)
    }

    fn destroy(&self, id: EntityId) -> bool {
        self.owner.host().destroy_player_object(self.playerid(), id)
    }

    fn is_valid(&self, id: EntityId) -> bool {
        self.owner.host().is_valid_player_object(self.playerid(), id)
    }

    fn move_to(&self, id: EntityId, target: Vec3, speed: f32, rotation: Vec3) -> i32 {
        self.owner
            .host()
            .move_player_object(self.playerid(), id, target, speed, rotation)
    }

    fn is_moving(&self, id: EntityId) -> bool {
        self.owner.host().is_player_object_moving(self.playerid(), id)
    }

    fn stop(&self, id: EntityId) -> bool {
        self.owner.host().stop_player_object(self.playerid(), id)
    }

    fn set_pos(&self, id: EntityId, position: Vec3) -> bool {
        self.owner
            .host()
            .set_player_object_pos(self.playerid(), id, position)
    }

    fn set_rot(&self, id: EntityId, rotation: Vec3) -> bool {
        self.owner
            .host()
            .set_player_object_rot(self.playerid(), id, rotation)
    }

    fn get_pos(&self, id: EntityId, position: &mut Vec3) -> bool {
        self.owner
            .host()
            .get_player_object_pos(self.playerid(), id, position)
    }

    fn get_rot(&self, id: EntityId, rotation: &mut Vec3) -> bool {
        self.owner
            .host()
            .get_player_object_rot(self.playerid(), id, rotation)
    }
}

/// Text draw natives for one namespace
pub trait TextDrawScope {
    const KIND: EntityKind;
    const INVALID: EntityId;

    fn create(&self, x: f32, y: f32, text: &str) -> EntityId;
    fn destroy(&self, id: EntityId) -> bool;
    fn set_string(&self, id: EntityId, text: &str) -> bool;
    fn font(&self, id: EntityId, font: i32) -> bool;
    fn use_box(&self, id: EntityId, enabled: bool) -> bool;
    fn alignment(&self, id: EntityId, alignment: i32) -> bool;
    fn text_size(&self, id: EntityId, x: f32, y: f32) -> bool;
    fn colour(&self, id: EntityId, colour: Colour) -> bool;
    fn box_colour(&self, id: EntityId, colour: Colour) -> bool;
    fn background_colour(&self, id: EntityId, colour: Colour) -> bool;
    fn selectable(&self, id: EntityId, selectable: bool) -> bool;
    fn preview_model(&self, id: EntityId, model: i32) -> bool;
    fn preview_rotation(&self, id: EntityId, rotation: Vec3, zoom: f32) -> bool;
    fn preview_vehicle_colours(&self, id: EntityId, colour1: i32, colour2: i32) -> bool;
}

impl TextDrawScope for Global {
    const KIND: EntityKind = EntityKind::TextDraw;
    const INVALID: EntityId = INVALID_TEXT_DRAW;

    fn create(&self, x: f32, y: f32, text: &str) -> EntityId {
        self.host.text_draw_create(x, y, text)
    }

    fn destroy(&self, id: EntityId) -> bool {
        self.host.text_draw_destroy(id)
    }

    fn set_string(&self, id: EntityId, text: &str) -> bool {
        self.host.text_draw_set_string(id, text)
    }

    fn font(&self, id: EntityId, font: i32) -> bool {
        self.host.text_draw_font(id, font)
    }

    fn use_box(&self, id: EntityId, enabled: bool) -> bool {
        self.host.text_draw_use_box(id, enabled)
    }

    fn alignment(&self, id: EntityId, alignment: i32) -> bool {
        self.host.text_draw_alignment(id, alignment)
    }

    fn text_size(&self, id: EntityId, x: f32, y: f32) -> bool {
        self.host.text_draw_text_size(id, x, y)
    }

    fn colour(&self, id: EntityId, colour: Colour) -> bool {
        self.host.text_draw_color(id, colour)
    }

    fn box_colour(&self, id: EntityId, colour: Colour) -> bool {
        self.host.text_draw_box_color(id, colour)
    }

    fn background_colour(&self, id: EntityId, colour: Colour) -> bool {
        self.host.text_draw_background_color(id, colour)
    }

    fn selectable(&self, id: EntityId, selectable: bool) -> bool {
        self.host.text_draw_set_selectable(id, selectable)
    }

    fn preview_model(&self, id: EntityId, model: i32) -> bool {
        self.host.text_draw_set_preview_model(id, model)
    }

    fn preview_rotation(&self, id: EntityId, rotation: Vec3, zoom: f32) -> bool {
        self.host.text_draw_set_preview_rot(id, rotation, zoom)
    }

    fn preview_vehicle_colours(&self, id: EntityId, colour1: i32, colour2: i32) -> bool {
        self.host.text_draw_set_preview_veh_col(id, colour1, colour2)
    }
}

impl TextDrawScope for PerPlayer<'_> {
    const KIND: EntityKind = EntityKind::PlayerTextDraw;
    const INVALID: EntityId = INVALID_PLAYER_TEXT_DRAW;

    fn create(&self, x: f32, y: f32, text: &str) -> EntityId {
        self.owner
            .host()
            .create_player_text_draw(self.playerid(), x, y, text)
    }

    fn destroy(&self, id: EntityId) -> bool {
        self.owner.host().player_text_draw_destroy(self.playerid(), id)
    }

    fn set_string(&self, id: EntityId, text: &str) -> bool {
        self.owner
            .host()
            .player_text_draw_set_string(self.playerid(), id, text)
    }

    fn font(&self, id: EntityId, font: i32) -> bool {
        self.owner.host().player_text_draw_font(self.playerid(), id, font)
    }

    fn use_box(&self, id: EntityId, enabled: bool) -> bool {
        self.owner
            .host()
            .player_text_draw_use_box(self.playerid(), id, enabled)
    }

    fn alignment(&self, id: EntityId, alignment: i32) -> bool {
        self.owner
            .host()
            .player_text_draw_alignment(self.playerid(), id, alignment)
    }

    fn text_size(&self, id: EntityId, x: f32, y: f32) -> bool {
        self.owner
            .host()
            .player_text_draw_text_size(self.playerid(), id, x, y)
    }

    fn colour(&self, id: EntityId, colour: Colour) -> bool {
        self.owner
            .host()
            .player_text_draw_color(self.playerid(), id, colour)
    }

    fn box_colour(&self, id: EntityId, colour: Colour) -> bool {
        self.owner
            .host()
            .player_text_draw_box_color(self.playerid(), id, colour)
    }

    fn background_colour(&self, id: EntityId, colour: Colour) -> bool {
        self.owner
            .host()
            .player_text_draw_background_color(self.playerid(), id, colour)
    }

    fn selectable(&self, id: EntityId, selectable: bool) -> bool {
        self.owner
            .host()
            .player_text_draw_set_selectable(self.playerid(), id, selectable)
    }

    fn preview_model(&self, id: EntityId, model: i32) -> bool {
        self.owner
            .host()
            .player_text_draw_set_preview_model(self.playerid(), id, model)
    }

    fn preview_rotation(&self, id: EntityId, rotation: Vec3, zoom: f32) -> bool {
        self.owner
            .host()
            .player_text_draw_set_preview_rot(self.playerid(), id, rotation, zoom)
    }

    fn preview_vehicle_colours(&self, id: EntityId, colour1: i32, colour2: i32) -> bool {
        self.owner
            .host()
            .player_text_draw_set_preview_veh_col(self.playerid(), id, colour1, colour2)
    }
}
