//! Primitive calls consumed from the host runtime.
//!
//! The host only understands integer identifiers, booleans and raw status
//! codes. Each entity family gets its own native trait; [`Host`] is the union
//! the handle layer is written against. Nothing here interprets a return
//! value; that is the job of [`crate::status`].

use std::rc::Rc;

use crate::types::{Animation, Colour, Dialog, SpawnInfo, Vec3};

mod simulated;

pub use simulated::{
    MotionFinished, SimObject, SimPlayer, SimTextDraw, SimulatedHost, SimulationOptions,
};

/// Host-assigned identifier; meaning depends on the entity family
pub type EntityId = i32;

pub const INVALID_PLAYER_ID: EntityId = 0xFFFF;
pub const INVALID_OBJECT_ID: EntityId = 0xFFFF;
pub const INVALID_TEXT_DRAW: EntityId = 0xFFFF;
pub const INVALID_PLAYER_TEXT_DRAW: EntityId = 0xFFFF;
pub const INVALID_VEHICLE_ID: EntityId = 0xFFFF;

/// Player slots the host can hold
pub const MAX_PLAYERS: usize = 1000;

/// Longest name the host accepts, in bytes
pub const MAX_PLAYER_NAME: usize = 24;
pub const MIN_MESSAGE_LEN: usize = 1;
pub const MAX_MESSAGE_LEN: usize = 144;
pub const IP_BUFFER_SIZE: usize = 16;
pub const IP_PORT_BUFFER_SIZE: usize = 22;
pub const VERSION_BUFFER_SIZE: usize = 24;

/// Address the host reports for a slot with nobody connected
pub const DISCONNECTED_IP: &str = "255.255.255.255";

/// Shared handle to the host runtime
pub type HostRef = Rc<dyn Host>;

/// Global world objects
pub trait ObjectNatives {
    /// Returns the new id or [`INVALID_OBJECT_ID`]
    fn create_object(&self, model: i32, position: Vec3, rotation: Vec3, draw_distance: f32) -> EntityId;
    fn destroy_object(&self, objectid: EntityId) -> bool;
    fn is_valid_object(&self, objectid: EntityId) -> bool;
    /// Starts a move and returns the estimated travel time in milliseconds
    fn move_object(&self, objectid: EntityId, target: Vec3, speed: f32, rotation: Vec3) -> i32;
    fn is_object_moving(&self, objectid: EntityId) -> bool;
    fn stop_object(&self, objectid: EntityId) -> bool;
    fn set_object_pos(&self, objectid: EntityId, position: Vec3) -> bool;
    fn set_object_rot(&self, objectid: EntityId, rotation: Vec3) -> bool;
    fn get_object_pos(&self, objectid: EntityId, position: &mut Vec3) -> bool;
    fn get_object_rot(&self, objectid: EntityId, rotation: &mut Vec3) -> bool;
    fn attach_object_to_player(
        &self,
        objectid: EntityId,
        playerid: EntityId,
        offset: Vec3,
        rotation: Vec3,
    ) -> bool;
}

/// Objects that live in one player's namespace
pub trait PlayerObjectNatives {
    fn create_player_object(
        &self,
        playerid: EntityId,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> EntityId;
    fn destroy_player_object(&self, playerid: EntityId, objectid: EntityId) -> bool;
    fn is_valid_player_object(&self, playerid: EntityId, objectid: EntityId) -> bool;
    fn move_player_object(
        &self,
        playerid: EntityId,
        objectid: EntityId,
        target: Vec3,
        speed: f32,
        rotation: Vec3,
    ) -> i32;
    fn is_player_object_moving(&self, playerid: EntityId, objectid: EntityId) -> bool;
    fn stop_player_object(&self, playerid: EntityId, objectid: EntityId) -> bool;
    fn set_player_object_pos(&self, playerid: EntityId, objectid: EntityId, position: Vec3) -> bool;
    fn set_player_object_rot(&self, playerid: EntityId, objectid: EntityId, rotation: Vec3) -> bool;
    fn get_player_object_pos(&self, playerid: EntityId, objectid: EntityId, position: &mut Vec3) -> bool;
    fn get_player_object_rot(&self, playerid: EntityId, objectid: EntityId, rotation: &mut Vec3) -> bool;
}

pub trait PlayerNatives {
    /// Writes at most `size - 1` bytes and returns the length written
    fn get_player_name(&self, playerid: EntityId, name: &mut String, size: usize) -> i32;
    /// 1 on success, 0 if the player already has the name, -1 if rejected
    fn set_player_name(&self, playerid: EntityId, name: &str) -> i32;
    fn send_client_message(&self, playerid: EntityId, colour: Colour, message: &str) -> bool;
    fn get_player_pos(&self, playerid: EntityId, position: &mut Vec3) -> bool;
    fn set_player_pos(&self, playerid: EntityId, position: Vec3) -> bool;
    fn spawn_player(&self, playerid: EntityId) -> bool;
    fn set_spawn_info(&self, playerid: EntityId, info: &SpawnInfo) -> bool;
    fn show_player_dialog(&self, playerid: EntityId, dialog: &Dialog) -> bool;
    fn get_player_facing_angle(&self, playerid: EntityId, angle: &mut f32) -> bool;
    fn give_player_money(&self, playerid: EntityId, amount: i32) -> bool;
    fn get_player_money(&self, playerid: EntityId) -> i32;
    fn reset_player_money(&self, playerid: EntityId) -> bool;
    fn is_player_admin(&self, playerid: EntityId) -> bool;
    fn get_player_state(&self, playerid: EntityId) -> i32;
    fn get_player_vehicle_id(&self, playerid: EntityId) -> EntityId;
    fn is_player_in_vehicle(&self, playerid: EntityId, vehicleid: EntityId) -> bool;
    fn is_player_in_any_vehicle(&self, playerid: EntityId) -> bool;
    fn apply_animation(&self, playerid: EntityId, animation: &Animation) -> bool;
    fn clear_animations(&self, playerid: EntityId, force_sync: bool) -> bool;
    fn set_player_special_action(&self, playerid: EntityId, action: i32) -> bool;
    fn get_player_special_action(&self, playerid: EntityId) -> i32;
    fn select_text_draw(&self, playerid: EntityId, hover_colour: Colour) -> bool;
    fn cancel_select_text_draw(&self, playerid: EntityId) -> bool;
    fn kick(&self, playerid: EntityId) -> bool;
    fn ban(&self, playerid: EntityId) -> bool;
    fn ban_ex(&self, playerid: EntityId, reason: &str) -> bool;
    fn get_player_ip(&self, playerid: EntityId, ip: &mut String, size: usize) -> i32;
    fn net_stats_get_ip_port(&self, playerid: EntityId, ip_port: &mut String, size: usize) -> i32;
    fn get_player_version(&self, playerid: EntityId, version: &mut String, size: usize) -> i32;
    fn get_player_ping(&self, playerid: EntityId) -> i32;
    fn net_stats_get_connected_time(&self, playerid: EntityId) -> i32;
}

/// Server-wide text draws
pub trait TextDrawNatives {
    /// Returns the new id or [`INVALID_TEXT_DRAW`]
    fn text_draw_create(&self, x: f32, y: f32, text: &str) -> EntityId;
    fn text_draw_destroy(&self, text: EntityId) -> bool;
    fn text_draw_set_string(&self, text: EntityId, string: &str) -> bool;
    fn text_draw_show_for_player(&self, playerid: EntityId, text: EntityId) -> bool;
    fn text_draw_show_for_all(&self, text: EntityId) -> bool;
    fn text_draw_hide_for_player(&self, playerid: EntityId, text: EntityId) -> bool;
    fn text_draw_hide_for_all(&self, text: EntityId) -> bool;
    fn text_draw_font(&self, text: EntityId, font: i32) -> bool;
    fn text_draw_use_box(&self, text: EntityId, use_box: bool) -> bool;
    fn text_draw_alignment(&self, text: EntityId, alignment: i32) -> bool;
    fn text_draw_text_size(&self, text: EntityId, x: f32, y: f32) -> bool;
    fn text_draw_color(&self, text: EntityId, colour: Colour) -> bool;
    fn text_draw_box_color(&self, text: EntityId, colour: Colour) -> bool;
    fn text_draw_background_color(&self, text: EntityId, colour: Colour) -> bool;
    fn text_draw_set_selectable(&self, text: EntityId, selectable: bool) -> bool;
    fn text_draw_set_preview_model(&self, text: EntityId, model: i32) -> bool;
    fn text_draw_set_preview_rot(&self, text: EntityId, rotation: Vec3, zoom: f32) -> bool;
    fn text_draw_set_preview_veh_col(&self, text: EntityId, colour1: i32, colour2: i32) -> bool;
}

/// Text draws that exist only on one player's screen
pub trait PlayerTextDrawNatives {
    /// Returns the new id or [`INVALID_PLAYER_TEXT_DRAW`]
    fn create_player_text_draw(&self, playerid: EntityId, x: f32, y: f32, text: &str) -> EntityId;
    fn player_text_draw_destroy(&self, playerid: EntityId, text: EntityId) -> bool;
    fn player_text_draw_set_string(&self, playerid: EntityId, text: EntityId, string: &str) -> bool;
    fn player_text_draw_show(&self, playerid: EntityId, text: EntityId) -> bool;
    fn player_text_draw_hide(&self, playerid: EntityId, text: EntityId) -> bool;
    fn player_text_draw_font(&self, playerid: EntityId, text: EntityId, font: i32) -> bool;
    fn player_text_draw_use_box(&self, playerid: EntityId, text: EntityId, use_box: bool) -> bool;
    fn player_text_draw_alignment(&self, playerid: EntityId, text: EntityId, alignment: i32) -> bool;
    fn player_text_draw_text_size(&self, playerid: EntityId, text: EntityId, x: f32, y: f32) -> bool;
    fn player_text_draw_color(&self, playerid: EntityId, text: EntityId, colour: Colour) -> bool;
    fn player_text_draw_box_color(&self, playerid: EntityId, text: EntityId, colour: Colour) -> bool;
    fn player_text_draw_background_color(&self, playerid: EntityId, text: EntityId, colour: Colour) -> bool;
    fn player_text_draw_set_selectable(&self, playerid: EntityId, text: EntityId, selectable: bool) -> bool;
    fn player_text_draw_set_preview_model(&self, playerid: EntityId, text: EntityId, model: i32) -> bool;
    fn player_text_draw_set_preview_rot(
        &self,
        playerid: EntityId,
        text: EntityId,
        rotation: Vec3,
        zoom: f32,
    ) -> bool;
    fn player_text_draw_set_preview_veh_col(
        &self,
        playerid: EntityId,
        text: EntityId,
        colour1: i32,
        colour2: i32,
    ) -> bool;
}

pub trait ConsoleNatives {
    fn logprintf(&self, message: &str);
}

/// Everything the handle layer needs from the host
pub trait Host:
    ObjectNatives
    + PlayerObjectNatives
    + PlayerNatives
    + TextDrawNatives
    + PlayerTextDrawNatives
    + ConsoleNatives
{
}

impl<T> Host for T where
    T: ObjectNatives
        + PlayerObjectNatives
        + PlayerNatives
        + TextDrawNatives
        + PlayerTextDrawNatives
        + ConsoleNatives
{
}
