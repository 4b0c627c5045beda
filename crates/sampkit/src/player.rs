use std::fmt;
use std::time::Duration;

use tracing::info;

use crate::capability::Entity;
use crate::error::{ConstraintViolation, EntityKind, Error, Result};
use crate::host::{
    EntityId, HostRef, INVALID_VEHICLE_ID, IP_BUFFER_SIZE, IP_PORT_BUFFER_SIZE, MAX_MESSAGE_LEN,
    MAX_PLAYER_NAME, MIN_MESSAGE_LEN, VERSION_BUFFER_SIZE,
};
use crate::object::{GlobalObject, PlayerObject};
use crate::status;
use crate::textdraw::PlayerTextDraw;
use crate::types::{Animation, Colour, Dialog, PlayerState, SpawnInfo, SpecialAction, Vec3};
use crate::vehicle::Vehicle;

/// A connected player slot.
///
/// The handle is just the slot id plus a host reference; nothing about the
/// player is cached, so every getter reflects the host's current state and
/// fails with [`Error::InvalidEntity`] once the slot is empty.
#[derive(Clone)]
pub struct Player {
    host: HostRef,
    id: EntityId,
}

impl Player {
    pub fn new(host: HostRef, id: EntityId) -> Self {
        Self { host, id }
    }

    pub fn host(&self) -> &HostRef {
        &self.host
    }

    fn check(&self, ok: bool) -> Result<()> {
        status::ensure(ok, EntityKind::Player, self.id)
    }

    fn read(&self, size: usize, native: impl FnOnce(&mut String, usize) -> i32) -> Result<String> {
        let mut buffer = String::with_capacity(size);
        let written = native(&mut buffer, size);
        status::read_string(written, buffer, EntityKind::Player, self.id)
    }

    // ===== Identity =====

    pub fn name(&self) -> Result<String> {
        self.read(MAX_PLAYER_NAME + 1, |buf, size| {
            self.host.get_player_name(self.id, buf, size)
        })
    }

    /// Rename the player. Names longer than [`MAX_PLAYER_NAME`] bytes are
    /// refused without asking the host.
    pub fn set_name(&self, name: &str) -> Result<()> {
        if name.len() > MAX_PLAYER_NAME {
            return Err(ConstraintViolation::NameTooLong {
                len: name.len(),
                max: MAX_PLAYER_NAME,
            }
            .into());
        }
        status::name_change(self.host.set_player_name(self.id, name))
    }

    pub fn is_admin(&self) -> bool {
        self.host.is_player_admin(self.id)
    }

    pub fn ip(&self) -> Result<String> {
        let mut ip = String::with_capacity(IP_BUFFER_SIZE);
        self.host.get_player_ip(self.id, &mut ip, IP_BUFFER_SIZE);
        status::read_ip(ip, self.id)
    }

    /// Address and port as `a.b.c.d:port`
    pub fn ip_port(&self) -> Result<String> {
        self.read(IP_PORT_BUFFER_SIZE, |buf, size| {
            self.host.net_stats_get_ip_port(self.id, buf, size)
        })
    }

    /// Client version string, e.g. `0.3.7-R2`
    pub fn version(&self) -> Result<String> {
        self.read(VERSION_BUFFER_SIZE, |buf, size| {
            self.host.get_player_version(self.id, buf, size)
        })
    }

    pub fn ping(&self) -> Result<Duration> {
        status::ping(self.host.get_player_ping(self.id), self.id)
    }

    /// Time since the player connected
    pub fn connected_time(&self) -> Result<Duration> {
        status::connected_time(self.host.net_stats_get_connected_time(self.id), self.id)
    }

    // ===== Chat and UI =====

    pub fn send_message(&self, colour: Colour, message: &str) -> Result<()> {
        let len = message.len();
        if len < MIN_MESSAGE_LEN {
            return Err(ConstraintViolation::MessageEmpty.into());
        }
        if len > MAX_MESSAGE_LEN {
            return Err(ConstraintViolation::MessageTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            }
            .into());
        }
        self.check(self.host.send_client_message(self.id, colour, message))
    }

    pub fn show_dialog(&self, dialog: &Dialog) -> Result<()> {
        status::ensure_op(self.host.show_player_dialog(self.id, dialog), "ShowPlayerDialog")
    }

    /// Let the player click text draws, highlighting them in `hover_colour`
    pub fn select_text_draw(&self, hover_colour: Colour) -> Result<()> {
        self.check(self.host.select_text_draw(self.id, hover_colour))
    }

    pub fn cancel_select_text_draw(&self) -> Result<()> {
        self.check(self.host.cancel_select_text_draw(self.id))
    }

    // ===== Placement =====

    pub fn position(&self) -> Result<Vec3> {
        let mut position = Vec3::default();
        self.check(self.host.get_player_pos(self.id, &mut position))?;
        Ok(position)
    }

    pub fn set_position(&self, position: Vec3) -> Result<()> {
        self.check(self.host.set_player_pos(self.id, position))
    }

    pub fn facing_angle(&self) -> Result<f32> {
        let mut angle = 0.0;
        self.check(self.host.get_player_facing_angle(self.id, &mut angle))?;
        Ok(angle)
    }

    pub fn set_spawn_info(&self, info: &SpawnInfo) -> Result<()> {
        self.check(self.host.set_spawn_info(self.id, info))
    }

    pub fn spawn(&self) -> Result<()> {
        status::ensure_op(self.host.spawn_player(self.id), "SpawnPlayer")
    }

    pub fn state(&self) -> PlayerState {
        PlayerState::from_code(self.host.get_player_state(self.id))
    }

    // ===== Money =====

    pub fn give_money(&self, amount: i32) -> Result<()> {
        self.check(self.host.give_player_money(self.id, amount))
    }

    pub fn money(&self) -> i32 {
        self.host.get_player_money(self.id)
    }

    pub fn reset_money(&self) -> Result<()> {
        self.check(self.host.reset_player_money(self.id))
    }

    // ===== Vehicles =====

    /// The vehicle the player is sitting in
    pub fn vehicle(&self) -> Result<Vehicle> {
        match self.host.get_player_vehicle_id(self.id) {
            0 | INVALID_VEHICLE_ID => Err(Error::NotInVehicle),
            id => Ok(Vehicle::new(id)),
        }
    }

    pub fn is_in_vehicle(&self, vehicle: &Vehicle) -> bool {
        self.host.is_player_in_vehicle(self.id, vehicle.id())
    }

    pub fn is_in_any_vehicle(&self) -> bool {
        self.host.is_player_in_any_vehicle(self.id)
    }

    // ===== Animation =====

    pub fn apply_animation(&self, animation: &Animation) -> Result<()> {
        self.check(self.host.apply_animation(self.id, animation))
    }

    pub fn clear_animations(&self, force_sync: bool) -> Result<()> {
        self.check(self.host.clear_animations(self.id, force_sync))
    }

    pub fn set_special_action(&self, action: SpecialAction) -> Result<()> {
        self.check(self.host.set_player_special_action(self.id, action.code()))
    }

    pub fn special_action(&self) -> SpecialAction {
        SpecialAction::from_code(self.host.get_player_special_action(self.id))
    }

    // ===== Moderation =====

    pub fn kick(&self) -> Result<()> {
        self.check(self.host.kick(self.id))?;
        info!(target: "sampkit", "Kicked player {}", self.id);
        Ok(())
    }

    pub fn ban(&self) -> Result<()> {
        self.check(self.host.ban(self.id))?;
        info!(target: "sampkit", "Banned player {}", self.id);
        Ok(())
    }

    pub fn ban_with_reason(&self, reason: &str) -> Result<()> {
        self.check(self.host.ban_ex(self.id, reason))?;
        info!(target: "sampkit", "Banned player {}: {}", self.id, reason);
        Ok(())
    }

    // ===== Owned entities =====

    /// Attach a global object to this player at `offset` from their origin
    pub fn attach_object(&self, object: &GlobalObject, offset: Vec3, rotation: Vec3) -> Result<()> {
        status::ensure_op(
            self.host
                .attach_object_to_player(object.id(), self.id, offset, rotation),
            "AttachObjectToPlayer",
        )
    }

    /// Create an object only this player can see
    pub fn create_object(
        &self,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> Result<PlayerObject<'_>> {
        PlayerObject::create(self, model, position, rotation, draw_distance)
    }

    /// Create a text draw on this player's screen
    pub fn create_text_draw(&self, x: f32, y: f32, text: &str) -> Result<PlayerTextDraw<'_>> {
        PlayerTextDraw::create(self, x, y, text)
    }
}

impl Entity for Player {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player").field("id", &self.id).finish()
    }
}
