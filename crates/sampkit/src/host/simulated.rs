//! In-memory host used by tests and the replay tool.
//!
//! Keeps just enough world state to answer every native call the way the
//! real server would: ids are handed out lowest-free-slot first, invalid ids
//! produce the same failure codes, and object motion is interpolated when
//! [`SimulatedHost::advance`] is called. Every native call is recorded by its
//! host name so tests can assert on what reached the host.

use std::cell::{RefCell, RefMut};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::trace;

use super::{
    ConsoleNatives, EntityId, ObjectNatives, PlayerNatives, PlayerObjectNatives,
    PlayerTextDrawNatives, TextDrawNatives, DISCONNECTED_IP, INVALID_OBJECT_ID,
    INVALID_PLAYER_ID, INVALID_PLAYER_TEXT_DRAW, INVALID_TEXT_DRAW, MAX_PLAYERS, MAX_PLAYER_NAME,
};
use crate::types::{Animation, Colour, Dialog, SpawnInfo, Vec3};

const MAX_OBJECTS: EntityId = 1000;
const MAX_TEXT_DRAWS: EntityId = 2048;
const MAX_PLAYER_TEXT_DRAWS: EntityId = 256;
const MIN_PLAYER_NAME: usize = 3;
const CLIENT_VERSION: &str = "0.3.7-R2";
const BASE_PORT: u16 = 50000;

/// Knobs for the simulated host
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Capped at [`MAX_PLAYERS`]
    pub max_players: usize,
    /// Answer every move request with this ETA instead of distance / speed
    pub move_eta_override_ms: Option<i32>,
    pub default_ping_ms: i32,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            max_players: 50,
            move_eta_override_ms: None,
            default_ping_ms: 30,
        }
    }
}

/// A move that completed during [`SimulatedHost::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionFinished {
    Object(EntityId),
    PlayerObject { playerid: EntityId, objectid: EntityId },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimPlayer {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub position: Vec3,
    pub facing_angle: f32,
    pub money: i32,
    pub admin: bool,
    pub state: i32,
    /// 0 when on foot
    pub vehicle: EntityId,
    pub special_action: i32,
    pub ping: i32,
    pub connected_ms: i32,
    pub spawn_info: Option<SpawnInfo>,
    pub messages: Vec<(Colour, String)>,
    pub dialogs: Vec<Dialog>,
    pub animation: Option<Animation>,
    pub selecting: Option<Colour>,
    pub kicked: bool,
    pub ban_reason: Option<String>,
    pub attached: Vec<(EntityId, Vec3, Vec3)>,
}

impl SimPlayer {
    fn new(name: &str, ip: &str, port: u16, ping: i32) -> Self {
        Self {
            name: name.to_string(),
            ip: ip.to_string(),
            port,
            position: Vec3::default(),
            facing_angle: 0.0,
            money: 0,
            admin: false,
            state: 0,
            vehicle: 0,
            special_action: 0,
            ping,
            connected_ms: 0,
            spawn_info: None,
            messages: Vec::new(),
            dialogs: Vec::new(),
            animation: None,
            selecting: None,
            kicked: false,
            ban_reason: None,
            attached: Vec::new(),
        }
    }

    /// Last message the player received
    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(|(_, text)| text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SimMotion {
    target: Vec3,
    target_rotation: Vec3,
    remaining_ms: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimObject {
    pub model: i32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub draw_distance: f32,
    motion: Option<SimMotion>,
}

impl SimObject {
    fn new(model: i32, position: Vec3, rotation: Vec3, draw_distance: f32) -> Self {
        Self {
            model,
            position,
            rotation,
            draw_distance,
            motion: None,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    fn start_move(&mut self, target: Vec3, speed: f32, rotation: Vec3, eta_override: Option<i32>) -> i32 {
        let eta = match eta_override {
            Some(eta) => eta,
            None if speed > 0.0 => (self.position.distance(target) / speed * 1000.0).round() as i32,
            None => 0,
        };

        if eta > 0 {
            self.motion = Some(SimMotion {
                target,
                target_rotation: rotation,
                remaining_ms: eta,
            });
        } else {
            self.motion = None;
        }
        eta
    }

    /// Returns true when the move completes during this step
    fn step(&mut self, ms: i32) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };

        if ms >= motion.remaining_ms {
            self.position = motion.target;
            self.rotation = motion.target_rotation;
            self.motion = None;
            return true;
        }

        let t = ms as f32 / motion.remaining_ms as f32;
        let lerp = |from: f32, to: f32| from + (to - from) * t;
        self.position = Vec3::new(
            lerp(self.position.x, motion.target.x),
            lerp(self.position.y, motion.target.y),
            lerp(self.position.z, motion.target.z),
        );
        self.rotation = Vec3::new(
            lerp(self.rotation.x, motion.target_rotation.x),
            lerp(self.rotation.y, motion.target_rotation.y),
            lerp(self.rotation.z, motion.target_rotation.z),
        );
        motion.remaining_ms -= ms;
        false
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimTextDraw {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font: i32,
    pub use_box: bool,
    pub alignment: i32,
    /// Size exactly as the host received it
    pub size: (f32, f32),
    pub colour: Colour,
    pub box_colour: Colour,
    pub background_colour: Colour,
    pub selectable: bool,
    pub preview_model: Option<i32>,
    pub preview_rotation: Option<(Vec3, f32)>,
    pub preview_colours: Option<(i32, i32)>,
    pub shown_for: BTreeSet<EntityId>,
}

impl SimTextDraw {
    fn new(x: f32, y: f32, text: &str) -> Self {
        Self {
            x,
            y,
            text: text.to_string(),
            font: 1,
            use_box: false,
            alignment: 1,
            size: (0.0, 0.0),
            colour: 0xE1E1_E1FF,
            box_colour: 0x8080_8080,
            background_colour: 0x0000_00FF,
            selectable: false,
            preview_model: None,
            preview_rotation: None,
            preview_colours: None,
            shown_for: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Default)]
struct World {
    options: SimulationOptions,
    calls: Vec<&'static str>,
    forced_failures: HashSet<&'static str>,
    console: Vec<String>,
    players: BTreeMap<EntityId, SimPlayer>,
    objects: BTreeMap<EntityId, SimObject>,
    player_objects: BTreeMap<(EntityId, EntityId), SimObject>,
    text_draws: BTreeMap<EntityId, SimTextDraw>,
    player_text_draws: BTreeMap<(EntityId, EntityId), SimTextDraw>,
}

impl World {
    fn connected(&self, playerid: EntityId) -> bool {
        self.players.contains_key(&playerid)
    }

    fn player_mut(&mut self, playerid: EntityId) -> Option<&mut SimPlayer> {
        self.players.get_mut(&playerid)
    }

    fn player_object_mut(&mut self, playerid: EntityId, objectid: EntityId) -> Option<&mut SimObject> {
        self.player_objects.get_mut(&(playerid, objectid))
    }

    fn player_text_draw_mut(&mut self, playerid: EntityId, text: EntityId) -> Option<&mut SimTextDraw> {
        self.player_text_draws.get_mut(&(playerid, text))
    }
}

fn lowest_free(range: std::ops::Range<EntityId>, taken: impl Fn(EntityId) -> bool) -> Option<EntityId> {
    range.into_iter().find(|id| !taken(*id))
}

/// Copy `value` into `out` the way a C buffer of `size` bytes would hold it
fn write_buffer(out: &mut String, value: &str, size: usize) -> i32 {
    out.clear();
    let mut end = value.len().min(size.saturating_sub(1));
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    out.push_str(&value[..end]);
    out.len() as i32
}

fn valid_name(name: &str) -> bool {
    (MIN_PLAYER_NAME..=MAX_PLAYER_NAME).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "[]()$@._=".contains(c))
}

/// In-memory stand-in for the game server
#[derive(Debug, Default)]
pub struct SimulatedHost {
    world: RefCell<World>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::with_options(SimulationOptions::default())
    }

    pub fn with_options(mut options: SimulationOptions) -> Self {
        options.max_players = options.max_players.min(MAX_PLAYERS);
        Self {
            world: RefCell::new(World {
                options,
                ..World::default()
            }),
        }
    }

    /// Record a native call; the flag says whether it was forced to fail
    fn enter(&self, native: &'static str) -> (RefMut<'_, World>, bool) {
        let mut world = self.world.borrow_mut();
        trace!(target: "host", "{}", native);
        world.calls.push(native);
        let forced = world.forced_failures.remove(native);
        (world, forced)
    }

    // ===== Session control =====

    /// Connect a player into the lowest free slot.
    ///
    /// Returns [`INVALID_PLAYER_ID`] when the server is full.
    pub fn connect_player(&self, name: &str, ip: &str) -> EntityId {
        let mut world = self.world.borrow_mut();
        let max = world.options.max_players as EntityId;
        let Some(playerid) = lowest_free(0..max, |id| world.players.contains_key(&id)) else {
            return INVALID_PLAYER_ID;
        };
        let ping = world.options.default_ping_ms;
        let port = BASE_PORT.saturating_add(u16::try_from(playerid).unwrap_or(u16::MAX));
        world
            .players
            .insert(playerid, SimPlayer::new(name, ip, port, ping));
        playerid
    }

    /// Drop a player along with everything in their namespace
    pub fn disconnect_player(&self, playerid: EntityId) -> bool {
        let mut world = self.world.borrow_mut();
        if world.players.remove(&playerid).is_none() {
            return false;
        }
        world.player_objects.retain(|(owner, _), _| *owner != playerid);
        world.player_text_draws.retain(|(owner, _), _| *owner != playerid);
        for text_draw in world.text_draws.values_mut() {
            text_draw.shown_for.remove(&playerid);
        }
        true
    }

    /// Advance simulated time, completing moves and ageing connections
    pub fn advance(&self, ms: u32) -> Vec<MotionFinished> {
        let ms = i32::try_from(ms).unwrap_or(i32::MAX);
        let mut world = self.world.borrow_mut();
        let mut finished = Vec::new();

        for player in world.players.values_mut() {
            player.connected_ms = player.connected_ms.saturating_add(ms);
        }
        for (objectid, object) in world.objects.iter_mut() {
            if object.step(ms) {
                finished.push(MotionFinished::Object(*objectid));
            }
        }
        for ((playerid, objectid), object) in world.player_objects.iter_mut() {
            if object.step(ms) {
                finished.push(MotionFinished::PlayerObject {
                    playerid: *playerid,
                    objectid: *objectid,
                });
            }
        }
        finished
    }

    // ===== Stubbing =====

    /// Make the next call to `native` report failure
    pub fn fail_next(&self, native: &'static str) {
        self.world.borrow_mut().forced_failures.insert(native);
    }

    pub fn set_move_eta(&self, eta_ms: Option<i32>) {
        self.world.borrow_mut().options.move_eta_override_ms = eta_ms;
    }

    pub fn set_ping(&self, playerid: EntityId, ping: i32) {
        if let Some(player) = self.world.borrow_mut().player_mut(playerid) {
            player.ping = ping;
        }
    }

    pub fn set_connected_time(&self, playerid: EntityId, ms: i32) {
        if let Some(player) = self.world.borrow_mut().player_mut(playerid) {
            player.connected_ms = ms;
        }
    }

    pub fn set_admin(&self, playerid: EntityId, admin: bool) {
        if let Some(player) = self.world.borrow_mut().player_mut(playerid) {
            player.admin = admin;
        }
    }

    /// Seat a player as driver of `vehicleid`
    pub fn put_in_vehicle(&self, playerid: EntityId, vehicleid: EntityId) {
        if let Some(player) = self.world.borrow_mut().player_mut(playerid) {
            player.vehicle = vehicleid;
            player.state = 2;
        }
    }

    pub fn remove_from_vehicle(&self, playerid: EntityId) {
        if let Some(player) = self.world.borrow_mut().player_mut(playerid) {
            player.vehicle = 0;
            player.state = 1;
        }
    }

    // ===== Inspection =====

    pub fn calls(&self) -> Vec<&'static str> {
        self.world.borrow().calls.clone()
    }

    pub fn call_count(&self, native: &str) -> usize {
        self.world
            .borrow()
            .calls
            .iter()
            .filter(|call| **call == native)
            .count()
    }

    pub fn clear_calls(&self) {
        self.world.borrow_mut().calls.clear();
    }

    pub fn console(&self) -> Vec<String> {
        self.world.borrow().console.clone()
    }

    pub fn connected_players(&self) -> Vec<EntityId> {
        self.world.borrow().players.keys().copied().collect()
    }

    pub fn player(&self, playerid: EntityId) -> Option<SimPlayer> {
        self.world.borrow().players.get(&playerid).cloned()
    }

    pub fn object(&self, objectid: EntityId) -> Option<SimObject> {
        self.world.borrow().objects.get(&objectid).cloned()
    }

    pub fn player_object(&self, playerid: EntityId, objectid: EntityId) -> Option<SimObject> {
        self.world
            .borrow()
            .player_objects
            .get(&(playerid, objectid))
            .cloned()
    }

    pub fn text_draw(&self, text: EntityId) -> Option<SimTextDraw> {
        self.world.borrow().text_draws.get(&text).cloned()
    }

    pub fn player_text_draw(&self, playerid: EntityId, text: EntityId) -> Option<SimTextDraw> {
        self.world
            .borrow()
            .player_text_draws
            .get(&(playerid, text))
            .cloned()
    }
}

impl ObjectNatives for SimulatedHost {
    fn create_object(&self, model: i32, position: Vec3, rotation: Vec3, draw_distance: f32) -> EntityId {
        let (mut world, fail) = self.enter("CreateObject");
        if fail {
            return INVALID_OBJECT_ID;
        }
        match lowest_free(1..MAX_OBJECTS, |id| world.objects.contains_key(&id)) {
            Some(objectid) => {
                world
                    .objects
                    .insert(objectid, SimObject::new(model, position, rotation, draw_distance));
                objectid
            }
            None => INVALID_OBJECT_ID,
        }
    }

    fn destroy_object(&self, objectid: EntityId) -> bool {
        let (mut world, fail) = self.enter("DestroyObject");
        !fail && world.objects.remove(&objectid).is_some()
    }

    fn is_valid_object(&self, objectid: EntityId) -> bool {
        let (world, fail) = self.enter("IsValidObject");
        !fail && world.objects.contains_key(&objectid)
    }

    fn move_object(&self, objectid: EntityId, target: Vec3, speed: f32, rotation: Vec3) -> i32 {
        let (mut world, fail) = self.enter("MoveObject");
        let eta_override = world.options.move_eta_override_ms;
        match world.objects.get_mut(&objectid) {
            Some(object) if !fail => object.start_move(target, speed, rotation, eta_override),
            _ => 0,
        }
    }

    fn is_object_moving(&self, objectid: EntityId) -> bool {
        let (world, fail) = self.enter("IsObjectMoving");
        !fail && world.objects.get(&objectid).is_some_and(SimObject::is_moving)
    }

    fn stop_object(&self, objectid: EntityId) -> bool {
        let (mut world, fail) = self.enter("StopObject");
        match world.objects.get_mut(&objectid) {
            Some(object) if !fail => {
                object.motion = None;
                true
            }
            _ => false,
        }
    }

    fn set_object_pos(&self, objectid: EntityId, position: Vec3) -> bool {
        let (mut world, fail) = self.enter("SetObjectPos");
        match world.objects.get_mut(&objectid) {
            Some(object) if !fail => {
                object.position = position;
                true
            }
            _ => false,
        }
    }

    fn set_object_rot(&self, objectid: EntityId, rotation: Vec3) -> bool {
        let (mut world, fail) = self.enter("SetObjectRot");
        match world.objects.get_mut(&objectid) {
            Some(object) if !fail => {
                object.rotation = rotation;
                true
            }
            _ => false,
        }
    }

    fn get_object_pos(&self, objectid: EntityId, position: &mut Vec3) -> bool {
        let (world, fail) = self.enter("GetObjectPos");
        match world.objects.get(&objectid) {
            Some(object) if !fail => {
                *position = object.position;
                true
            }
            _ => false,
        }
    }

    fn get_object_rot(&self, objectid: EntityId, rotation: &mut Vec3) -> bool {
        let (world, fail) = self.enter("GetObjectRot");
        match world.objects.get(&objectid) {
            Some(object) if !fail => {
                *rotation = object.rotation;
                true
            }
            _ => false,
        }
    }

    fn attach_object_to_player(
        &self,
        objectid: EntityId,
        playerid: EntityId,
        offset: Vec3,
        rotation: Vec3,
    ) -> bool {
        let (mut world, fail) = self.enter("AttachObjectToPlayer");
        if fail || !world.objects.contains_key(&objectid) {
            return false;
        }
        match world.player_mut(playerid) {
            Some(player) => {
                player.attached.push((objectid, offset, rotation));
                true
            }
            None => false,
        }
    }
}

impl PlayerObjectNatives for SimulatedHost {
    fn create_player_object(
        &self,
        playerid: EntityId,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> EntityId {
        let (mut world, fail) = self.enter("CreatePlayerObject");
        if fail || !world.connected(playerid) {
            return INVALID_OBJECT_ID;
        }
        match lowest_free(1..MAX_OBJECTS, |id| {
            world.player_objects.contains_key(&(playerid, id))
        }) {
            Some(objectid) => {
                world.player_objects.insert(
                    (playerid, objectid),
                    SimObject::new(model, position, rotation, draw_distance),
                );
                objectid
            }
            None => INVALID_OBJECT_ID,
        }
    }

    fn destroy_player_object(&self, playerid: EntityId, objectid: EntityId) -> bool {
        let (mut world, fail) = self.enter("DestroyPlayerObject");
        !fail && world.player_objects.remove(&(playerid, objectid)).is_some()
    }

    fn is_valid_player_object(&self, playerid: EntityId, objectid: EntityId) -> bool {
        let (world, fail) = self.enter("IsValidPlayerObject");
        !fail && world.player_objects.contains_key(&(playerid, objectid))
    }

    fn move_player_object(
        &self,
        playerid: EntityId,
        objectid: EntityId,
        target: Vec3,
        speed: f32,
        rotation: Vec3,
    ) -> i32 {
        let (mut world, fail) = self.enter("MovePlayerObject");
        let eta_override = world.options.move_eta_override_ms;
        match world.player_object_mut(playerid, objectid) {
            Some(object) if !fail => object.start_move(target, speed, rotation, eta_override),
            _ => 0,
        }
    }

    fn is_player_object_moving(&self, playerid: EntityId, objectid: EntityId) -> bool {
        let (world, fail) = self.enter("IsPlayerObjectMoving");
        !fail
            && world
                .player_objects
                .get(&(playerid, objectid))
                .is_some_and(SimObject::is_moving)
    }

    fn stop_player_object(&self, playerid: EntityId, objectid: EntityId) -> bool {
        let (mut world, fail) = self.enter("StopPlayerObject");
        match world.player_object_mut(playerid, objectid) {
            Some(object) if !fail => {
                object.motion = None;
                true
            }
            _ => false,
        }
    }

    fn set_player_object_pos(&self, playerid: EntityId, objectid: EntityId, position: Vec3) -> bool {
        let (mut world, fail) = self.enter("SetPlayerObjectPos");
        match world.player_object_mut(playerid, objectid) {
            Some(object) if !fail => {
                object.position = position;
                true
            }
            _ => false,
        }
    }

    fn set_player_object_rot(&self, playerid: EntityId, objectid: EntityId, rotation: Vec3) -> bool {
        let (mut world, fail) = self.enter("SetPlayerObjectRot");
        match world.player_object_mut(playerid, objectid) {
            Some(object) if !fail => {
                object.rotation = rotation;
                true
            }
            _ => false,
        }
    }

    fn get_player_object_pos(&self, playerid: EntityId, objectid: EntityId, position: &mut Vec3) -> bool {
        let (world, fail) = self.enter("GetPlayerObjectPos");
        match world.player_objects.get(&(playerid, objectid)) {
            Some(object) if !fail => {
                *position = object.position;
                true
            }
            _ => false,
        }
    }

    fn get_player_object_rot(&self, playerid: EntityId, objectid: EntityId, rotation: &mut Vec3) -> bool {
        let (world, fail) = self.enter("GetPlayerObjectRot");
        match world.player_objects.get(&(playerid, objectid)) {
            Some(object) if !fail => {
                *rotation = object.rotation;
                true
            }
            _ => false,
        }
    }
}

impl PlayerNatives for SimulatedHost {
    fn get_player_name(&self, playerid: EntityId, name: &mut String, size: usize) -> i32 {
        let (world, fail) = self.enter("GetPlayerName");
        match world.players.get(&playerid) {
            Some(player) if !fail => write_buffer(name, &player.name, size),
            _ => {
                name.clear();
                0
            }
        }
    }

    fn set_player_name(&self, playerid: EntityId, name: &str) -> i32 {
        let (mut world, fail) = self.enter("SetPlayerName");
        if fail || !valid_name(name) {
            return -1;
        }
        let in_use = world
            .players
            .iter()
            .any(|(id, p)| *id != playerid && p.name.eq_ignore_ascii_case(name));
        match world.player_mut(playerid) {
            None => -1,
            Some(player) if player.name == name => 0,
            Some(_) if in_use => -1,
            Some(player) => {
                player.name = name.to_string();
                1
            }
        }
    }

    fn send_client_message(&self, playerid: EntityId, colour: Colour, message: &str) -> bool {
        let (mut world, fail) = self.enter("SendClientMessage");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.messages.push((colour, message.to_string()));
                true
            }
            _ => false,
        }
    }

    fn get_player_pos(&self, playerid: EntityId, position: &mut Vec3) -> bool {
        let (world, fail) = self.enter("GetPlayerPos");
        match world.players.get(&playerid) {
            Some(player) if !fail => {
                *position = player.position;
                true
            }
            _ => false,
        }
    }

    fn set_player_pos(&self, playerid: EntityId, position: Vec3) -> bool {
        let (mut world, fail) = self.enter("SetPlayerPos");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.position = position;
                true
            }
            _ => false,
        }
    }

    fn spawn_player(&self, playerid: EntityId) -> bool {
        let (mut world, fail) = self.enter("SpawnPlayer");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                if let Some(info) = &player.spawn_info {
                    player.position = info.position;
                    player.facing_angle = info.rotation;
                }
                player.state = 1;
                true
            }
            _ => false,
        }
    }

    fn set_spawn_info(&self, playerid: EntityId, info: &SpawnInfo) -> bool {
        let (mut world, fail) = self.enter("SetSpawnInfo");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.spawn_info = Some(info.clone());
                true
            }
            _ => false,
        }
    }

    fn show_player_dialog(&self, playerid: EntityId, dialog: &Dialog) -> bool {
        let (mut world, fail) = self.enter("ShowPlayerDialog");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.dialogs.push(dialog.clone());
                true
            }
            _ => false,
        }
    }

    fn get_player_facing_angle(&self, playerid: EntityId, angle: &mut f32) -> bool {
        let (world, fail) = self.enter("GetPlayerFacingAngle");
        match world.players.get(&playerid) {
            Some(player) if !fail => {
                *angle = player.facing_angle;
                true
            }
            _ => false,
        }
    }

    fn give_player_money(&self, playerid: EntityId, amount: i32) -> bool {
        let (mut world, fail) = self.enter("GivePlayerMoney");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.money = player.money.saturating_add(amount);
                true
            }
            _ => false,
        }
    }

    fn get_player_money(&self, playerid: EntityId) -> i32 {
        let (world, fail) = self.enter("GetPlayerMoney");
        match world.players.get(&playerid) {
            Some(player) if !fail => player.money,
            _ => 0,
        }
    }

    fn reset_player_money(&self, playerid: EntityId) -> bool {
        let (mut world, fail) = self.enter("ResetPlayerMoney");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.money = 0;
                true
            }
            _ => false,
        }
    }

    fn is_player_admin(&self, playerid: EntityId) -> bool {
        let (world, fail) = self.enter("IsPlayerAdmin");
        !fail && world.players.get(&playerid).is_some_and(|p| p.admin)
    }

    fn get_player_state(&self, playerid: EntityId) -> i32 {
        let (world, fail) = self.enter("GetPlayerState");
        match world.players.get(&playerid) {
            Some(player) if !fail => player.state,
            _ => 0,
        }
    }

    fn get_player_vehicle_id(&self, playerid: EntityId) -> EntityId {
        let (world, fail) = self.enter("GetPlayerVehicleID");
        match world.players.get(&playerid) {
            Some(player) if !fail => player.vehicle,
            _ => 0,
        }
    }

    fn is_player_in_vehicle(&self, playerid: EntityId, vehicleid: EntityId) -> bool {
        let (world, fail) = self.enter("IsPlayerInVehicle");
        !fail
            && vehicleid != 0
            && world
                .players
                .get(&playerid)
                .is_some_and(|p| p.vehicle == vehicleid)
    }

    fn is_player_in_any_vehicle(&self, playerid: EntityId) -> bool {
        let (world, fail) = self.enter("IsPlayerInAnyVehicle");
        !fail && world.players.get(&playerid).is_some_and(|p| p.vehicle != 0)
    }

    fn apply_animation(&self, playerid: EntityId, animation: &Animation) -> bool {
        let (mut world, fail) = self.enter("ApplyAnimation");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.animation = Some(animation.clone());
                true
            }
            _ => false,
        }
    }

    fn clear_animations(&self, playerid: EntityId, _force_sync: bool) -> bool {
        let (mut world, fail) = self.enter("ClearAnimations");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.animation = None;
                true
            }
            _ => false,
        }
    }

    fn set_player_special_action(&self, playerid: EntityId, action: i32) -> bool {
        let (mut world, fail) = self.enter("SetPlayerSpecialAction");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.special_action = action;
                true
            }
            _ => false,
        }
    }

    fn get_player_special_action(&self, playerid: EntityId) -> i32 {
        let (world, fail) = self.enter("GetPlayerSpecialAction");
        match world.players.get(&playerid) {
            Some(player) if !fail => player.special_action,
            _ => 0,
        }
    }

    fn select_text_draw(&self, playerid: EntityId, hover_colour: Colour) -> bool {
        let (mut world, fail) = self.enter("SelectTextDraw");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.selecting = Some(hover_colour);
                true
            }
            _ => false,
        }
    }

    fn cancel_select_text_draw(&self, playerid: EntityId) -> bool {
        let (mut world, fail) = self.enter("CancelSelectTextDraw");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.selecting = None;
                true
            }
            _ => false,
        }
    }

    fn kick(&self, playerid: EntityId) -> bool {
        let (mut world, fail) = self.enter("Kick");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.kicked = true;
                true
            }
            _ => false,
        }
    }

    fn ban(&self, playerid: EntityId) -> bool {
        let (mut world, fail) = self.enter("Ban");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.ban_reason = Some(String::new());
                true
            }
            _ => false,
        }
    }

    fn ban_ex(&self, playerid: EntityId, reason: &str) -> bool {
        let (mut world, fail) = self.enter("BanEx");
        match world.player_mut(playerid) {
            Some(player) if !fail => {
                player.ban_reason = Some(reason.to_string());
                true
            }
            _ => false,
        }
    }

    fn get_player_ip(&self, playerid: EntityId, ip: &mut String, size: usize) -> i32 {
        let (world, fail) = self.enter("GetPlayerIp");
        match world.players.get(&playerid) {
            Some(player) if !fail => write_buffer(ip, &player.ip, size),
            _ => {
                write_buffer(ip, DISCONNECTED_IP, size);
                -1
            }
        }
    }

    fn net_stats_get_ip_port(&self, playerid: EntityId, ip_port: &mut String, size: usize) -> i32 {
        let (world, fail) = self.enter("NetStats_GetIpPort");
        match world.players.get(&playerid) {
            Some(player) if !fail => {
                write_buffer(ip_port, &format!("{}:{}", player.ip, player.port), size)
            }
            _ => {
                ip_port.clear();
                0
            }
        }
    }

    fn get_player_version(&self, playerid: EntityId, version: &mut String, size: usize) -> i32 {
        let (world, fail) = self.enter("GetPlayerVersion");
        if fail || !world.connected(playerid) {
            version.clear();
            return 0;
        }
        write_buffer(version, CLIENT_VERSION, size)
    }

    fn get_player_ping(&self, playerid: EntityId) -> i32 {
        let (world, fail) = self.enter("GetPlayerPing");
        match world.players.get(&playerid) {
            Some(player) if !fail => player.ping,
            _ => -1,
        }
    }

    fn net_stats_get_connected_time(&self, playerid: EntityId) -> i32 {
        let (world, fail) = self.enter("NetStats_GetConnectedTime");
        match world.players.get(&playerid) {
            Some(player) if !fail => player.connected_ms,
            _ => 0,
        }
    }
}

/// Shared body for the attribute setters of both text draw namespaces
macro_rules! update_text_draw {
    ($self:ident, $native:literal, |$world:ident| $lookup:expr, |$td:ident| $body:expr) => {{
        let (mut $world, fail) = $self.enter($native);
        match $lookup {
            Some($td) if !fail => {
                $body;
                true
            }
            _ => false,
        }
    }};
}

impl TextDrawNatives for SimulatedHost {
    fn text_draw_create(&self, x: f32, y: f32, text: &str) -> EntityId {
        let (mut world, fail) = self.enter("TextDrawCreate");
        if fail {
            return INVALID_TEXT_DRAW;
        }
        match lowest_free(0..MAX_TEXT_DRAWS, |id| world.text_draws.contains_key(&id)) {
            Some(id) => {
                world.text_draws.insert(id, SimTextDraw::new(x, y, text));
                id
            }
            None => INVALID_TEXT_DRAW,
        }
    }

    fn text_draw_destroy(&self, text: EntityId) -> bool {
        let (mut world, fail) = self.enter("TextDrawDestroy");
        !fail && world.text_draws.remove(&text).is_some()
    }

    fn text_draw_set_string(&self, text: EntityId, string: &str) -> bool {
        update_text_draw!(self, "TextDrawSetString", |world| world.text_draws.get_mut(&text), |td| {
            td.text = string.to_string()
        })
    }

    fn text_draw_show_for_player(&self, playerid: EntityId, text: EntityId) -> bool {
        let (mut world, fail) = self.enter("TextDrawShowForPlayer");
        if fail || !world.connected(playerid) {
            return false;
        }
        match world.text_draws.get_mut(&text) {
            Some(td) => {
                td.shown_for.insert(playerid);
                true
            }
            None => false,
        }
    }

    fn text_draw_show_for_all(&self, text: EntityId) -> bool {
        let (mut world, fail) = self.enter("TextDrawShowForAll");
        if fail {
            return false;
        }
        let players: Vec<EntityId> = world.players.keys().copied().collect();
        match world.text_draws.get_mut(&text) {
            Some(td) => {
                td.shown_for.extend(players);
                true
            }
            None => false,
        }
    }

    fn text_draw_hide_for_player(&self, playerid: EntityId, text: EntityId) -> bool {
        update_text_draw!(self, "TextDrawHideForPlayer", |world| world.text_draws.get_mut(&text), |td| {
            td.shown_for.remove(&playerid)
        })
    }

    fn text_draw_hide_for_all(&self, text: EntityId) -> bool {
        update_text_draw!(self, "TextDrawHideForAll", |world| world.text_draws.get_mut(&text), |td| {
            td.shown_for.clear()
        })
    }

    fn text_draw_font(&self, text: EntityId, font: i32) -> bool {
        update_text_draw!(self, "TextDrawFont", |world| world.text_draws.get_mut(&text), |td| {
            td.font = font
        })
    }

    fn text_draw_use_box(&self, text: EntityId, use_box: bool) -> bool {
        update_text_draw!(self, "TextDrawUseBox", |world| world.text_draws.get_mut(&text), |td| {
            td.use_box = use_box
        })
    }

    fn text_draw_alignment(&self, text: EntityId, alignment: i32) -> bool {
        update_text_draw!(self, "TextDrawAlignment", |world| world.text_draws.get_mut(&text), |td| {
            td.alignment = alignment
        })
    }

    fn text_draw_text_size(&self, text: EntityId, x: f32, y: f32) -> bool {
        update_text_draw!(self, "TextDrawTextSize", |world| world.text_draws.get_mut(&text), |td| {
            td.size = (x, y)
        })
    }

    fn text_draw_color(&self, text: EntityId, colour: Colour) -> bool {
        update_text_draw!(self, "TextDrawColor", |world| world.text_draws.get_mut(&text), |td| {
            td.colour = colour
        })
    }

    fn text_draw_box_color(&self, text: EntityId, colour: Colour) -> bool {
        update_text_draw!(self, "TextDrawBoxColor", |world| world.text_draws.get_mut(&text), |td| {
            td.box_colour = colour
        })
    }

    fn text_draw_background_color(&self, text: EntityId, colour: Colour) -> bool {
        update_text_draw!(self, "TextDrawBackgroundColor", |world| world.text_draws.get_mut(&text), |td| {
            td.background_colour = colour
        })
    }

    fn text_draw_set_selectable(&self, text: EntityId, selectable: bool) -> bool {
        update_text_draw!(self, "TextDrawSetSelectable", |world| world.text_draws.get_mut(&text), |td| {
            td.selectable = selectable
        })
    }

    fn text_draw_set_preview_model(&self, text: EntityId, model: i32) -> bool {
        update_text_draw!(self, "TextDrawSetPreviewModel", |world| world.text_draws.get_mut(&text), |td| {
            td.preview_model = Some(model)
        })
    }

    fn text_draw_set_preview_rot(&self, text: EntityId, rotation: Vec3, zoom: f32) -> bool {
        update_text_draw!(self, "TextDrawSetPreviewRot", |world| world.text_draws.get_mut(&text), |td| {
            td.preview_rotation = Some((rotation, zoom))
        })
    }

    fn text_draw_set_preview_veh_col(&self, text: EntityId, colour1: i32, colour2: i32) -> bool {
        update_text_draw!(self, "TextDrawSetPreviewVehCol", |world| world.text_draws.get_mut(&text), |td| {
            td.preview_colours = Some((colour1, colour2))
        })
    }
}

impl PlayerTextDrawNatives for SimulatedHost {
    fn create_player_text_draw(&self, playerid: EntityId, x: f32, y: f32, text: &str) -> EntityId {
        let (mut world, fail) = self.enter("CreatePlayerTextDraw");
        if fail || !world.connected(playerid) {
            return INVALID_PLAYER_TEXT_DRAW;
        }
        match lowest_free(0..MAX_PLAYER_TEXT_DRAWS, |id| {
            world.player_text_draws.contains_key(&(playerid, id))
        }) {
            Some(id) => {
                world
                    .player_text_draws
                    .insert((playerid, id), SimTextDraw::new(x, y, text));
                id
            }
            None => INVALID_PLAYER_TEXT_DRAW,
        }
    }

    fn player_text_draw_destroy(&self, playerid: EntityId, text: EntityId) -> bool {
        let (mut world, fail) = self.enter("PlayerTextDrawDestroy");
        !fail && world.player_text_draws.remove(&(playerid, text)).is_some()
    }

    fn player_text_draw_set_string(&self, playerid: EntityId, text: EntityId, string: &str) -> bool {
        update_text_draw!(self, "PlayerTextDrawSetString", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.text = string.to_string()
        })
    }

    fn player_text_draw_show(&self, playerid: EntityId, text: EntityId) -> bool {
        update_text_draw!(self, "PlayerTextDrawShow", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.shown_for.insert(playerid)
        })
    }

    fn player_text_draw_hide(&self, playerid: EntityId, text: EntityId) -> bool {
        update_text_draw!(self, "PlayerTextDrawHide", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.shown_for.remove(&playerid)
        })
    }

    fn player_text_draw_font(&self, playerid: EntityId, text: EntityId, font: i32) -> bool {
        update_text_draw!(self, "PlayerTextDrawFont", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.font = font
        })
    }

    fn player_text_draw_use_box(&self, playerid: EntityId, text: EntityId, use_box: bool) -> bool {
        update_text_draw!(self, "PlayerTextDrawUseBox", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.use_box = use_box
        })
    }

    fn player_text_draw_alignment(&self, playerid: EntityId, text: EntityId, alignment: i32) -> bool {
        update_text_draw!(self, "PlayerTextDrawAlignment", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.alignment = alignment
        })
    }

    fn player_text_draw_text_size(&self, playerid: EntityId, text: EntityId, x: f32, y: f32) -> bool {
        update_text_draw!(self, "PlayerTextDrawTextSize", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.size = (x, y)
        })
    }

    fn player_text_draw_color(&self, playerid: EntityId, text: EntityId, colour: Colour) -> bool {
        update_text_draw!(self, "PlayerTextDrawColor", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.colour = colour
        })
    }

    fn player_text_draw_box_color(&self, playerid: EntityId, text: EntityId, colour: Colour) -> bool {
        update_text_draw!(self, "PlayerTextDrawBoxColor", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.box_colour = colour
        })
    }

    fn player_text_draw_background_color(&self, playerid: EntityId, text: EntityId, colour: Colour) -> bool {
        update_text_draw!(self, "PlayerTextDrawBackgroundColor", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.background_colour = colour
        })
    }

    fn player_text_draw_set_selectable(&self, playerid: EntityId, text: EntityId, selectable: bool) -> bool {
        update_text_draw!(self, "PlayerTextDrawSetSelectable", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.selectable = selectable
        })
    }

    fn player_text_draw_set_preview_model(&self, playerid: EntityId, text: EntityId, model: i32) -> bool {
        update_text_draw!(self, "PlayerTextDrawSetPreviewModel", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.preview_model = Some(model)
        })
    }

    fn player_text_draw_set_preview_rot(
        &self,
        playerid: EntityId,
        text: EntityId,
        rotation: Vec3,
        zoom: f32,
    ) -> bool {
        update_text_draw!(self, "PlayerTextDrawSetPreviewRot", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.preview_rotation = Some((rotation, zoom))
        })
    }

    fn player_text_draw_set_preview_veh_col(
        &self,
        playerid: EntityId,
        text: EntityId,
        colour1: i32,
        colour2: i32,
    ) -> bool {
        update_text_draw!(self, "PlayerTextDrawSetPreviewVehCol", |world| world.player_text_draw_mut(playerid, text), |td| {
            td.preview_colours = Some((colour1, colour2))
        })
    }
}

impl ConsoleNatives for SimulatedHost {
    fn logprintf(&self, message: &str) {
        let (mut world, _) = self.enter("logprintf");
        world.console.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_take_lowest_free_slot() {
        let host = SimulatedHost::new();
        assert_eq!(host.connect_player("Alice", "127.0.0.1"), 0);
        assert_eq!(host.connect_player("Bob", "127.0.0.1"), 1);
        assert!(host.disconnect_player(0));
        assert_eq!(host.connect_player("Carol", "127.0.0.1"), 0);
    }

    #[test]
    fn test_server_full_returns_sentinel() {
        let host = SimulatedHost::with_options(SimulationOptions {
            max_players: 1,
            ..SimulationOptions::default()
        });
        assert_eq!(host.connect_player("Alice", "127.0.0.1"), 0);
        assert_eq!(host.connect_player("Bob", "127.0.0.1"), INVALID_PLAYER_ID);
    }

    #[test]
    fn test_player_slots_capped_at_host_limit() {
        let host = SimulatedHost::with_options(SimulationOptions {
            max_players: 20_000,
            ..SimulationOptions::default()
        });

        for expected in 0..MAX_PLAYERS as EntityId {
            assert_eq!(host.connect_player(&format!("Player{}", expected), "127.0.0.1"), expected);
        }
        assert_eq!(host.connect_player("Overflow", "127.0.0.1"), INVALID_PLAYER_ID);

        let last = host.player(MAX_PLAYERS as EntityId - 1).unwrap();
        assert_eq!(last.port, BASE_PORT + (MAX_PLAYERS as u16 - 1));
    }

    #[test]
    fn test_move_eta_from_distance_and_speed() {
        let host = SimulatedHost::new();
        let id = host.create_object(1337, Vec3::default(), Vec3::default(), 0.0);
        let eta = host.move_object(id, Vec3::new(10.0, 0.0, 0.0), 5.0, Vec3::default());
        assert_eq!(eta, 2000);
        assert!(host.is_object_moving(id));

        assert!(host.advance(1000).is_empty());
        let halfway = host.object(id).unwrap().position;
        assert!((halfway.x - 5.0).abs() < 1e-3);

        assert_eq!(host.advance(1000), vec![MotionFinished::Object(id)]);
        assert!(!host.is_object_moving(id));
        assert_eq!(host.object(id).unwrap().position, Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_advance_never_overshoots_or_reverses() {
        let host = SimulatedHost::new();
        let playerid = host.connect_player("Alice", "127.0.0.1");
        let id = host.create_object(1337, Vec3::default(), Vec3::default(), 0.0);
        host.move_object(id, Vec3::new(10.0, 0.0, 0.0), 5.0, Vec3::default());

        assert!(host.advance(0).is_empty());
        assert_eq!(host.object(id).unwrap().position, Vec3::default());

        assert_eq!(host.advance(u32::MAX), vec![MotionFinished::Object(id)]);
        assert_eq!(host.object(id).unwrap().position, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(host.player(playerid).unwrap().connected_ms, i32::MAX);
    }

    #[test]
    fn test_disconnect_drops_player_namespace() {
        let host = SimulatedHost::new();
        let playerid = host.connect_player("Alice", "127.0.0.1");
        let objectid = host.create_player_object(playerid, 1, Vec3::default(), Vec3::default(), 0.0);
        let text = host.create_player_text_draw(playerid, 1.0, 1.0, "hi");
        host.disconnect_player(playerid);
        assert!(!host.is_valid_player_object(playerid, objectid));
        assert!(host.player_text_draw(playerid, text).is_none());
    }

    #[test]
    fn test_buffers_truncate_like_c_strings() {
        let host = SimulatedHost::new();
        let playerid = host.connect_player("Alice", "192.168.100.200");
        let mut ip = String::new();
        assert_eq!(host.get_player_ip(playerid, &mut ip, 8), 7);
        assert_eq!(ip, "192.168");
    }

    #[test]
    fn test_fail_next_applies_once() {
        let host = SimulatedHost::new();
        let playerid = host.connect_player("Alice", "127.0.0.1");
        host.fail_next("SpawnPlayer");
        assert!(!host.spawn_player(playerid));
        assert!(host.spawn_player(playerid));
        assert_eq!(host.call_count("SpawnPlayer"), 2);
    }

    #[test]
    fn test_set_player_name_statuses() {
        let host = SimulatedHost::new();
        let alice = host.connect_player("Alice", "127.0.0.1");
        let bob = host.connect_player("Bob", "127.0.0.1");
        assert_eq!(host.set_player_name(alice, "Alice"), 0);
        assert_eq!(host.set_player_name(alice, "bob"), -1);
        assert_eq!(host.set_player_name(alice, "bad name!"), -1);
        assert_eq!(host.set_player_name(bob, "Robert"), 1);
        assert_eq!(host.player(bob).unwrap().name, "Robert");
    }
}
