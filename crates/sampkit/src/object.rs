use std::fmt;

use tracing::debug;

use crate::capability::{Entity, Movable, PlayerOwned};
use crate::error::{Error, Result};
use crate::host::{EntityId, HostRef};
use crate::player::Player;
use crate::scope::{Global, ObjectScope, PerPlayer};
use crate::status::{self, Motion};
use crate::types::Vec3;

/// A world object in the namespace chosen by `S`
pub struct Object<S: ObjectScope> {
    id: EntityId,
    scope: S,
}

/// Object every player sees
pub type GlobalObject = Object<Global>;

/// Object that exists only for one player
pub type PlayerObject<'p> = Object<PerPlayer<'p>>;

impl<S: ObjectScope> Object<S> {
    /// Ask the host for a new object.
    ///
    /// `draw_distance` of 0 lets the host pick its default.
    pub fn create_in(
        scope: S,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> Result<Self> {
        let id = scope.create(model, position, rotation, draw_distance);
        let id = status::created(id, S::INVALID, S::KIND)?;
        debug!(target: "sampkit", "Created {} {} (model {})", S::KIND, id, model);
        Ok(Self { id, scope })
    }

    /// Wrap an identifier the host handed out earlier, e.g. in a callback
    pub fn bind(scope: S, id: EntityId) -> Self {
        Self { id, scope }
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }
}

impl GlobalObject {
    pub fn create(
        host: &HostRef,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> Result<Self> {
        Self::create_in(Global::new(host.clone()), model, position, rotation, draw_distance)
    }

    pub fn from_id(host: &HostRef, id: EntityId) -> Self {
        Self::bind(Global::new(host.clone()), id)
    }
}

impl<'p> PlayerObject<'p> {
    pub fn create(
        owner: &'p Player,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> Result<Self> {
        Self::create_in(PerPlayer::new(owner), model, position, rotation, draw_distance)
    }

    pub fn from_id(owner: &'p Player, id: EntityId) -> Self {
        Self::bind(PerPlayer::new(owner), id)
    }
}

impl<S: ObjectScope> Entity for Object<S> {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl<S: ObjectScope> Movable for Object<S> {
    fn position(&self) -> Result<Vec3> {
        let mut position = Vec3::default();
        status::ensure(self.scope.get_pos(self.id, &mut position), S::KIND, self.id)?;
        Ok(position)
    }

    fn set_position(&self, position: Vec3) -> Result<()> {
        status::ensure(self.scope.set_pos(self.id, position), S::KIND, self.id)
    }

    fn rotation(&self) -> Result<Vec3> {
        let mut rotation = Vec3::default();
        status::ensure(self.scope.get_rot(self.id, &mut rotation), S::KIND, self.id)?;
        Ok(rotation)
    }

    fn set_rotation(&self, rotation: Vec3) -> Result<()> {
        status::ensure(self.scope.set_rot(self.id, rotation), S::KIND, self.id)
    }

    fn move_to(&self, target: Vec3, speed: f32, rotation: Vec3) -> Motion {
        Motion::from_eta(self.scope.move_to(self.id, target, speed, rotation))
    }

    fn is_moving(&self) -> bool {
        self.scope.is_moving(self.id)
    }

    fn stop(&self) {
        self.scope.stop(self.id);
    }

    fn destroy(&self) -> Result<()> {
        if !self.scope.destroy(self.id) {
            return Err(Error::invalid(S::KIND, self.id));
        }
        debug!(target: "sampkit", "Destroyed {} {}", S::KIND, self.id);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.scope.is_valid(self.id)
    }
}

impl PlayerOwned for PlayerObject<'_> {
    fn owner(&self) -> &Player {
        self.scope.owner()
    }
}

impl<S: ObjectScope + fmt::Debug> fmt::Debug for Object<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::error::EntityKind;
    use crate::host::SimulatedHost;

    fn setup() -> (Rc<SimulatedHost>, HostRef) {
        let sim = Rc::new(SimulatedHost::new());
        let host: HostRef = sim.clone();
        (sim, host)
    }

    #[test]
    fn test_position_failure_is_not_zero() {
        let (sim, host) = setup();
        let object = GlobalObject::create(&host, 1337, Vec3::new(1.0, 2.0, 3.0), Vec3::default(), 0.0).unwrap();

        sim.fail_next("GetObjectPos");
        assert_eq!(
            object.position(),
            Err(Error::invalid(EntityKind::Object, object.id()))
        );
        assert_eq!(object.position().unwrap(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_create_sentinel_is_error() {
        let (sim, host) = setup();
        sim.fail_next("CreateObject");
        let err = GlobalObject::create(&host, 1337, Vec3::default(), Vec3::default(), 0.0).unwrap_err();
        assert_eq!(err, Error::CreateFailed { kind: EntityKind::Object });
    }

    #[test]
    fn test_move_eta_maps_to_motion() {
        let (sim, host) = setup();
        let object = GlobalObject::create(&host, 1337, Vec3::default(), Vec3::default(), 0.0).unwrap();

        sim.set_move_eta(Some(500));
        assert_eq!(
            object.move_to(Vec3::new(5.0, 0.0, 0.0), 1.0, Vec3::default()),
            Motion::Scheduled(std::time::Duration::from_millis(500))
        );

        sim.set_move_eta(Some(0));
        assert_eq!(
            object.move_to(Vec3::new(5.0, 0.0, 0.0), 1.0, Vec3::default()),
            Motion::NotScheduled
        );
    }

    #[test]
    fn test_stop_is_safe_when_stationary() {
        let (_sim, host) = setup();
        let object = GlobalObject::create(&host, 1337, Vec3::default(), Vec3::default(), 0.0).unwrap();
        object.stop();
        object.stop();
        assert!(!object.is_moving());
        assert!(object.is_valid());
    }

    #[test]
    fn test_player_object_resolves_owner_per_call() {
        let (sim, host) = setup();
        let playerid = sim.connect_player("Alice", "127.0.0.1");
        let player = Player::new(host.clone(), playerid);
        let object = player
            .create_object(2000, Vec3::new(1.0, 1.0, 1.0), Vec3::default(), 0.0)
            .unwrap();

        assert_eq!(object.owner().id(), playerid);
        assert!(object.is_valid());
        assert_eq!(sim.call_count("IsValidPlayerObject"), 1);
        object.set_position(Vec3::new(4.0, 4.0, 4.0)).unwrap();
        assert_eq!(
            sim.player_object(playerid, object.id()).unwrap().position,
            Vec3::new(4.0, 4.0, 4.0)
        );
    }
}
