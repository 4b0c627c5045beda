use std::fmt;

use crate::error::Result;
use crate::host::{EntityId, HostRef};
use crate::object::GlobalObject;
use crate::player::Player;
use crate::textdraw::GlobalTextDraw;
use crate::types::Vec3;

/// Entry point handed to every event handler.
///
/// Wraps the host reference and turns the raw ids that arrive in callback
/// arguments into handles.
#[derive(Clone)]
pub struct Server {
    host: HostRef,
}

impl Server {
    pub fn new(host: HostRef) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostRef {
        &self.host
    }

    /// Write a line to the server console
    pub fn print(&self, message: &str) {
        self.host.logprintf(message);
    }

    pub fn player(&self, id: EntityId) -> Player {
        Player::new(self.host.clone(), id)
    }

    pub fn object(&self, id: EntityId) -> GlobalObject {
        GlobalObject::from_id(&self.host, id)
    }

    pub fn text_draw(&self, id: EntityId) -> GlobalTextDraw {
        GlobalTextDraw::from_id(&self.host, id)
    }

    pub fn create_object(
        &self,
        model: i32,
        position: Vec3,
        rotation: Vec3,
        draw_distance: f32,
    ) -> Result<GlobalObject> {
        GlobalObject::create(&self.host, model, position, rotation, draw_distance)
    }

    pub fn create_text_draw(&self, x: f32, y: f32, text: &str) -> Result<GlobalTextDraw> {
        GlobalTextDraw::create(&self.host, x, y, text)
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::capability::{Entity, Movable};
    use crate::host::SimulatedHost;

    #[test]
    fn test_print_goes_to_console() {
        let sim = Rc::new(SimulatedHost::new());
        let server = Server::new(sim.clone());
        server.print("Gamemode loaded");
        assert_eq!(sim.console(), vec!["Gamemode loaded".to_string()]);
    }

    #[test]
    fn test_handles_from_callback_ids() {
        let sim = Rc::new(SimulatedHost::new());
        let server = Server::new(sim.clone());
        let created = server
            .create_object(1337, Vec3::new(1.0, 0.0, 0.0), Vec3::default(), 0.0)
            .unwrap();

        let bound = server.object(created.id());
        assert_eq!(bound.position().unwrap(), Vec3::new(1.0, 0.0, 0.0));
        assert!(!server.object(created.id() + 1).is_valid());
    }
}
