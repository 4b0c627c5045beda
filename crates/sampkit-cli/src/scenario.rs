use std::rc::Rc;

use serde::Deserialize;
use tracing::{info, warn};

use sampkit::host::{MotionFinished, SimulatedHost, INVALID_PLAYER_ID};
use sampkit::{event_args, events, EntityId, EventArgs, HostRef, KnownEvent, Server};

fn default_ip() -> String {
    "127.0.0.1".to_string()
}

/// Reason code the host reports for a normal quit
const DISCONNECT_QUIT: i32 = 1;

/// A scripted sequence of host activity
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A client joins and `OnPlayerConnect` fires
    Connect {
        name: String,
        #[serde(default = "default_ip")]
        ip: String,
    },
    /// `OnPlayerDisconnect` fires, then the slot is freed
    Disconnect { player: EntityId },
    /// Fire an arbitrary callback
    Event {
        name: String,
        #[serde(default)]
        args: EventArgs,
    },
    /// Let time pass so moving objects can arrive
    Advance { ms: u32 },
}

impl Scenario {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Debug, Default)]
pub struct Summary {
    pub steps: usize,
    /// Callbacks that reached a handler
    pub handled: usize,
    /// Callbacks with no handler bound
    pub unhandled: usize,
    /// Handled callbacks whose handler returned false
    pub declined: usize,
    pub players: Vec<EntityId>,
    pub console: Vec<String>,
}

/// Drives the process-wide event table against a simulated host
pub struct Replay {
    sim: Rc<SimulatedHost>,
    server: Server,
    summary: Summary,
}

impl Replay {
    pub fn new(sim: Rc<SimulatedHost>) -> Self {
        let host: HostRef = sim.clone();
        Self {
            sim,
            server: Server::new(host),
            summary: Summary::default(),
        }
    }

    fn fire(&mut self, name: &str, args: EventArgs) {
        match events::dispatch(&self.server, name, &args) {
            Some(true) => self.summary.handled += 1,
            Some(false) => {
                self.summary.handled += 1;
                self.summary.declined += 1;
            }
            None => self.summary.unhandled += 1,
        }
    }

    pub fn step(&mut self, step: &Step) {
        self.summary.steps += 1;
        match step {
            Step::Connect { name, ip } => {
                let playerid = self.sim.connect_player(name, ip);
                if playerid == INVALID_PLAYER_ID {
                    warn!("Server full, {} could not connect", name);
                    return;
                }
                info!("{} connected as player {}", name, playerid);
                self.fire(KnownEvent::OnPlayerConnect.name(), event_args![playerid]);
            }
            Step::Disconnect { player } => {
                self.fire(
                    KnownEvent::OnPlayerDisconnect.name(),
                    event_args![*player, DISCONNECT_QUIT],
                );
                if !self.sim.disconnect_player(*player) {
                    warn!("Player {} was not connected", player);
                }
            }
            Step::Event { name, args } => {
                if KnownEvent::from_name(name).is_none() {
                    warn!("{} is not a host callback", name);
                }
                self.fire(name, args.clone());
            }
            Step::Advance { ms } => {
                for finished in self.sim.advance(*ms) {
                    match finished {
                        MotionFinished::Object(objectid) => {
                            self.fire(KnownEvent::OnObjectMoved.name(), event_args![objectid])
                        }
                        MotionFinished::PlayerObject { playerid, objectid } => self.fire(
                            KnownEvent::OnPlayerObjectMoved.name(),
                            event_args![playerid, objectid],
                        ),
                    }
                }
            }
        }
    }

    /// Run the whole scenario between the gamemode init and exit callbacks
    pub fn run(mut self, scenario: &Scenario) -> Summary {
        self.fire(KnownEvent::OnGameModeInit.name(), EventArgs::new());
        for step in &scenario.steps {
            self.step(step);
        }
        self.fire(KnownEvent::OnGameModeExit.name(), EventArgs::new());

        self.summary.players = self.sim.connected_players();
        self.summary.console = self.sim.console();
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampkit::EventArg;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_toml(
            r#"
name = "parse"

[[step]]
kind = "connect"
name = "Alice"

[[step]]
kind = "event"
name = "OnPlayerCommandText"
args = [0, "/pos"]

[[step]]
kind = "advance"
ms = 250

[[step]]
kind = "disconnect"
player = 0
"#,
        )
        .unwrap();

        assert_eq!(scenario.name.as_deref(), Some("parse"));
        assert_eq!(
            scenario.steps[0],
            Step::Connect {
                name: "Alice".to_string(),
                ip: "127.0.0.1".to_string()
            }
        );
        match &scenario.steps[1] {
            Step::Event { name, args } => {
                assert_eq!(name, "OnPlayerCommandText");
                assert_eq!(args.get(0), Some(&EventArg::Int(0)));
                assert_eq!(args.text(1), Some("/pos"));
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(scenario.steps[2], Step::Advance { ms: 250 });
        assert_eq!(scenario.steps[3], Step::Disconnect { player: 0 });
    }

    #[test]
    fn test_negative_advance_is_rejected() {
        let result = Scenario::from_toml(
            r#"
[[step]]
kind = "advance"
ms = -5000
"#,
        );
        assert!(result.is_err(), "time only moves forward");
    }

    #[test]
    fn test_unbound_events_are_counted() {
        let scenario = Scenario::from_toml(
            r#"
[[step]]
kind = "event"
name = "OnReplayTestNobodyListens"
"#,
        )
        .unwrap();

        let summary = Replay::new(Rc::new(SimulatedHost::new())).run(&scenario);
        assert_eq!(summary.steps, 1);
        assert!(summary.unhandled >= 1);
    }
}
