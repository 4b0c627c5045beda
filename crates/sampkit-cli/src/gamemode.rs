//! Bundled demo gamemode used by `sampkit replay`.

use std::sync::atomic::{AtomicI32, Ordering};

use tracing::warn;

use sampkit::host::{INVALID_OBJECT_ID, INVALID_TEXT_DRAW};
use sampkit::{
    events, Broadcast, Colour, Dialog, DialogStyle, Entity, EventArgs, Font, KnownEvent, Movable,
    Player, Server, SpawnInfo, TextAlignment, TextOverlay, Vec3,
};

const COLOUR_INFO: Colour = 0xA9C4_E4FF;
const COLOUR_ERROR: Colour = 0xE60D_0DFF;
const GATE_MODEL: i32 = 980;
const GATE_CLOSED: Vec3 = Vec3::new(1539.0, -1627.0, 14.0);
const GATE_OPEN: Vec3 = Vec3::new(1539.0, -1627.0, 8.5);
const GATE_SPEED: f32 = 2.0;
const WELCOME_DIALOG: i32 = 1;

static GATE: AtomicI32 = AtomicI32::new(INVALID_OBJECT_ID);
static BANNER: AtomicI32 = AtomicI32::new(INVALID_TEXT_DRAW);

fn spawn_point() -> SpawnInfo {
    SpawnInfo {
        skin: 0,
        position: Vec3::new(1958.33, 1343.12, 15.36),
        rotation: 269.15,
        ..SpawnInfo::default()
    }
}

/// Log handle errors instead of failing the callback
fn report(result: sampkit::Result<()>, what: &str) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!("{} failed: {}", what, err);
            false
        }
    }
}

fn player_arg(server: &Server, args: &EventArgs) -> Option<Player> {
    args.int(0).map(|id| server.player(id))
}

fn on_game_mode_init(server: &Server, _args: &EventArgs) -> bool {
    server.print("sampkit demo gamemode loaded");

    match server.create_object(GATE_MODEL, GATE_CLOSED, Vec3::default(), 0.0) {
        Ok(gate) => GATE.store(gate.id(), Ordering::Relaxed),
        Err(err) => warn!("Could not create gate: {}", err),
    }

    match server.create_text_draw(320.0, 5.0, "sampkit demo") {
        Ok(mut banner) => {
            BANNER.store(banner.id(), Ordering::Relaxed);
            report(banner.set_alignment(TextAlignment::Center), "banner alignment")
                && report(banner.set_font(Font::Gta), "banner font")
                && report(banner.set_text_size(12.0, 640.0), "banner size")
        }
        Err(err) => {
            warn!("Could not create banner: {}", err);
            false
        }
    }
}

fn on_player_connect(server: &Server, args: &EventArgs) -> bool {
    let Some(player) = player_arg(server, args) else {
        return false;
    };

    let name = match player.name() {
        Ok(name) => name,
        Err(err) => {
            warn!("Connected player has no name: {}", err);
            return false;
        }
    };

    let greeting = format!("Welcome to the demo, {}! Try /pos, /gate or /hud.", name);
    report(player.send_message(COLOUR_INFO, &greeting), "welcome message")
        && report(player.set_spawn_info(&spawn_point()), "spawn info")
        && report(player.spawn(), "spawn")
        && report(
            server
                .text_draw(BANNER.load(Ordering::Relaxed))
                .show_for_player(&player),
            "banner",
        )
}

fn on_player_disconnect(server: &Server, args: &EventArgs) -> bool {
    let (Some(playerid), Some(reason)) = (args.int(0), args.int(1)) else {
        return false;
    };
    server.print(&format!("Player {} left (reason {})", playerid, reason));
    true
}

fn on_player_command_text(server: &Server, args: &EventArgs) -> bool {
    let (Some(player), Some(text)) = (player_arg(server, args), args.text(1)) else {
        return false;
    };

    let (command, rest) = text.split_once(' ').unwrap_or((text, ""));
    let rest = rest.trim();

    match command {
        "/pos" => match player.position() {
            Ok(pos) => report(
                player.send_message(
                    COLOUR_INFO,
                    &format!("You are at {:.2}, {:.2}, {:.2}", pos.x, pos.y, pos.z),
                ),
                "/pos",
            ),
            Err(err) => report(Err(err), "/pos"),
        },
        "/money" => {
            let result = player.give_money(1000).and_then(|()| {
                player.send_message(COLOUR_INFO, &format!("You now have ${}", player.money()))
            });
            report(result, "/money")
        }
        "/dialog" => {
            let dialog = Dialog::new(
                WELCOME_DIALOG,
                DialogStyle::Input,
                "Welcome",
                "Pick a nickname:",
            )
            .buttons("OK", "Cancel");
            report(player.show_dialog(&dialog), "/dialog")
        }
        "/name" => {
            let result = match player.set_name(rest) {
                Ok(()) => player.send_message(COLOUR_INFO, &format!("You are now {}", rest)),
                Err(err) => player.send_message(COLOUR_ERROR, &err.to_string()),
            };
            report(result, "/name")
        }
        "/gate" => {
            let gate = server.object(GATE.load(Ordering::Relaxed));
            let target = match gate.position() {
                Ok(pos) if pos == GATE_OPEN => GATE_CLOSED,
                Ok(_) => GATE_OPEN,
                Err(err) => return report(Err(err), "/gate"),
            };
            let message = match gate.move_to(target, GATE_SPEED, Vec3::default()).eta() {
                Some(eta) => format!("Gate moving, {} ms to go", eta.as_millis()),
                None => "Gate is already there".to_string(),
            };
            report(player.send_message(COLOUR_INFO, &message), "/gate")
        }
        "/hud" => {
            let result = player.create_text_draw(500.0, 100.0, "HUD").and_then(|mut hud| {
                hud.set_alignment(TextAlignment::Center)?;
                hud.set_text_size(10.0, 120.0)?;
                hud.use_box(true)?;
                hud.set_box_colour(0x0000_0088)?;
                hud.show()
            });
            report(result, "/hud")
        }
        _ => false,
    }
}

fn on_dialog_response(server: &Server, args: &EventArgs) -> bool {
    let Some(player) = player_arg(server, args) else {
        return false;
    };
    if args.int(1) != Some(WELCOME_DIALOG) {
        return false;
    }

    let accepted = args.flag(2).unwrap_or(false);
    let input = args.text(4).unwrap_or_default();
    let reply = if accepted && !input.is_empty() {
        format!("Nice to meet you, {}", input)
    } else {
        "Maybe next time".to_string()
    };
    report(player.send_message(COLOUR_INFO, &reply), "dialog reply")
}

fn on_object_moved(server: &Server, args: &EventArgs) -> bool {
    let Some(objectid) = args.int(0) else {
        return false;
    };
    server.print(&format!("Object {} finished moving", objectid));
    true
}

/// Bind every demo handler in the process-wide event table
pub fn register() -> sampkit::Result<()> {
    events::on(KnownEvent::OnGameModeInit.name(), on_game_mode_init)?;
    events::on(KnownEvent::OnPlayerConnect.name(), on_player_connect)?;
    events::on(KnownEvent::OnPlayerDisconnect.name(), on_player_disconnect)?;
    events::on(KnownEvent::OnPlayerCommandText.name(), on_player_command_text)?;
    events::on(KnownEvent::OnDialogResponse.name(), on_dialog_response)?;
    events::on(KnownEvent::OnObjectMoved.name(), on_object_moved)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::sync::Once;

    use sampkit::event_args;
    use sampkit::host::SimulatedHost;

    use super::*;
    use crate::scenario::{Replay, Scenario};

    static REGISTER: Once = Once::new();

    fn registered() {
        REGISTER.call_once(|| register().unwrap());
    }

    #[test]
    fn test_second_register_is_duplicate() {
        registered();
        assert!(matches!(
            register(),
            Err(sampkit::Error::DuplicateRegistration(_))
        ));
    }

    #[test]
    fn test_demo_scenario() {
        registered();
        let scenario = Scenario::from_toml(include_str!("../scenarios/demo.toml")).unwrap();
        let sim = Rc::new(SimulatedHost::new());
        let summary = Replay::new(sim.clone()).run(&scenario);

        assert!(summary
            .console
            .iter()
            .any(|line| line == "sampkit demo gamemode loaded"));
        assert!(summary
            .console
            .iter()
            .any(|line| line.ends_with("finished moving")));
        assert_eq!(summary.players, vec![1]);
    }

    #[test]
    fn test_commands() {
        registered();
        let sim = Rc::new(SimulatedHost::new());
        let server = Server::new(sim.clone());
        let playerid = sim.connect_player("Alice", "127.0.0.1");

        assert_eq!(
            events::dispatch(&server, "OnPlayerCommandText", &event_args![playerid, "/money"]),
            Some(true)
        );
        assert_eq!(sim.player(playerid).unwrap().money, 1000);

        assert_eq!(
            events::dispatch(&server, "OnPlayerCommandText", &event_args![playerid, "/name Bob_Smith"]),
            Some(true)
        );
        assert_eq!(sim.player(playerid).unwrap().name, "Bob_Smith");

        assert_eq!(
            events::dispatch(&server, "OnPlayerCommandText", &event_args![playerid, "/nope"]),
            Some(false)
        );
    }
}
