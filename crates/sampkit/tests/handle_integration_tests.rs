// Integration tests for entity handles against the simulated host

use std::rc::Rc;
use std::time::Duration;

use sampkit::host::{
    MotionFinished, PlayerNatives, SimulatedHost, DISCONNECTED_IP, IP_BUFFER_SIZE, MAX_MESSAGE_LEN,
};
use sampkit::{
    Broadcast, ConstraintViolation, Entity, EntityKind, Error, GlobalObject, GlobalTextDraw, HostRef,
    Motion, Movable, Player, PlayerOwned, Server, TextAlignment, TextOverlay, Vec3,
};

fn setup() -> (Rc<SimulatedHost>, Server) {
    let sim = Rc::new(SimulatedHost::new());
    let host: HostRef = sim.clone();
    (sim, Server::new(host))
}

fn connect(sim: &SimulatedHost, server: &Server, name: &str) -> Player {
    let id = sim.connect_player(name, "127.0.0.1");
    server.player(id)
}

#[test]
fn test_object_lifecycle() {
    let (_sim, server) = setup();
    let object = server
        .create_object(1337, Vec3::new(0.0, 0.0, 3.0), Vec3::default(), 0.0)
        .expect("create should succeed");
    assert!(object.is_valid());

    let motion = object.move_to(Vec3::new(30.0, 0.0, 3.0), 10.0, Vec3::default());
    assert_eq!(motion, Motion::Scheduled(Duration::from_millis(3000)));
    assert!(object.is_moving(), "object should be moving after move_to");

    object.stop();
    assert!(!object.is_moving(), "stop should end the motion");

    object.destroy().expect("destroy should succeed");
    assert!(!object.is_valid(), "destroyed object should be invalid");
    assert_eq!(
        object.position(),
        Err(Error::invalid(EntityKind::Object, object.id()))
    );
    assert!(object.destroy().is_err(), "double destroy should fail");
}

#[test]
fn test_player_object_lifecycle() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");
    let object = player
        .create_object(1337, Vec3::default(), Vec3::default(), 0.0)
        .unwrap();

    assert!(object
        .move_to(Vec3::new(0.0, 10.0, 0.0), 5.0, Vec3::default())
        .is_scheduled());
    assert!(object.is_moving());

    let finished = sim.advance(2000);
    assert_eq!(
        finished,
        vec![MotionFinished::PlayerObject {
            playerid: player.id(),
            objectid: object.id()
        }]
    );
    assert!(!object.is_moving());
    assert_eq!(object.position().unwrap(), Vec3::new(0.0, 10.0, 0.0));

    object.destroy().unwrap();
    assert!(!object.is_valid());
    assert!(object
        .rotation()
        .unwrap_err()
        .is_invalid_entity());
}

#[test]
fn test_move_eta_translation() {
    let (sim, server) = setup();
    let object = server
        .create_object(1337, Vec3::default(), Vec3::default(), 0.0)
        .unwrap();

    sim.set_move_eta(Some(500));
    let motion = object.move_to(Vec3::new(1.0, 1.0, 1.0), 1.0, Vec3::default());
    assert_eq!(motion.eta(), Some(Duration::from_millis(500)));

    sim.set_move_eta(Some(0));
    let motion = object.move_to(Vec3::new(2.0, 2.0, 2.0), 1.0, Vec3::default());
    assert_eq!(motion, Motion::NotScheduled);
    assert!(!object.is_moving());
}

#[test]
fn test_failed_position_read_is_an_error() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");
    player.set_position(Vec3::new(5.0, 6.0, 7.0)).unwrap();

    sim.fail_next("GetPlayerPos");
    let result = player.position();
    assert_eq!(result, Err(Error::invalid(EntityKind::Player, player.id())));

    let object = server
        .create_object(1, Vec3::new(1.0, 1.0, 1.0), Vec3::default(), 0.0)
        .unwrap();
    sim.fail_next("GetObjectPos");
    assert!(object.position().is_err(), "never (0, 0, 0) on failure");
}

#[test]
fn test_centered_text_size_swaps_for_both_scopes() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");

    let mut global = server.create_text_draw(320.0, 100.0, "Title").unwrap();
    global.set_alignment(TextAlignment::Center).unwrap();
    global.set_text_size(10.0, 20.0).unwrap();
    assert_eq!(sim.text_draw(global.id()).unwrap().size, (20.0, 10.0));
    assert_eq!(sim.text_draw(global.id()).unwrap().alignment, 2);

    let mut scoped = player.create_text_draw(320.0, 100.0, "Score").unwrap();
    scoped.set_alignment(TextAlignment::Center).unwrap();
    scoped.set_text_size(10.0, 20.0).unwrap();
    assert_eq!(
        sim.player_text_draw(player.id(), scoped.id()).unwrap().size,
        (20.0, 10.0)
    );

    scoped.set_alignment(TextAlignment::Left).unwrap();
    scoped.set_text_size(10.0, 20.0).unwrap();
    assert_eq!(
        sim.player_text_draw(player.id(), scoped.id()).unwrap().size,
        (10.0, 20.0)
    );
}

#[test]
fn test_scoped_entities_follow_their_owner() {
    let (sim, server) = setup();
    let alice = connect(&sim, &server, "Alice");
    let bob = connect(&sim, &server, "Bob");

    let alice_td = alice.create_text_draw(1.0, 1.0, "a").unwrap();
    let bob_td = bob.create_text_draw(1.0, 1.0, "b").unwrap();
    // Ids are per player, so both start at the same slot
    assert_eq!(alice_td.id(), bob_td.id());
    assert_eq!(alice_td.owner().id(), alice.id());
    assert_eq!(bob_td.owner().id(), bob.id());

    alice_td.set_string("changed").unwrap();
    assert_eq!(
        sim.player_text_draw(alice.id(), alice_td.id()).unwrap().text,
        "changed"
    );
    assert_eq!(
        sim.player_text_draw(bob.id(), bob_td.id()).unwrap().text,
        "b"
    );

    sim.disconnect_player(alice.id());
    assert!(alice_td.set_string("gone").unwrap_err().is_invalid_entity());
}

#[test]
fn test_player_constraints_checked_before_host() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");
    sim.clear_calls();

    assert!(matches!(
        player.set_name("ThisNameIsMuchTooLongForTheHost"),
        Err(Error::Constraint(ConstraintViolation::NameTooLong { .. }))
    ));
    assert_eq!(
        player.send_message(0xFFFFFFFF, ""),
        Err(Error::Constraint(ConstraintViolation::MessageEmpty))
    );
    assert!(player
        .send_message(0xFFFFFFFF, &"a".repeat(MAX_MESSAGE_LEN + 1))
        .is_err());
    assert!(sim.calls().is_empty(), "no native should have been called");
}

#[test]
fn test_disconnected_player_reports_invalid() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");
    assert!(player.ip().is_ok());
    sim.disconnect_player(player.id());

    let mut raw = String::new();
    sim.get_player_ip(player.id(), &mut raw, IP_BUFFER_SIZE);
    assert_eq!(raw, DISCONNECTED_IP);
    assert_eq!(
        player.ip(),
        Err(Error::invalid(EntityKind::Player, player.id()))
    );
}

#[test]
fn test_connected_time_zero_is_invalid() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");

    sim.set_connected_time(player.id(), 0);
    assert!(player.connected_time().unwrap_err().is_invalid_entity());

    sim.set_connected_time(player.id(), 61_000);
    assert_eq!(player.connected_time().unwrap(), Duration::from_secs(61));
}

#[test]
fn test_attach_global_object() {
    let (sim, server) = setup();
    let player = connect(&sim, &server, "Alice");
    let hat: GlobalObject = server
        .create_object(19_064, Vec3::default(), Vec3::default(), 0.0)
        .unwrap();

    player
        .attach_object(&hat, Vec3::new(0.0, 0.0, 0.8), Vec3::default())
        .unwrap();
    let attached = sim.player(player.id()).unwrap().attached;
    assert_eq!(attached, vec![(hat.id(), Vec3::new(0.0, 0.0, 0.8), Vec3::default())]);
}

#[test]
fn test_broadcast_text_draw() {
    let (sim, server) = setup();
    let alice = connect(&sim, &server, "Alice");
    let bob = connect(&sim, &server, "Bob");
    let banner: GlobalTextDraw = server.create_text_draw(10.0, 10.0, "Welcome").unwrap();

    banner.show_for_all().unwrap();
    let shown = sim.text_draw(banner.id()).unwrap().shown_for;
    assert!(shown.contains(&alice.id()) && shown.contains(&bob.id()));

    banner.hide_for_player(&bob).unwrap();
    let shown = sim.text_draw(banner.id()).unwrap().shown_for;
    assert!(!shown.contains(&bob.id()));
}
