// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end session scenarios against the production escape-room
//! definition, driven over a recording bus.

use op_core::Topics;
use op_daemon::{Controller, FakeBus, GameState};
use op_engine::EscapeRoomDefinition;

const SOLVED: &[u8] = br#"{"method":"status","state":"solved"}"#;

fn controller() -> (Controller<FakeBus>, FakeBus) {
    let bus = FakeBus::new();
    let controller =
        Controller::new(bus.clone(), Topics::default(), Box::new(EscapeRoomDefinition), None);
    (controller, bus)
}

async fn start(controller: &mut Controller<FakeBus>, options: &str) {
    controller.handle_publish("op/gameOptions", options.as_bytes()).await;
    controller.handle_publish("op/gameControl", b"START").await;
}

/// Count of FINISHED nodes in the most recent snapshot.
fn finished_count(bus: &FakeBus) -> usize {
    bus.published("op/gameState")
        .last()
        .map(|s| s.matches("\"status\":\"FINISHED\"").count())
        .unwrap_or(0)
}

/// Feed one game-clock tick and echo it back the way the broker would.
async fn tick_and_echo(controller: &mut Controller<FakeBus>, bus: &FakeBus) {
    controller.tick().await;
    let clock = bus.published("op/gameTime_in_sec");
    let Some(last) = clock.last() else {
        return;
    };
    let payload = last.clone();
    controller.handle_publish("op/gameTime_in_sec", payload.as_bytes()).await;
}

#[tokio::test]
async fn happy_path_finishes_the_room() {
    let (mut c, bus) = controller();
    start(&mut c, r#"{"participants":3,"duration":60}"#).await;
    assert_eq!(c.game_state(), GameState::Started);

    // Init ran synchronously: doors closed, lights off.
    assert!(!bus.published("4/door/entrance").is_empty());
    assert!(!bus.published("2/ledstrip/labroom/north").is_empty());

    // Globes settings carry the participant count once the keypad is solved.
    let mut last_finished = finished_count(&bus);
    let solve_order = [
        "4/puzzle",
        "4/globes",
        "5/safe/activate",
        "5/safe/control",
        "7/fusebox/laserDetection",
        "7/fusebox/rewiring0",
        "7/fusebox/rewiring1",
        "7/fusebox/potentiometer",
        "7/robot",
    ];
    for topic in solve_order {
        c.handle_publish(topic, SOLVED).await;
        let now = finished_count(&bus);
        assert!(now >= last_finished, "finished set shrank after {topic}");
        last_finished = now;
    }
    assert!(bus.published("4/globes")[0].contains("\"data\":3"));

    // The scale settles: unbalanced, then balanced again.
    c.handle_publish("6/puzzle/scale", br#"{"method":"status","state":"active"}"#).await;
    c.handle_publish("6/puzzle/scale", br#"{"method":"status","state":"inactive"}"#).await;
    assert_eq!(c.game_state(), GameState::Started);

    for topic in ["6/puzzle/terminal", "8/puzzle/maze", "8/puzzle/simon"] {
        c.handle_publish(topic, SOLVED).await;
    }

    // The final door waits behind the unlock delay.
    assert!(bus.published("4/door/entrance").len() == 2, "escape door still shut");
    for _ in 0..7 {
        tick_and_echo(&mut c, &bus).await;
    }

    assert_eq!(c.game_state(), GameState::Stopped);
    let door = bus.published("4/door/entrance");
    assert_eq!(door.last().map(String::as_str), Some(r#"{"method":"trigger","state":"on","data":null}"#));
}

#[tokio::test]
async fn skip_to_rewinds_to_the_server_room() {
    let (mut c, bus) = controller();
    start(&mut c, r#"{"duration":60,"skipTo":"Server Room"}"#).await;

    assert_eq!(c.game_state(), GameState::Started);
    // Earlier rooms emitted nothing.
    assert!(bus.published("4/puzzle").is_empty());
    assert!(bus.published("5/safe/activate").is_empty());
    assert!(bus.published("4/door/entrance").is_empty());
    // The server room riddles are live.
    assert!(!bus.published("6/puzzle/terminal").is_empty());
    assert!(bus.subscriptions().contains(&"8/puzzle/maze".to_string()));

    let snapshot = bus.published("op/gameState").pop().unwrap();
    assert!(snapshot.contains(r#""id":"Lobby Room","name":"Lobby Room","highlight":false,"status":"SKIPPED""#));
}

#[tokio::test]
async fn runtime_skip_retires_only_the_named_puzzle() {
    let (mut c, bus) = controller();
    start(&mut c, r#"{"duration":60}"#).await;

    c.handle_publish("op/gameControl", b"SKIP Input keypad code").await;

    // The keypad retired with the skip marker and the lobby moved on.
    assert_eq!(
        bus.published("4/puzzle").last().map(String::as_str),
        Some(r#"{"method":"trigger","state":"off","data":"skipped"}"#)
    );
    assert!(!bus.published("4/globes").is_empty());
    assert_eq!(c.game_state(), GameState::Started);
}

#[tokio::test]
async fn garbled_payloads_do_not_end_the_session() {
    let (mut c, _bus) = controller();
    start(&mut c, r#"{"duration":60}"#).await;

    c.handle_publish("4/puzzle", br#"{"method":"STATUS","state":"Invalid"}"#).await;
    assert_eq!(c.game_state(), GameState::Started);

    c.handle_publish("4/puzzle", SOLVED).await;
    assert_eq!(c.game_state(), GameState::Started);
}

#[tokio::test]
async fn timer_expiry_turns_the_rooms_red() {
    let (mut c, bus) = controller();
    start(&mut c, r#"{"duration":1}"#).await;

    for _ in 0..60 {
        c.tick().await;
    }

    assert_eq!(c.game_state(), GameState::Stopped);
    let red = bus.published("2/ledstrip/serverroom");
    assert!(red.iter().any(|p| p.contains("255,0,0")), "{red:?}");
    assert!(bus.published("2/textToSpeech").iter().any(|p| p.contains("gameover.mp3")));
}

#[tokio::test]
async fn reconnect_renews_the_control_subscriptions() {
    let (mut c, bus) = controller();
    c.on_connect().await.unwrap();
    start(&mut c, r#"{"duration":60}"#).await;

    // Broker bounce: CONNACK handling re-subscribes unconditionally.
    c.on_connect().await.unwrap();
    let subs = bus.subscriptions();
    assert!(subs.iter().filter(|t| t.as_str() == "op/gameControl").count() >= 2);

    // The session continued: one solve still advances exactly once.
    let before = finished_count(&bus);
    let snapshots_before = bus.published("op/gameState").len();
    c.handle_publish("4/puzzle", SOLVED).await;
    assert!(finished_count(&bus) > before);
    assert_eq!(bus.published("op/gameState").len(), snapshots_before + 1);
}
